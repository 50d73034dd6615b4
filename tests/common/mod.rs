//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hyper::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use resilient_http::{Request, Response, Transport, TransportError, TransportErrorKind};

/// What the mock backend does with one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Status {
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
    },
    /// Read the request, then close the socket without answering.
    Drop,
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Reply::Status {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_header(self, name: &str, value: impl Into<String>) -> Self {
        match self {
            Reply::Status {
                status,
                mut headers,
                body,
            } => {
                headers.push((name.to_string(), value.into()));
                Reply::Status { status, headers, body }
            }
            Reply::Drop => Reply::Drop,
        }
    }

    pub fn with_body(self, body: &str) -> Self {
        match self {
            Reply::Status { status, headers, .. } => Reply::Status {
                status,
                headers,
                body: body.to_string(),
            },
            Reply::Drop => Reply::Drop,
        }
    }
}

/// A request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Handle to a running mock backend.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockBackend {
    pub fn url(&self, path: &str) -> url::Url {
        url::Url::parse(&format!("http://{}{}", self.addr, path)).unwrap()
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `script` receives the zero-based index of each request.
pub async fn start_programmable_backend<F>(script: F) -> MockBackend
where
    F: Fn(usize) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let counter = Arc::new(AtomicUsize::new(0));
    let script = Arc::new(script);

    let backend = MockBackend {
        addr,
        seen: seen.clone(),
    };

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let seen = seen.clone();
                    let counter = counter.clone();
                    let script = script.clone();
                    tokio::spawn(async move {
                        serve(socket, seen, counter, script.as_ref()).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    backend
}

async fn serve<F>(
    mut socket: TcpStream,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    counter: Arc<AtomicUsize>,
    script: &F,
) where
    F: Fn(usize) -> Reply + Send + Sync + 'static,
{
    let Some(request) = read_request(&mut socket).await else {
        return;
    };
    seen.lock().unwrap().push(request);

    let index = counter.fetch_add(1, Ordering::SeqCst);
    match script(index) {
        Reply::Drop => {
            let _ = socket.shutdown().await;
        }
        Reply::Status {
            status,
            headers,
            body,
        } => {
            let reason = StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown");
            let mut head = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                status,
                reason,
                body.len()
            );
            for (name, value) in headers {
                head.push_str(&format!("{}: {}\r\n", name, value));
            }
            head.push_str("\r\n");

            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(body.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<SeenRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(SeenRequest {
        method,
        target,
        headers,
        body,
    })
}

/// Transport that sends each attempt with reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn attempt(&self, request: &mut Request) -> Result<Response, TransportError> {
        let body = request.body_mut().read_to_bytes()?;
        let sent = self
            .client
            .request(request.method().clone(), request.full_url())
            .headers(request.headers().clone())
            .body(body)
            .send()
            .await
            .map_err(map_error)?;

        let status = sent.status();
        let headers = sent.headers().clone();
        let body = sent.bytes().await.map_err(map_error)?;
        Ok(Response::new(status).with_headers(headers).with_body(body))
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        TransportErrorKind::ReadTimeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::UnexpectedEof
    };
    TransportError::new(kind, err.to_string()).with_source(err)
}
