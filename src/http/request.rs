//! Outbound request representation.
//!
//! # Responsibilities
//! - Hold method, target URL, ordered query parameters and headers
//! - Carry an optional body and know whether it can be rewound
//! - Render the final URL for transports

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method};
use url::Url;

/// Ordered, multi-valued query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping any existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// All values for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Readers that can be moved back to their first byte.
pub trait SeekableRead: Read + Seek + Send {}

impl<T: Read + Seek + Send> SeekableRead for T {}

/// Request payload.
///
/// Only `Empty`, `Bytes` and `Seekable` bodies survive a retry. A `Streaming`
/// body is consumed by the first attempt and makes any retry fail.
#[derive(Default)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Bytes),
    Seekable(Box<dyn SeekableRead>),
    Streaming(Box<dyn Read + Send>),
}

impl Body {
    pub fn seekable<R: Read + Seek + Send + 'static>(reader: R) -> Self {
        Body::Seekable(Box::new(reader))
    }

    pub fn streaming<R: Read + Send + 'static>(reader: R) -> Self {
        Body::Streaming(Box::new(reader))
    }

    pub fn is_replayable(&self) -> bool {
        !matches!(self, Body::Streaming(_))
    }

    /// Move the body back to position zero so the next attempt sends it in full.
    pub fn rewind(&mut self) -> io::Result<()> {
        match self {
            Body::Empty | Body::Bytes(_) => Ok(()),
            Body::Seekable(reader) => reader.seek(SeekFrom::Start(0)).map(|_| ()),
            Body::Streaming(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "streaming request body cannot be rewound",
            )),
        }
    }

    /// Read the body from its current position to the end.
    pub fn read_to_bytes(&mut self) -> io::Result<Bytes> {
        match self {
            Body::Empty => Ok(Bytes::new()),
            Body::Bytes(bytes) => Ok(bytes.clone()),
            Body::Seekable(reader) => read_all(reader),
            Body::Streaming(reader) => read_all(reader),
        }
    }
}

fn read_all<R: Read + ?Sized>(reader: &mut R) -> io::Result<Bytes> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(Bytes::from(buf))
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Body::Seekable(_) => f.write_str("Seekable"),
            Body::Streaming(_) => f.write_str("Streaming"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Bytes(Bytes::from_static(s.as_bytes()))
    }
}

/// A request owned by the caller and borrowed by the executor for one call.
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: Url,
    query: QueryParams,
    headers: HeaderMap,
    body: Body,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            query: QueryParams::new(),
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url, body: impl Into<Body>) -> Self {
        Self::new(Method::POST, url).with_body(body)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut QueryParams {
        &mut self.query
    }

    pub fn set_query(&mut self, query: QueryParams) {
        self.query = query;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn set_headers(&mut self, headers: HeaderMap) {
        self.headers = headers;
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Target URL with the query parameters appended after any already in `url`.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in self.query.iter() {
                pairs.append_pair(k, v);
            }
        }
        url
    }
}
