//! Scripted transport for executor tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use tokio::time::Instant;

use super::{Transport, TransportError, TransportErrorKind};
use crate::http::{QueryParams, Request, Response};

#[derive(Clone)]
pub(crate) enum Step {
    Respond(Response),
    Fail {
        kind: TransportErrorKind,
        retryable: bool,
    },
}

impl Step {
    pub(crate) fn status(code: u16) -> Self {
        Step::Respond(Response::new(StatusCode::from_u16(code).unwrap()))
    }

    pub(crate) fn fail(kind: TransportErrorKind) -> Self {
        Step::Fail {
            kind,
            retryable: false,
        }
    }

    fn run(&self, attempt: usize) -> Result<Response, TransportError> {
        match self {
            Step::Respond(response) => Ok(response.clone()),
            Step::Fail { kind, retryable } => {
                Err(TransportError::new(*kind, format!("attempt {attempt} failed")).retryable(*retryable))
            }
        }
    }
}

/// What the transport saw on one attempt.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub headers: HeaderMap,
    pub query: QueryParams,
    pub body: Bytes,
    pub at: Instant,
}

/// Plays back a fixed list of steps, repeating the last one once exhausted.
pub(crate) struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    recorded: Mutex<Vec<Recorded>>,
    scribble: bool,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            last: Mutex::new(None),
            recorded: Mutex::new(Vec::new()),
            scribble: false,
        }
    }

    /// Mutate the request's headers and query on every attempt.
    pub(crate) fn scribbling(mut self) -> Self {
        self.scribble = true;
        self
    }

    pub(crate) fn attempts(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub(crate) fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    fn next_step(&self) -> Step {
        let mut last = self.last.lock().unwrap();
        if let Some(step) = self.steps.lock().unwrap().pop_front() {
            *last = Some(step);
        }
        last.clone().expect("scripted transport needs at least one step")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn attempt(&self, request: &mut Request) -> Result<Response, TransportError> {
        let body = request.body_mut().read_to_bytes()?;
        let attempt = {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.push(Recorded {
                headers: request.headers().clone(),
                query: request.query().clone(),
                body,
                at: Instant::now(),
            });
            recorded.len()
        };

        if self.scribble {
            request.headers_mut().insert(
                HeaderName::from_static("x-transport-scratch"),
                HeaderValue::from_static("dirty"),
            );
            request.query_mut().append("scratch", attempt.to_string());
        }

        self.next_step().run(attempt)
    }
}
