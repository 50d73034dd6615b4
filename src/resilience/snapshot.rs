//! Request state snapshot.
//!
//! # Responsibilities
//! - Capture headers and query parameters before the first attempt
//! - Put them back before every retry and when the call ends
//!
//! # Design Decisions
//! - Restoration overwrites wholesale; anything a transport or a previous
//!   attempt added is dropped, including earlier retry headers
//! - The body is not part of the snapshot; replayable bodies are rewound instead

use hyper::HeaderMap;

use crate::http::{QueryParams, Request};

#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    headers: HeaderMap,
    query: QueryParams,
}

impl RequestSnapshot {
    pub fn capture(request: &Request) -> Self {
        Self {
            headers: request.headers().clone(),
            query: request.query().clone(),
        }
    }

    pub fn restore(&self, request: &mut Request) {
        request.set_headers(self.headers.clone());
        request.set_query(self.query.clone());
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{HeaderName, HeaderValue, ACCEPT};
    use url::Url;

    #[test]
    fn test_restore_undoes_mutation() {
        let mut request = Request::get(Url::parse("https://example.com/api").unwrap())
            .with_header(ACCEPT, HeaderValue::from_static("application/json"))
            .with_header(ACCEPT, HeaderValue::from_static("text/plain"))
            .with_query("after", "abc")
            .with_query("after", "def");
        let snapshot = RequestSnapshot::capture(&request);

        request.headers_mut().remove(ACCEPT);
        request.headers_mut().insert(
            HeaderName::from_static("x-retry-count"),
            HeaderValue::from_static("2"),
        );
        request.query_mut().append("limit", "5");

        snapshot.restore(&mut request);
        assert_eq!(request.headers(), snapshot.headers());
        assert_eq!(
            request.headers().get_all(ACCEPT).iter().collect::<Vec<_>>(),
            vec!["application/json", "text/plain"]
        );
        assert_eq!(request.query(), snapshot.query());
        assert_eq!(request.query().len(), 2);
    }
}
