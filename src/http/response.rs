//! Response returned by one transport attempt.

use std::time::SystemTime;

use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue, DATE};
use hyper::{HeaderMap, StatusCode};

/// A fully buffered HTTP response.
///
/// Built by a transport once the wire body has been drained, then never mutated.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// The value of `name` if it appears exactly once.
    pub fn single_header(&self, name: &HeaderName) -> Option<&HeaderValue> {
        let mut values = self.headers.get_all(name).iter();
        let first = values.next()?;
        match values.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// Server clock reading from the `Date` header, if it parses as an HTTP-date.
    pub fn date(&self) -> Option<SystemTime> {
        let raw = self.headers.get(DATE)?.to_str().ok()?;
        httpdate::parse_http_date(raw.trim()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_single_header_rejects_duplicates() {
        let name = HeaderName::from_static("x-rate-limit-reset");
        let once = Response::new(StatusCode::TOO_MANY_REQUESTS)
            .with_header(name.clone(), HeaderValue::from_static("100"));
        assert_eq!(once.single_header(&name).unwrap(), "100");

        let twice = once
            .clone()
            .with_header(name.clone(), HeaderValue::from_static("200"));
        assert!(twice.single_header(&name).is_none());

        let none = Response::new(StatusCode::OK);
        assert!(none.single_header(&name).is_none());
    }

    #[test]
    fn test_date_header_parsing() {
        let when = UNIX_EPOCH + Duration::from_secs(1_445_412_480);
        let resp = Response::new(StatusCode::OK).with_header(
            DATE,
            HeaderValue::from_str(&httpdate::fmt_http_date(when)).unwrap(),
        );
        assert_eq!(resp.date(), Some(when));

        let bad = Response::new(StatusCode::OK)
            .with_header(DATE, HeaderValue::from_static("yesterday"));
        assert!(bad.date().is_none());
    }
}
