//! Mock implementations for testing.

use std::collections::VecDeque;

use parking_lot::Mutex;
use reqwest::StatusCode;
use reqwest::header::{HeaderName, HeaderValue};
use wagon_common::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Transport answering from a queue of scripted responses.
///
/// When the queue is empty the fallback response is returned, or an
/// `Unavailable` error if none is set. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    fallback: Mutex<Option<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Create a mock with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn push(&self, response: HttpResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    /// Queue a response with the given status and body.
    pub fn push_status(&self, status: u16, body: &str) {
        self.push(response(status).with_body(body.to_string()));
    }

    /// Queue a response carrying a single header.
    pub fn push_with_header(&self, status: u16, name: &'static str, value: &str) {
        let mut response = response(status);
        if let Ok(value) = HeaderValue::from_str(value) {
            response = response.with_header(HeaderName::from_static(name), value);
        }
        self.push(response);
    }

    /// Queue a transport failure.
    pub fn push_error(&self, message: &str) {
        self.responses.lock().push_back(Err(message.to_string()));
    }

    /// Response returned once the queue is drained.
    pub fn set_fallback(&self, response: HttpResponse) {
        *self.fallback.lock() = Some(response);
    }

    /// All requests seen so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests seen so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Scripted responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

impl HttpTransport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());
        match self.responses.lock().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::unavailable(message)),
            None => self
                .fallback
                .lock()
                .clone()
                .ok_or_else(|| TransportError::unavailable("no scripted response")),
        }
    }
}

fn response(status: u16) -> HttpResponse {
    HttpResponse::new(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
}
