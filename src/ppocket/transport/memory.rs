use super::{HttpResponse, Transport};
use crate::error::{PocketError, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

/// A request as seen by [`CannedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub step: &'static str,
    pub url: String,
    pub form: Vec<(String, String)>,
    pub json: Option<Value>,
}

impl RecordedRequest {
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
enum Canned {
    Response(HttpResponse),
    Failure(String),
}

/// In-memory transport for testing and development.
/// Responses are handed out in the order they were queued.
#[derive(Debug, Default)]
pub struct CannedTransport {
    responses: RefCell<VecDeque<Canned>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: HttpResponse) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Canned::Response(response));
        self
    }

    /// Queue a transport-level failure (connection refused and the like).
    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Canned::Failure(reason.into()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    fn next(&self, request: RecordedRequest) -> Result<HttpResponse> {
        let step = request.step;
        self.requests.borrow_mut().push(request);
        match self.responses.borrow_mut().pop_front() {
            Some(Canned::Response(response)) => Ok(response),
            Some(Canned::Failure(reason)) => Err(PocketError::Transport { step, reason }),
            None => Err(PocketError::Transport {
                step,
                reason: "no canned response left".to_string(),
            }),
        }
    }
}

impl Transport for CannedTransport {
    fn post_form(
        &self,
        step: &'static str,
        url: &str,
        fields: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        self.next(RecordedRequest {
            step,
            url: url.to_string(),
            form: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            json: None,
        })
    }

    fn post_json(&self, step: &'static str, url: &str, body: &Value) -> Result<HttpResponse> {
        self.next(RecordedRequest {
            step,
            url: url.to_string(),
            form: Vec::new(),
            json: Some(body.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replays_in_order_and_records() {
        let transport = CannedTransport::new()
            .respond(HttpResponse::ok("first"))
            .respond(HttpResponse::ok("second"));

        let a = transport
            .post_form("request token", "http://x/a", &[("consumer_key", "ck")])
            .unwrap();
        let b = transport
            .post_json("list", "http://x/b", &json!({"state": "all"}))
            .unwrap();

        assert_eq!(a.body, "first");
        assert_eq!(b.body, "second");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].form_value("consumer_key"), Some("ck"));
        assert_eq!(requests[1].json, Some(json!({"state": "all"})));
    }

    #[test]
    fn exhausted_queue_is_a_transport_error() {
        let transport = CannedTransport::new();
        let err = transport.post_form("access token", "http://x", &[]).unwrap_err();
        assert!(matches!(
            err,
            PocketError::Transport {
                step: "access token",
                ..
            }
        ));
    }

    #[test]
    fn queued_failure_is_returned() {
        let transport = CannedTransport::new().fail("connection refused");
        let err = transport.post_form("request token", "http://x", &[]).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
