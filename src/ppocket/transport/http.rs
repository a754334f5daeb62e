use super::{HttpResponse, Transport, ERROR_CODE_HEADER, ERROR_HEADER};
use crate::error::{PocketError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

const X_ACCEPT: &str = "X-Accept";
const FORM_CONTENT: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT: &str = "application/json; charset=UTF-8";

/// Blocking HTTP transport used by the binary.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn send(&self, step: &'static str, url: &str, request: RequestBuilder) -> Result<HttpResponse> {
        debug!(step, url, "sending request");
        let response = request
            .send()
            .map_err(|source| PocketError::Network { step, source })?;

        let status = response.status().as_u16();
        let error_message = header_value(response.headers(), ERROR_HEADER);
        let error_code = header_value(response.headers(), ERROR_CODE_HEADER);
        let body = response
            .text()
            .map_err(|source| PocketError::Network { step, source })?;
        debug!(step, status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            error_message,
            error_code,
            body,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

impl Transport for HttpTransport {
    fn post_form(
        &self,
        step: &'static str,
        url: &str,
        fields: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let request = self
            .client
            .post(url)
            .header(X_ACCEPT, FORM_CONTENT)
            .form(fields);
        self.send(step, url, request)
    }

    fn post_json(&self, step: &'static str, url: &str, body: &Value) -> Result<HttpResponse> {
        let body = serde_json::to_vec(body)?;
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT)
            .header(X_ACCEPT, "application/json")
            .body(body);
        self.send(step, url, request)
    }
}
