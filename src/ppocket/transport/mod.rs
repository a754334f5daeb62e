//! # Transport Layer
//!
//! Every call ppocket makes is a single blocking POST. The [`Transport`] trait
//! is the seam between the handshake/list logic and the wire:
//!
//! - [`http::HttpTransport`]: production transport on a blocking `reqwest` client.
//!   No timeout is configured, so a hung server hangs the caller.
//! - [`memory::CannedTransport`]: replays queued responses and records the
//!   requests it was given. Does not touch the network.
//!
//! ## Error Signaling
//!
//! The service reports failures with a non-200 status plus two headers:
//! `X-Error` (human readable) and `X-Error-Code`. [`HttpResponse::ensure_ok`]
//! turns that into [`PocketError::Api`] carrying both.

use crate::error::{PocketError, Result};
use serde_json::Value;

pub mod http;
pub mod memory;

pub const ERROR_HEADER: &str = "X-Error";
pub const ERROR_CODE_HEADER: &str = "X-Error-Code";

/// The parts of a response the client looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub error_message: Option<String>,
    pub error_code: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn error(status: u16, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            error_message: Some(message.into()),
            error_code: Some(code.into()),
            body: String::new(),
        }
    }

    /// Pass a 200 through, turn anything else into an API error for `step`.
    pub fn ensure_ok(self, step: &'static str) -> Result<Self> {
        if self.status == 200 {
            return Ok(self);
        }
        Err(PocketError::Api {
            step,
            status: self.status,
            message: self.error_message.unwrap_or_default(),
            code: self.error_code.unwrap_or_default(),
        })
    }
}

/// Abstract interface for talking to the Pocket API.
pub trait Transport {
    /// POST an `application/x-www-form-urlencoded` body
    fn post_form(&self, step: &'static str, url: &str, fields: &[(&str, &str)])
        -> Result<HttpResponse>;

    /// POST a JSON body
    fn post_json(&self, step: &'static str, url: &str, body: &Value) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_form(
        &self,
        step: &'static str,
        url: &str,
        fields: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        (**self).post_form(step, url, fields)
    }

    fn post_json(&self, step: &'static str, url: &str, body: &Value) -> Result<HttpResponse> {
        (**self).post_json(step, url, body)
    }
}
