//! # Authorization Handshake
//!
//! Turns the static consumer key into a per-user access token:
//!
//! ```text
//! Start ─▶ RequestToken ─▶ AwaitUserApproval ─▶ ExchangeToken ─▶ Done
//!               │                                     │
//!               └──────────────▶ Failed ◀─────────────┘
//! ```
//!
//! 1. `RequestToken` posts `consumer_key` + `redirect_uri` and reads a short-lived
//!    `code` from the form-encoded answer.
//! 2. `AwaitUserApproval` prints the grant URL and reads lines until the user
//!    types `y` (any case). Other lines only re-prompt; there is no timeout.
//! 3. `ExchangeToken` posts `consumer_key` + `code` and reads `access_token`
//!    and `username`.
//!
//! Neither network step is retried. Console I/O goes through the `BufRead` /
//! `Write` handles passed to [`Authorizer::run`], so the loop can be driven
//! from tests.

use crate::config::PocketConfig;
use crate::error::{PocketError, Result};
use crate::model::Authorization;
use crate::transport::Transport;
use std::io::{BufRead, ErrorKind, Write};
use tracing::{debug, info};

pub const REQUEST_TOKEN_STEP: &str = "request token";
pub const ACCESS_TOKEN_STEP: &str = "access token";
pub const APPROVAL_PROMPT: &str = "When it is done, press Y then Enter:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Start,
    RequestToken,
    AwaitUserApproval { code: String },
    ExchangeToken { code: String },
    Done(Authorization),
    Failed,
}

pub struct Authorizer<'a, T: Transport> {
    transport: T,
    config: &'a PocketConfig,
    consumer_key: String,
    state: AuthState,
}

impl<'a, T: Transport> Authorizer<'a, T> {
    pub fn new(transport: T, config: &'a PocketConfig, consumer_key: impl Into<String>) -> Self {
        Self {
            transport,
            config,
            consumer_key: consumer_key.into(),
            state: AuthState::Start,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Drive the handshake to completion. Any error leaves the authorizer in
    /// [`AuthState::Failed`].
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<Authorization> {
        loop {
            if let AuthState::Done(auth) = &self.state {
                return Ok(auth.clone());
            }
            let current = std::mem::replace(&mut self.state, AuthState::Failed);
            self.state = self.advance(current, &mut input, &mut output)?;
        }
    }

    fn advance<R: BufRead, W: Write>(
        &self,
        state: AuthState,
        input: &mut R,
        output: &mut W,
    ) -> Result<AuthState> {
        debug!(?state, "authorization step");
        match state {
            AuthState::Start => {
                if self.consumer_key.trim().is_empty() {
                    return Err(PocketError::Config("Consumer key is missing".into()));
                }
                Ok(AuthState::RequestToken)
            }
            AuthState::RequestToken => {
                let code = self.request_code()?;
                writeln!(output, "Please visit {}", self.config.user_grant_url(&code)?)?;
                Ok(AuthState::AwaitUserApproval { code })
            }
            AuthState::AwaitUserApproval { code } => {
                wait_for_approval(input, output)?;
                Ok(AuthState::ExchangeToken { code })
            }
            AuthState::ExchangeToken { code } => {
                let auth = self.exchange_code(&code)?;
                info!(username = %auth.username, "access granted");
                Ok(AuthState::Done(auth))
            }
            AuthState::Done(auth) => Ok(AuthState::Done(auth)),
            AuthState::Failed => Err(PocketError::Auth(
                "handshake already failed, start a new one".into(),
            )),
        }
    }

    fn request_code(&self) -> Result<String> {
        let fields = [
            ("consumer_key", self.consumer_key.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        let response = self
            .transport
            .post_form(REQUEST_TOKEN_STEP, &self.config.request_token_url(), &fields)?
            .ensure_ok(REQUEST_TOKEN_STEP)?;
        let values = parse_form(REQUEST_TOKEN_STEP, &response.body)?;
        required(REQUEST_TOKEN_STEP, &values, "code")
    }

    fn exchange_code(&self, code: &str) -> Result<Authorization> {
        let fields = [("consumer_key", self.consumer_key.as_str()), ("code", code)];
        let response = self
            .transport
            .post_form(ACCESS_TOKEN_STEP, &self.config.access_token_url(), &fields)?
            .ensure_ok(ACCESS_TOKEN_STEP)?;
        let values = parse_form(ACCESS_TOKEN_STEP, &response.body)?;
        Ok(Authorization {
            access_token: required(ACCESS_TOKEN_STEP, &values, "access_token")?,
            username: lookup(&values, "username").unwrap_or_default(),
        })
    }
}

/// Block until the user answers `y`. Closing the input first is an error.
pub fn wait_for_approval<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<()> {
    let mut line = String::new();
    loop {
        writeln!(output, "{APPROVAL_PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(PocketError::Io(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "input closed before access was approved",
            )));
        }
        if line.trim().eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}

fn parse_form(step: &'static str, body: &str) -> Result<Vec<(String, String)>> {
    serde_urlencoded::from_str(body).map_err(|e| PocketError::decode(step, e))
}

fn lookup(values: &[(String, String)], key: &str) -> Option<String> {
    values
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

fn required(step: &'static str, values: &[(String, String)], key: &str) -> Result<String> {
    match lookup(values, key) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PocketError::decode(step, format!("response has no {key}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::CannedTransport;
    use crate::transport::HttpResponse;
    use std::io::Cursor;

    fn granted() -> CannedTransport {
        CannedTransport::new()
            .respond(HttpResponse::ok("code=dcba4321-dcba-4321-dcba-4321dc"))
            .respond(HttpResponse::ok(
                "access_token=5678defg-5678-defg-5678-defg56&username=pocketuser",
            ))
    }

    #[test]
    fn full_handshake() {
        let config = PocketConfig::default();
        let transport = granted();
        let mut output = Vec::new();

        let mut authorizer = Authorizer::new(&transport, &config, "1234-abcd1234abcd1234abcd1234");
        let auth = authorizer.run(Cursor::new("y\n"), &mut output).unwrap();

        assert_eq!(auth.access_token, "5678defg-5678-defg-5678-defg56");
        assert_eq!(auth.username, "pocketuser");
        assert_eq!(authorizer.state(), &AuthState::Done(auth));

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, "https://getpocket.com/v3/oauth/request");
        assert_eq!(
            requests[0].form_value("redirect_uri"),
            Some("https://ppocket.herokuapp.com/")
        );
        assert_eq!(requests[1].url, "https://getpocket.com/v3/oauth/authorize");
        assert_eq!(
            requests[1].form_value("code"),
            Some("dcba4321-dcba-4321-dcba-4321dc")
        );

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains(
            "https://getpocket.com/auth/authorize?request_token=dcba4321-dcba-4321-dcba-4321dc"
        ));
    }

    #[test]
    fn approval_needs_a_yes() {
        let config = PocketConfig::default();
        let transport = granted();
        let mut output = Vec::new();

        let mut authorizer = Authorizer::new(&transport, &config, "ck");
        authorizer
            .run(Cursor::new("n\nno\nY\n"), &mut output)
            .unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches(APPROVAL_PROMPT).count(), 3);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn wait_reprompts_until_yes() {
        let mut input = Cursor::new("n\nno\ny\nignored\n");
        let mut output = Vec::new();
        wait_for_approval(&mut input, &mut output).unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches(APPROVAL_PROMPT).count(), 3);

        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "ignored\n");
    }

    #[test]
    fn closed_input_does_not_exchange() {
        let config = PocketConfig::default();
        let transport = granted();

        let mut authorizer = Authorizer::new(&transport, &config, "ck");
        let err = authorizer.run(Cursor::new("n\n"), Vec::new()).unwrap_err();

        assert!(matches!(err, PocketError::Io(_)));
        assert_eq!(authorizer.state(), &AuthState::Failed);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn rejected_exchange_surfaces_message_and_code() {
        let config = PocketConfig::default();
        let transport = CannedTransport::new()
            .respond(HttpResponse::ok("code=abc"))
            .respond(HttpResponse::error(403, "invalid code", "158"));

        let mut authorizer = Authorizer::new(&transport, &config, "ck");
        let err = authorizer.run(Cursor::new("y\n"), Vec::new()).unwrap_err();

        let text = err.to_string();
        assert!(text.contains("invalid code"));
        assert!(text.contains("158"));
        assert_eq!(authorizer.state(), &AuthState::Failed);
    }

    #[test]
    fn failed_handshake_cannot_be_resumed() {
        let config = PocketConfig::default();
        let transport = CannedTransport::new().respond(HttpResponse::error(403, "denied", "1"));

        let mut authorizer = Authorizer::new(&transport, &config, "ck");
        authorizer.run(Cursor::new("y\n"), Vec::new()).unwrap_err();

        let err = authorizer.run(Cursor::new("y\n"), Vec::new()).unwrap_err();
        assert!(matches!(err, PocketError::Auth(_)));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn rejected_request_stops_before_prompting() {
        let config = PocketConfig::default();
        let transport = CannedTransport::new().respond(HttpResponse::error(
            400,
            "Missing consumer key.",
            "138",
        ));
        let mut output = Vec::new();

        let mut authorizer = Authorizer::new(&transport, &config, "ck");
        let err = authorizer.run(Cursor::new("y\n"), &mut output).unwrap_err();

        assert!(matches!(
            err,
            PocketError::Api {
                step: REQUEST_TOKEN_STEP,
                status: 400,
                ..
            }
        ));
        assert!(output.is_empty());
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn missing_consumer_key_makes_no_call() {
        let config = PocketConfig::default();
        let transport = CannedTransport::new();

        let mut authorizer = Authorizer::new(&transport, &config, "");
        let err = authorizer.run(Cursor::new("y\n"), Vec::new()).unwrap_err();

        assert!(matches!(err, PocketError::Config(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn response_without_code_is_a_decode_error() {
        let config = PocketConfig::default();
        let transport = CannedTransport::new().respond(HttpResponse::ok("state=nothing"));

        let mut authorizer = Authorizer::new(&transport, &config, "ck");
        let err = authorizer.run(Cursor::new("y\n"), Vec::new()).unwrap_err();

        assert!(matches!(
            err,
            PocketError::Decode {
                step: REQUEST_TOKEN_STEP,
                ..
            }
        ));
    }

    #[test]
    fn failed_authorizer_stays_failed() {
        let config = PocketConfig::default();
        let transport = CannedTransport::new().fail("connection refused");

        let mut authorizer = Authorizer::new(&transport, &config, "ck");
        assert!(authorizer.run(Cursor::new("y\n"), Vec::new()).is_err());
        assert!(authorizer.run(Cursor::new("y\n"), Vec::new()).is_err());
        assert_eq!(transport.requests().len(), 1);
    }
}
