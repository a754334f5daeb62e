//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every ppocket operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the appropriate command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and never exits the process.
//!
//! ## Generic Over Transport
//!
//! `PocketApi<T: Transport>` is generic over the transport:
//! - Production: `PocketApi<HttpTransport>`
//! - Testing: `PocketApi<CannedTransport>`

use crate::commands;
use crate::config::PocketConfig;
use crate::error::Result;
use crate::model::{Credentials, ResultSet};
use crate::query::GetQuery;
use crate::transport::Transport;
use std::io::{BufRead, Write};

pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

/// The main API facade for ppocket operations.
pub struct PocketApi<T: Transport> {
    transport: T,
    config: PocketConfig,
}

impl<T: Transport> PocketApi<T> {
    pub fn new(transport: T, config: PocketConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &PocketConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run the authorization handshake, prompting on `output` and reading
    /// the user's approval from `input`.
    pub fn authorize<R: BufRead, W: Write>(
        &self,
        consumer_key: &str,
        input: R,
        output: W,
    ) -> Result<CmdResult> {
        commands::authorize::run(&self.transport, &self.config, consumer_key, input, output)
    }

    pub fn list(&self, credentials: &Credentials, query: &GetQuery) -> Result<CmdResult> {
        commands::list::run(&self.transport, &self.config, credentials, query)
    }

    pub fn retrieve(&self, credentials: &Credentials, query: &GetQuery) -> Result<ResultSet> {
        commands::list::retrieve(&self.transport, &self.config, credentials, query)
    }
}
