use crate::auth::Authorizer;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::PocketConfig;
use crate::error::Result;
use crate::transport::Transport;
use std::io::{BufRead, Write};

pub fn run<T: Transport, R: BufRead, W: Write>(
    transport: &T,
    config: &PocketConfig,
    consumer_key: &str,
    input: R,
    output: W,
) -> Result<CmdResult> {
    let mut authorizer = Authorizer::new(transport, config, consumer_key);
    let authorization = authorizer.run(input, output)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Authorized as {}",
        authorization.username
    )));
    Ok(result.with_authorization(authorization))
}
