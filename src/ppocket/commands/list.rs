use crate::commands::{CmdMessage, CmdResult};
use crate::config::PocketConfig;
use crate::error::Result;
use crate::model::{Credentials, ResultSet};
use crate::query::GetQuery;
use crate::transport::Transport;
use tracing::{debug, warn};

pub const RETRIEVE_STEP: &str = "list";

/// One `/v3/get` call: the query is serialized once and the answer decoded whole.
pub fn retrieve<T: Transport>(
    transport: &T,
    config: &PocketConfig,
    credentials: &Credentials,
    query: &GetQuery,
) -> Result<ResultSet> {
    credentials.validate()?;
    let payload = query.to_json(credentials)?;
    let response = transport
        .post_json(RETRIEVE_STEP, &config.retrieve_url(), &payload)?
        .ensure_ok(RETRIEVE_STEP)?;
    let results = ResultSet::from_json(&response.body)?;
    debug!(items = results.len(), "retrieved list");
    Ok(results)
}

pub fn run<T: Transport>(
    transport: &T,
    config: &PocketConfig,
    credentials: &Credentials,
    query: &GetQuery,
) -> Result<CmdResult> {
    let results = retrieve(transport, config, credentials, query)?;

    let mut result = CmdResult::default();
    for item in results.items() {
        if !item.word_count.is_empty() && item.word_count().is_none() {
            warn!(item_id = %item.item_id, word_count = %item.word_count, "unparseable word count");
            result.add_message(CmdMessage::warning(format!(
                "Cannot convert word count {:?} of item {} to an integer",
                item.word_count, item.item_id
            )));
        }
    }

    let items: Vec<_> = results.items().into_iter().cloned().collect();
    if !items.is_empty() {
        result.add_message(CmdMessage::info(format!("Retrieved {} items", items.len())));
    }
    Ok(result.with_listed_items(items))
}
