//! # CLI Layer
//!
//! One possible UI client for ppocket. This is the only place that reads
//! flags and environment variables, talks to the terminal, or decides exit
//! codes.
//!
//! - `run()`: main dispatch (called by `main.rs`)
//! - `init_context()`: loads config and builds the API
//! - `handle_*()`: per-command handlers that call the API and print results

use super::print::{print_items, print_messages, print_welcome};
use super::setup::{Cli, Commands, ListArgs};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use directories::ProjectDirs;
use ppocket::api::PocketApi;
use ppocket::config::PocketConfig;
use ppocket::error::{PocketError, Result};
use ppocket::model::Credentials;
use ppocket::query::{GetQuery, QueryOption};
use ppocket::transport::http::HttpTransport;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: PocketApi<HttpTransport>,
    consumer_key: String,
    access_token: Option<String>,
    username: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Cli {
        command,
        consumer_key,
        access_token,
        username,
        ..
    } = cli;

    let consumer_key = consumer_key.unwrap_or_default();
    if consumer_key.trim().is_empty() {
        return Err(PocketError::Config("Consumer key is missing".into()));
    }

    let mut ctx = init_context(consumer_key, access_token, username)?;

    match command {
        Some(Commands::List(args)) => handle_list(&mut ctx, args),
        Some(Commands::Auth) => handle_auth(&ctx),
        None => handle_list(&mut ctx, ListArgs::default()),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn config_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("PPOCKET_HOME") {
        return Some(PathBuf::from(home));
    }
    ProjectDirs::from("com", "ppocket", "ppocket").map(|dirs| dirs.config_dir().to_path_buf())
}

fn init_context(
    consumer_key: String,
    access_token: Option<String>,
    username: Option<String>,
) -> Result<AppContext> {
    let config = match config_dir() {
        Some(dir) => PocketConfig::load(dir)?,
        None => PocketConfig::default(),
    };

    Ok(AppContext {
        api: PocketApi::new(HttpTransport::new(), config),
        consumer_key,
        access_token: access_token.filter(|t| !t.trim().is_empty()),
        username: username.unwrap_or_default(),
    })
}

fn handle_auth(ctx: &AppContext) -> Result<()> {
    let stdin = io::stdin();
    let result = ctx
        .api
        .authorize(&ctx.consumer_key, stdin.lock(), io::stdout())?;
    print_messages(&result.messages);
    if let Some(auth) = &result.authorization {
        println!("PPOCKET_USERNAME={}", auth.username);
        println!("PPOCKET_USER_ACCESS_TOKEN={}", auth.access_token);
    }
    Ok(())
}

fn handle_list(ctx: &mut AppContext, args: ListArgs) -> Result<()> {
    let access_token = match ctx.access_token.clone() {
        Some(token) => token,
        None => {
            let stdin = io::stdin();
            let result = ctx
                .api
                .authorize(&ctx.consumer_key, stdin.lock(), io::stdout())?;
            print_messages(&result.messages);
            let auth = result.authorization.ok_or_else(|| {
                PocketError::Config("authorization finished without an access token".into())
            })?;
            ctx.username = auth.username;
            ctx.access_token = Some(auth.access_token.clone());
            auth.access_token
        }
    };

    print_welcome(&ctx.username);

    let query = GetQuery::new(query_options(&args)?);
    let credentials = Credentials::new(ctx.consumer_key.clone(), access_token);
    let result = ctx.api.list(&credentials, &query)?;

    print_items(&result.listed_items, ctx.api.config().words_per_minute);
    print_messages(&result.messages);
    Ok(())
}

fn query_options(args: &ListArgs) -> Result<Vec<QueryOption>> {
    let mut options = Vec::new();

    if let Some(state) = args.state {
        options.push(QueryOption::State(state));
    }
    if let Some(favorite) = args.favorite {
        options.push(QueryOption::Favorite(favorite));
    }
    if args.untagged {
        options.push(QueryOption::untagged());
    } else if let Some(tag) = &args.tag {
        options.push(QueryOption::Tag(tag.clone()));
    }
    if let Some(content_type) = args.content_type {
        options.push(QueryOption::ContentType(content_type));
    }
    if let Some(sort) = args.sort {
        options.push(QueryOption::Sort(sort));
    }
    if let Some(detail) = args.detail {
        options.push(QueryOption::Detail(detail));
    }
    if let Some(search) = &args.search {
        options.push(QueryOption::Search(search.clone()));
    }
    if let Some(domain) = &args.domain {
        options.push(QueryOption::Domain(domain.clone()));
    }
    if let Some(since) = &args.since {
        options.push(QueryOption::since(&parse_since(since)?));
    }
    if let Some(count) = args.count {
        options.push(QueryOption::pagination(count, args.offset));
    }

    Ok(options)
}

fn parse_since(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        let secs: i64 = value
            .parse()
            .map_err(|_| PocketError::Input(format!("invalid timestamp: {value}")))?;
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| PocketError::Input(format!("timestamp out of range: {value}")));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| {
            PocketError::Input(format!(
                "invalid --since value {value:?} (expected YYYY-MM-DD, RFC 3339 or Unix seconds)"
            ))
        })
}
