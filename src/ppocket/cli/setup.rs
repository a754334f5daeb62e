use clap::{Args, Parser, Subcommand};
use ppocket::query::{QueryContentType, QueryDetail, QueryFavorite, QuerySort, QueryState};

#[derive(Parser, Debug)]
#[command(name = "ppocket", bin_name = "ppocket", version)]
#[command(about = "Read your Pocket list from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Pocket consumer key of the application
    #[arg(
        short = 'k',
        long,
        env = "PPOCKET_API_CONSUMER_KEY",
        hide_env_values = true,
        global = true,
        help_heading = "Credentials"
    )]
    pub consumer_key: Option<String>,

    /// Access token of the user (runs the authorization when missing)
    #[arg(
        short = 'a',
        long,
        env = "PPOCKET_USER_ACCESS_TOKEN",
        hide_env_values = true,
        global = true,
        help_heading = "Credentials"
    )]
    pub access_token: Option<String>,

    /// Pocket username, only used for display
    #[arg(
        short = 'u',
        long,
        env = "PPOCKET_USERNAME",
        global = true,
        help_heading = "Credentials"
    )]
    pub username: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List saved items (default)
    #[command(alias = "ls", display_order = 1)]
    List(ListArgs),

    /// Authorize ppocket and print the access token
    #[command(display_order = 2)]
    Auth,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    /// Item state: unread, archive or all
    #[arg(long, value_name = "STATE")]
    pub state: Option<QueryState>,

    /// Favorite filter: any, excluded or only
    #[arg(long, value_name = "FILTER")]
    pub favorite: Option<QueryFavorite>,

    /// Only items with this tag
    #[arg(short, long, conflicts_with = "untagged")]
    pub tag: Option<String>,

    /// Only items without any tag
    #[arg(long)]
    pub untagged: bool,

    /// Content type: article, video or image
    #[arg(long, value_name = "TYPE")]
    pub content_type: Option<QueryContentType>,

    /// Sort order: newest, oldest, title or site
    #[arg(long, value_name = "ORDER")]
    pub sort: Option<QuerySort>,

    /// Detail level: simple or complete
    #[arg(long, value_name = "LEVEL")]
    pub detail: Option<QueryDetail>,

    /// Only items whose title or URL contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only items from this domain
    #[arg(long)]
    pub domain: Option<String>,

    /// Only items modified since (YYYY-MM-DD, RFC 3339 or Unix seconds)
    #[arg(long, value_name = "WHEN")]
    pub since: Option<String>,

    /// Number of items to return
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Index of the first item (with --count)
    #[arg(long, default_value_t = 0)]
    pub offset: i64,
}
