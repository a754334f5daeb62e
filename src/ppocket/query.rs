//! # Retrieve Query
//!
//! [`GetQuery`] holds every filter `/v3/get` understands. It starts from the
//! service defaults, takes a sequence of [`QueryOption`]s (the last one to touch
//! a field wins, options on different fields commute), and is then turned into
//! the JSON payload exactly once via [`GetQuery::to_payload`].
//!
//! ## Wire rules
//!
//! - Always sent: `consumer_key`, `access_token`, `state`, `contentType`,
//!   `sort`, `detailType`.
//! - `favorite` only when it is not [`QueryFavorite::Any`] (0 = excluded, 1 = only).
//! - `tag`, `search`, `domain` only when non-empty.
//! - `since` only when set, as Unix seconds.
//! - `count` only when positive; `offset` only alongside `count` and when positive.
//!
//! A pagination option with a negative count leaves the previous pagination
//! untouched.

use crate::error::{PocketError, Result};
use crate::model::Credentials;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Tag value that selects items without any tag.
pub const UNTAGGED: &str = "_untagged_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryState {
    Unread,
    Archive,
    #[default]
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryFavorite {
    #[default]
    Any,
    Excluded,
    Only,
}

impl QueryFavorite {
    fn wire_value(self) -> Option<u8> {
        match self {
            QueryFavorite::Any => None,
            QueryFavorite::Excluded => Some(0),
            QueryFavorite::Only => Some(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryContentType {
    #[default]
    Article,
    Video,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuerySort {
    #[default]
    Newest,
    Oldest,
    Title,
    Site,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryDetail {
    Simple,
    #[default]
    Complete,
}

macro_rules! literal_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $lit:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $lit),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PocketError;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_lowercase().as_str() {
                    $($lit => Ok($ty::$variant),)+
                    other => Err(PocketError::Input(format!(
                        "unknown {} {:?} (expected one of: {})",
                        $what,
                        other,
                        [$($lit),+].join(", ")
                    ))),
                }
            }
        }
    };
}

literal_enum!(QueryState, "state", { Unread => "unread", Archive => "archive", All => "all" });
literal_enum!(QueryFavorite, "favorite filter", { Any => "any", Excluded => "excluded", Only => "only" });
literal_enum!(QueryContentType, "content type", { Article => "article", Video => "video", Image => "image" });
literal_enum!(QuerySort, "sort order", { Newest => "newest", Oldest => "oldest", Title => "title", Site => "site" });
literal_enum!(QueryDetail, "detail level", { Simple => "simple", Complete => "complete" });

/// One change to a [`GetQuery`]. Each variant touches exactly one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOption {
    State(QueryState),
    Favorite(QueryFavorite),
    Tag(String),
    ContentType(QueryContentType),
    Sort(QuerySort),
    Detail(QueryDetail),
    Search(String),
    Domain(String),
    Since(DateTime<Utc>),
    Pagination { count: i64, offset: i64 },
}

impl QueryOption {
    pub fn untagged() -> Self {
        QueryOption::Tag(UNTAGGED.to_string())
    }

    /// Modified-after filter; the timezone of `at` does not matter.
    pub fn since<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        QueryOption::Since(at.with_timezone(&Utc))
    }

    pub fn pagination(count: i64, offset: i64) -> Self {
        QueryOption::Pagination { count, offset }
    }

    fn apply(self, query: &mut GetQuery) {
        match self {
            QueryOption::State(state) => query.state = state,
            QueryOption::Favorite(favorite) => query.favorite = favorite,
            QueryOption::Tag(tag) => query.tag = tag,
            QueryOption::ContentType(content_type) => query.content_type = content_type,
            QueryOption::Sort(sort) => query.sort = sort,
            QueryOption::Detail(detail) => query.detail = detail,
            QueryOption::Search(search) => query.search = search,
            QueryOption::Domain(domain) => query.domain = domain,
            QueryOption::Since(since) => query.since = Some(since),
            QueryOption::Pagination { count, offset } => {
                if count < 0 {
                    warn!(count, offset, "ignoring pagination with a negative count");
                    return;
                }
                query.count = count;
                query.offset = offset;
            }
        }
    }
}

/// Filters for one `/v3/get` call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetQuery {
    state: QueryState,
    favorite: QueryFavorite,
    tag: String,
    content_type: QueryContentType,
    sort: QuerySort,
    detail: QueryDetail,
    search: String,
    domain: String,
    since: Option<DateTime<Utc>>,
    count: i64,
    offset: i64,
}

impl GetQuery {
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = QueryOption>,
    {
        let mut query = GetQuery::default();
        for option in options {
            option.apply(&mut query);
        }
        query
    }

    pub fn with(mut self, option: QueryOption) -> Self {
        option.apply(&mut self);
        self
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn favorite(&self) -> QueryFavorite {
        self.favorite
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn sort(&self) -> QuerySort {
        self.sort
    }

    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    /// Requested page size, `None` meaning the server default.
    pub fn count(&self) -> Option<u64> {
        u64::try_from(self.count).ok().filter(|c| *c > 0)
    }

    pub fn offset(&self) -> Option<u64> {
        self.count()?;
        u64::try_from(self.offset).ok().filter(|o| *o > 0)
    }

    pub fn to_payload<'a>(&'a self, credentials: &'a Credentials) -> GetPayload<'a> {
        GetPayload {
            consumer_key: &credentials.consumer_key,
            access_token: &credentials.access_token,
            state: self.state,
            favorite: self.favorite.wire_value(),
            tag: non_empty(&self.tag),
            content_type: self.content_type,
            sort: self.sort,
            detail_type: self.detail,
            search: non_empty(&self.search),
            domain: non_empty(&self.domain),
            since: self.since.map(|t| t.timestamp()),
            count: self.count(),
            offset: self.offset(),
        }
    }

    pub fn to_json(&self, credentials: &Credentials) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_payload(credentials))?)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// The exact body posted to `/v3/get`.
#[derive(Debug, Serialize)]
pub struct GetPayload<'a> {
    consumer_key: &'a str,
    access_token: &'a str,
    state: QueryState,
    #[serde(skip_serializing_if = "Option::is_none")]
    favorite: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
    #[serde(rename = "contentType")]
    content_type: QueryContentType,
    sort: QuerySort,
    #[serde(rename = "detailType")]
    detail_type: QueryDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    since: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::{json, Value};

    fn creds() -> Credentials {
        Credentials::new("ck", "at")
    }

    fn payload(options: Vec<QueryOption>) -> serde_json::Map<String, Value> {
        match GetQuery::new(options).to_json(&creds()).unwrap() {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn defaults_only_send_required_keys() {
        let p = payload(vec![]);
        assert_eq!(
            Value::Object(p),
            json!({
                "consumer_key": "ck",
                "access_token": "at",
                "state": "all",
                "contentType": "article",
                "sort": "newest",
                "detailType": "complete",
            })
        );
    }

    #[test]
    fn favorite_is_sent_only_when_filtering() {
        assert_eq!(
            payload(vec![QueryOption::Favorite(QueryFavorite::Only)])["favorite"],
            json!(1)
        );
        assert_eq!(
            payload(vec![QueryOption::Favorite(QueryFavorite::Excluded)])["favorite"],
            json!(0)
        );
        assert!(!payload(vec![QueryOption::Favorite(QueryFavorite::Any)]).contains_key("favorite"));
    }

    #[test]
    fn empty_strings_are_omitted() {
        let p = payload(vec![
            QueryOption::Tag(String::new()),
            QueryOption::Search(String::new()),
            QueryOption::Domain(String::new()),
        ]);
        assert!(!p.contains_key("tag"));
        assert!(!p.contains_key("search"));
        assert!(!p.contains_key("domain"));
    }

    #[test]
    fn untagged_uses_the_sentinel() {
        assert_eq!(payload(vec![QueryOption::untagged()])["tag"], json!("_untagged_"));
    }

    #[test]
    fn pagination_sends_count_and_offset() {
        let p = payload(vec![QueryOption::pagination(5, 2)]);
        assert_eq!(p["count"], json!(5));
        assert_eq!(p["offset"], json!(2));
    }

    #[test]
    fn negative_count_is_ignored() {
        let p = payload(vec![QueryOption::pagination(-1, 2)]);
        assert!(!p.contains_key("count"));
        assert!(!p.contains_key("offset"));

        let p = payload(vec![
            QueryOption::pagination(10, 3),
            QueryOption::pagination(-1, 7),
        ]);
        assert_eq!(p["count"], json!(10));
        assert_eq!(p["offset"], json!(3));
    }

    #[test]
    fn offset_needs_a_positive_count() {
        let p = payload(vec![QueryOption::pagination(0, 4)]);
        assert!(!p.contains_key("count"));
        assert!(!p.contains_key("offset"));

        let p = payload(vec![QueryOption::pagination(3, 0)]);
        assert_eq!(p["count"], json!(3));
        assert!(!p.contains_key("offset"));
    }

    #[test]
    fn since_is_unix_seconds_in_any_timezone() {
        let utc = Utc.with_ymd_and_hms(2017, 12, 16, 0, 0, 0).unwrap();
        let paris = utc.with_timezone(&FixedOffset::east_opt(3600).unwrap());

        assert_eq!(payload(vec![QueryOption::since(&utc)])["since"], json!(1513382400));
        assert_eq!(payload(vec![QueryOption::since(&paris)])["since"], json!(1513382400));
    }

    #[test]
    fn last_write_wins_and_fields_commute() {
        let a = GetQuery::new(vec![
            QueryOption::Sort(QuerySort::Title),
            QueryOption::State(QueryState::Unread),
            QueryOption::Sort(QuerySort::Oldest),
        ]);
        let b = GetQuery::new(vec![
            QueryOption::State(QueryState::Unread),
            QueryOption::Sort(QuerySort::Oldest),
        ]);
        assert_eq!(a, b);
        assert_eq!(a.sort(), QuerySort::Oldest);
    }

    #[test]
    fn builder_matches_option_list() {
        let built = GetQuery::default()
            .with(QueryOption::Tag("golang".into()))
            .with(QueryOption::pagination(10, 0));
        let listed = GetQuery::new(vec![
            QueryOption::Tag("golang".into()),
            QueryOption::pagination(10, 0),
        ]);
        assert_eq!(built, listed);
        assert_eq!(built.count(), Some(10));
        assert_eq!(built.offset(), None);
    }

    #[test]
    fn every_field_set_matches_literal_payload() {
        let since = Utc.with_ymd_and_hms(2017, 12, 16, 0, 0, 0).unwrap();
        let query = GetQuery::new(vec![
            QueryOption::State(QueryState::Archive),
            QueryOption::Favorite(QueryFavorite::Excluded),
            QueryOption::Tag("golang".into()),
            QueryOption::ContentType(QueryContentType::Video),
            QueryOption::Sort(QuerySort::Site),
            QueryOption::Detail(QueryDetail::Simple),
            QueryOption::Search("rust".into()),
            QueryOption::Domain("example.com".into()),
            QueryOption::since(&since),
            QueryOption::pagination(20, 40),
        ]);

        let encoded = serde_json::to_string(&query.to_payload(&creds())).unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            decoded,
            json!({
                "consumer_key": "ck",
                "access_token": "at",
                "state": "archive",
                "favorite": 0,
                "tag": "golang",
                "contentType": "video",
                "sort": "site",
                "detailType": "simple",
                "search": "rust",
                "domain": "example.com",
                "since": 1513382400,
                "count": 20,
                "offset": 40,
            })
        );
    }

    #[test]
    fn parses_literals_case_insensitively() {
        assert_eq!("Unread".parse::<QueryState>().unwrap(), QueryState::Unread);
        assert_eq!("ONLY".parse::<QueryFavorite>().unwrap(), QueryFavorite::Only);
        assert_eq!("image".parse::<QueryContentType>().unwrap(), QueryContentType::Image);
        assert_eq!("site".parse::<QuerySort>().unwrap(), QuerySort::Site);
        assert_eq!("simple".parse::<QueryDetail>().unwrap(), QueryDetail::Simple);

        let err = "sideways".parse::<QuerySort>().unwrap_err();
        assert!(err.to_string().contains("newest, oldest, title, site"));
    }
}
