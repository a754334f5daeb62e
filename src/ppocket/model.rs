use crate::error::{PocketError, Result};
use chrono::{DateTime, Utc};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// The application key plus the per-user access token.
///
/// Neither value expires from our point of view; keeping them fresh is the
/// caller's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub access_token: String,
}

impl Credentials {
    pub fn new(consumer_key: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            access_token: access_token.into(),
        }
    }

    /// Fails before any network call when either half is missing.
    pub fn validate(&self) -> Result<()> {
        if self.consumer_key.trim().is_empty() {
            return Err(PocketError::Config("Consumer key is missing".into()));
        }
        if self.access_token.trim().is_empty() {
            return Err(PocketError::Config("Access token is missing".into()));
        }
        Ok(())
    }
}

/// Outcome of a successful authorization handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub access_token: String,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ItemStatus {
    Unread,
    Archived,
    Deleted,
}

impl TryFrom<String> for ItemStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "0" => Ok(ItemStatus::Unread),
            "1" => Ok(ItemStatus::Archived),
            "2" => Ok(ItemStatus::Deleted),
            other => Err(format!("unknown item status: {other:?}")),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemStatus::Unread => "unread",
            ItemStatus::Archived => "archived",
            ItemStatus::Deleted => "deleted",
        };
        f.write_str(label)
    }
}

/// Favorite flag as reported by the service. Anything other than "0"/"1"
/// (or an absent field) is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum ItemFavorite {
    Favorite,
    NotFavorite,
    #[default]
    Unknown,
}

impl From<String> for ItemFavorite {
    fn from(value: String) -> Self {
        match value.as_str() {
            "1" => ItemFavorite::Favorite,
            "0" => ItemFavorite::NotFavorite,
            _ => ItemFavorite::Unknown,
        }
    }
}

impl fmt::Display for ItemFavorite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemFavorite::Favorite => "yes",
            ItemFavorite::NotFavorite => "no",
            ItemFavorite::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemTag {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub tag: String,
}

/// One bookmark as returned by `/v3/get`.
///
/// Most scalars come back as strings, including the numeric ones; they are
/// kept verbatim and interpreted through the accessor methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub resolved_id: String,
    #[serde(default)]
    pub given_url: String,
    #[serde(default)]
    pub resolved_url: String,
    #[serde(default)]
    pub given_title: String,
    #[serde(default)]
    pub resolved_title: String,
    #[serde(default)]
    pub favorite: ItemFavorite,
    /// `None` when the service left it out.
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub is_article: String,
    #[serde(default)]
    pub has_video: String,
    #[serde(default)]
    pub has_image: String,
    #[serde(default)]
    pub word_count: String,
    #[serde(default)]
    pub tags: BTreeMap<String, ItemTag>,
    #[serde(default)]
    pub time_added: String,
    #[serde(default)]
    pub time_updated: String,
    #[serde(default)]
    pub sort_id: Option<u64>,
}

impl Item {
    pub fn title(&self) -> &str {
        if self.resolved_title.is_empty() {
            &self.given_title
        } else {
            &self.resolved_title
        }
    }

    pub fn url(&self) -> &str {
        if self.given_url.is_empty() {
            &self.resolved_url
        } else {
            &self.given_url
        }
    }

    pub fn is_article(&self) -> bool {
        self.is_article == "1"
    }

    /// "1" means the item contains videos, "2" means it is a video.
    pub fn has_video(&self) -> bool {
        matches!(self.has_video.as_str(), "1" | "2")
    }

    pub fn has_image(&self) -> bool {
        matches!(self.has_image.as_str(), "1" | "2")
    }

    pub fn word_count(&self) -> Option<u32> {
        self.word_count.trim().parse().ok()
    }

    pub fn reading_minutes(&self, words_per_minute: u32) -> Option<u32> {
        if words_per_minute == 0 {
            return None;
        }
        self.word_count().map(|wc| wc / words_per_minute)
    }

    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        let secs: i64 = self.time_added.trim().parse().ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }
}

/// The complete answer to one `/v3/get` call. No merging across pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub status: Option<u8>,
    #[serde(default)]
    pub complete: Option<u8>,
    #[serde(default)]
    pub since: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub list: BTreeMap<String, Item>,
}

impl ResultSet {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| PocketError::decode("list", e))
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Items in the order the server sorted them (by `sort_id`). Items
    /// without one go last, by id.
    pub fn items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.list.values().collect();
        items.sort_by(|a, b| match (a.sort_id, b.sort_id) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.item_id.cmp(&b.item_id),
        });
        items
    }
}

// The service answers `"list": []` instead of `{}` when nothing matches.
fn deserialize_list<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, Item>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ListVisitor)
}

struct ListVisitor;

impl<'de> Visitor<'de> for ListVisitor {
    type Value = BTreeMap<String, Item>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of items keyed by id, or an array of items")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut items = BTreeMap::new();
        while let Some((id, item)) = map.next_entry::<String, Item>()? {
            items.insert(id, item);
        }
        Ok(items)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = BTreeMap::new();
        while let Some(item) = seq.next_element::<Item>()? {
            items.insert(item.item_id.clone(), item);
        }
        Ok(items)
    }

    fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
        Ok(BTreeMap::new())
    }
}
