//! Data models for cinetrack
//!
//! Catalog items are a tagged union over the two media kinds. The shape
//! differences of the catalog wire format (`title` vs `name`, `release_date`
//! vs `first_air_date`) are resolved once at the collaborator boundary;
//! everything downstream goes through the shared accessors.
//!
//! Identity for all set operations on stored lists is the numeric item id
//! alone. The media kind is not part of the dedup key.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The two media kinds served by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    /// The wire value used in catalog endpoints and stored records
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaKind::Movie),
            "tv" | "series" => Ok(MediaKind::Series),
            other => Err(format!("unknown media kind: {}", other)),
        }
    }
}

/// A catalog item stored in favorites or watchlist
///
/// Serialized with a `media_type` tag matching the catalog wire format, so
/// stored records read back the same way list-endpoint payloads do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type")]
pub enum CatalogItem {
    #[serde(rename = "movie")]
    Movie(MovieItem),
    #[serde(rename = "tv")]
    Series(SeriesItem),
}

/// Display metadata for a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieItem {
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "de_lenient_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

/// Display metadata for a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesItem {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "de_lenient_date")]
    pub first_air_date: Option<NaiveDate>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

impl MovieItem {
    /// Create a movie item with the given identity and title
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            release_date: None,
            vote_average: None,
            poster_path: None,
            backdrop_path: None,
            overview: None,
            genre_ids: Vec::new(),
        }
    }
}

impl SeriesItem {
    /// Create a series item with the given identity and name
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            first_air_date: None,
            vote_average: None,
            poster_path: None,
            backdrop_path: None,
            overview: None,
            genre_ids: Vec::new(),
        }
    }
}

impl CatalogItem {
    /// Identity for all set operations
    pub fn id(&self) -> u64 {
        match self {
            CatalogItem::Movie(m) => m.id,
            CatalogItem::Series(s) => s.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            CatalogItem::Movie(_) => MediaKind::Movie,
            CatalogItem::Series(_) => MediaKind::Series,
        }
    }

    /// Title for movies, name for series
    pub fn display_title(&self) -> &str {
        match self {
            CatalogItem::Movie(m) => &m.title,
            CatalogItem::Series(s) => &s.name,
        }
    }

    /// Release date for movies, first air date for series
    pub fn air_date(&self) -> Option<NaiveDate> {
        match self {
            CatalogItem::Movie(m) => m.release_date,
            CatalogItem::Series(s) => s.first_air_date,
        }
    }

    pub fn rating(&self) -> Option<f64> {
        match self {
            CatalogItem::Movie(m) => m.vote_average,
            CatalogItem::Series(s) => s.vote_average,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            CatalogItem::Movie(m) => m.poster_path.as_deref(),
            CatalogItem::Series(s) => s.poster_path.as_deref(),
        }
    }

    pub fn overview(&self) -> Option<&str> {
        match self {
            CatalogItem::Movie(m) => m.overview.as_deref(),
            CatalogItem::Series(s) => s.overview.as_deref(),
        }
    }
}

/// Parse an optional date field, tolerating the catalog's empty-string and
/// malformed date values by mapping them to `None`
pub(crate) fn de_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
}

/// How an account was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Registered locally with a password
    Local,
    /// Provisioned by an external identity provider
    External,
}

/// A registered account as stored in the directory
///
/// Credentials are kept in cleartext to preserve the storage and comparison
/// semantics of the system this reproduces. Accounts are never deleted;
/// they are only appended and updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    /// None for external-provider accounts
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    pub provider: AuthProvider,
    /// Identity-provider subject, the idempotency key for external accounts
    #[serde(default)]
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// The credential-stripped projection used in the session blob
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            provider: self.provider,
        }
    }
}

/// Default avatar reference for new accounts
pub(crate) fn default_avatar() -> String {
    "default-avatar".to_string()
}

/// An account without its credential, safe to hand to the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    pub provider: AuthProvider,
}

/// A user review attached to a catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub rating: Option<f64>,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str) -> CatalogItem {
        let mut item = MovieItem::new(id, title);
        item.release_date = NaiveDate::from_ymd_opt(2020, 6, 15);
        item.vote_average = Some(7.2);
        item.poster_path = Some("/poster.jpg".to_string());
        CatalogItem::Movie(item)
    }

    fn series(id: u64, name: &str) -> CatalogItem {
        let mut item = SeriesItem::new(id, name);
        item.first_air_date = NaiveDate::from_ymd_opt(2019, 1, 10);
        item.vote_average = Some(8.1);
        CatalogItem::Series(item)
    }

    #[test]
    fn test_accessors_resolve_per_kind() {
        let m = movie(550, "Fight Club");
        assert_eq!(m.id(), 550);
        assert_eq!(m.kind(), MediaKind::Movie);
        assert_eq!(m.display_title(), "Fight Club");
        assert_eq!(m.air_date(), NaiveDate::from_ymd_opt(2020, 6, 15));

        let s = series(1399, "Game of Thrones");
        assert_eq!(s.kind(), MediaKind::Series);
        assert_eq!(s.display_title(), "Game of Thrones");
        assert_eq!(s.air_date(), NaiveDate::from_ymd_opt(2019, 1, 10));
    }

    #[test]
    fn test_item_serialization_carries_media_type_tag() {
        let item = movie(550, "Fight Club");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["media_type"], "movie");
        assert_eq!(json["id"], 550);

        let round_tripped: CatalogItem = serde_json::from_value(json).unwrap();
        assert_eq!(round_tripped, item);
    }

    #[test]
    fn test_series_tag_is_tv() {
        let item = series(1399, "Game of Thrones");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["media_type"], "tv");
    }

    #[test]
    fn test_empty_date_string_parses_as_none() {
        let json = serde_json::json!({
            "media_type": "movie",
            "id": 1,
            "title": "Unreleased",
            "release_date": ""
        });
        let item: CatalogItem = serde_json::from_value(json).unwrap();
        assert!(item.air_date().is_none());
        assert!(item.rating().is_none());
    }

    #[test]
    fn test_media_kind_parsing() {
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!("tv".parse::<MediaKind>().unwrap(), MediaKind::Series);
        assert_eq!("series".parse::<MediaKind>().unwrap(), MediaKind::Series);
        assert!("person".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_profile_strips_credential() {
        let account = Account {
            id: 7,
            username: "ana".to_string(),
            email: "a@b.com".to_string(),
            display_name: "Ana".to_string(),
            password: Some("abcdef".to_string()),
            avatar: default_avatar(),
            provider: AuthProvider::Local,
            external_id: None,
            created_at: Utc::now(),
        };

        let profile = account.profile();
        assert_eq!(profile.id, 7);
        assert_eq!(profile.username, "ana");

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password").is_none());
    }
}
