//! Catalog wire formats
//!
//! Raw shapes as the catalog service returns them, converted into the
//! tagged `CatalogItem` union here and nowhere else. List payloads carry a
//! `media_type` discriminator per entry; detail payloads don't, so the
//! kind is attached by the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{de_lenient_date, CatalogItem, MediaKind, MovieItem, SeriesItem};

/// Top-level shape of every list endpoint
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub results: Vec<ListEntry>,
}

/// One entry of a list payload
///
/// Multi-search results mix movies, series, and people; entries that don't
/// resolve to a known media kind are dropped at this boundary.
#[derive(Debug, Deserialize)]
pub struct ListEntry {
    pub id: Option<u64>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_date")]
    pub release_date: Option<NaiveDate>,
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

impl ListEntry {
    /// Resolve into the tagged union, or `None` for entries that aren't a
    /// movie or a series
    pub fn resolve(self) -> Option<CatalogItem> {
        let id = self.id?;
        let kind: MediaKind = self.media_type.as_deref()?.parse().ok()?;

        Some(match kind {
            MediaKind::Movie => CatalogItem::Movie(MovieItem {
                id,
                title: self.title.or(self.name).unwrap_or_default(),
                release_date: self.release_date,
                vote_average: self.vote_average,
                poster_path: self.poster_path,
                backdrop_path: self.backdrop_path,
                overview: self.overview,
                genre_ids: self.genre_ids,
            }),
            MediaKind::Series => CatalogItem::Series(SeriesItem {
                id,
                name: self.name.or(self.title).unwrap_or_default(),
                first_air_date: self.first_air_date,
                vote_average: self.vote_average,
                poster_path: self.poster_path,
                backdrop_path: self.backdrop_path,
                overview: self.overview,
                genre_ids: self.genre_ids,
            }),
        })
    }
}

/// A movie detail payload
#[derive(Debug, Deserialize)]
pub struct MovieDetail {
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
    pub genres: Vec<Genre>,
}

impl From<MovieDetail> for CatalogItem {
    fn from(detail: MovieDetail) -> Self {
        CatalogItem::Movie(MovieItem {
            id: detail.id,
            title: detail.title,
            release_date: detail.release_date,
            vote_average: detail.vote_average,
            poster_path: detail.poster_path,
            backdrop_path: detail.backdrop_path,
            overview: detail.overview,
            genre_ids: detail.genres.into_iter().map(|g| g.id).collect(),
        })
    }
}

/// A series detail payload
#[derive(Debug, Deserialize)]
pub struct SeriesDetail {
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
    pub genres: Vec<Genre>,
}

impl From<SeriesDetail> for CatalogItem {
    fn from(detail: SeriesDetail) -> Self {
        CatalogItem::Series(SeriesItem {
            id: detail.id,
            name: detail.name,
            first_air_date: detail.first_air_date,
            vote_average: detail.vote_average,
            poster_path: detail.poster_path,
            backdrop_path: detail.backdrop_path,
            overview: detail.overview,
            genre_ids: detail.genres.into_iter().map(|g| g.id).collect(),
        })
    }
}

/// A genre as listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Shape of the genre list endpoints
#[derive(Debug, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_entry_resolves_movie() {
        let json = serde_json::json!({
            "id": 550,
            "media_type": "movie",
            "title": "Fight Club",
            "release_date": "1999-10-15",
            "vote_average": 8.4,
            "poster_path": "/poster.jpg",
            "genre_ids": [18]
        });

        let entry: ListEntry = serde_json::from_value(json).unwrap();
        let item = entry.resolve().unwrap();

        assert_eq!(item.id(), 550);
        assert_eq!(item.kind(), MediaKind::Movie);
        assert_eq!(item.display_title(), "Fight Club");
        assert_eq!(item.air_date(), NaiveDate::from_ymd_opt(1999, 10, 15));
    }

    #[test]
    fn test_list_entry_resolves_series() {
        let json = serde_json::json!({
            "id": 1399,
            "media_type": "tv",
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17"
        });

        let entry: ListEntry = serde_json::from_value(json).unwrap();
        let item = entry.resolve().unwrap();

        assert_eq!(item.kind(), MediaKind::Series);
        assert_eq!(item.display_title(), "Game of Thrones");
    }

    #[test]
    fn test_person_entry_is_dropped() {
        let json = serde_json::json!({
            "id": 287,
            "media_type": "person",
            "name": "Brad Pitt"
        });

        let entry: ListEntry = serde_json::from_value(json).unwrap();
        assert!(entry.resolve().is_none());
    }

    #[test]
    fn test_entry_without_media_type_is_dropped() {
        let json = serde_json::json!({ "id": 1, "title": "Untyped" });
        let entry: ListEntry = serde_json::from_value(json).unwrap();
        assert!(entry.resolve().is_none());
    }

    #[test]
    fn test_list_response_with_empty_results() {
        let response: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_movie_detail_conversion() {
        let json = serde_json::json!({
            "id": 27205,
            "title": "Inception",
            "release_date": "2010-07-16",
            "vote_average": 8.3,
            "overview": "A thief who steals corporate secrets...",
            "genres": [ { "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" } ]
        });

        let detail: MovieDetail = serde_json::from_value(json).unwrap();
        let item: CatalogItem = detail.into();

        assert_eq!(item.id(), 27205);
        assert_eq!(item.kind(), MediaKind::Movie);
        match &item {
            CatalogItem::Movie(m) => assert_eq!(m.genre_ids, vec![28, 878]),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_series_detail_with_empty_air_date() {
        let json = serde_json::json!({
            "id": 999,
            "name": "Unaired",
            "first_air_date": ""
        });

        let detail: SeriesDetail = serde_json::from_value(json).unwrap();
        let item: CatalogItem = detail.into();
        assert!(item.air_date().is_none());
    }
}
