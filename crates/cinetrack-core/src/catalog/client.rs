//! Catalog service client
//!
//! Consumes the external movie/TV metadata service. Requests are plain
//! GETs carrying the API key and a locale; responses are JSON documents
//! converted to `CatalogItem` at this boundary.
//!
//! Failures never touch core entity state. Callers turn a `CatalogError`
//! into a user-visible message and move on.

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::catalog::models::{Genre, GenreList, ListResponse, MovieDetail, SeriesDetail};
use crate::config::Config;
use crate::models::{CatalogItem, MediaKind};
use crate::prefs::Language;

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Errors from the catalog service
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Catalog service returned HTTP {0}")]
    Status(u16),

    #[error("Failed to decode catalog response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// HTTP client for the catalog metadata service
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .build()
            .map_err(CatalogError::Request)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Trending movies and series for the week
    pub async fn trending(&self, language: Language) -> Result<Vec<CatalogItem>, CatalogError> {
        let response: ListResponse = self
            .get_json("trending/all/week", &[], language)
            .await?;
        Ok(resolve_entries(response))
    }

    /// Multi-search across movies and series
    ///
    /// People and other non-media results are dropped at the boundary.
    pub async fn search(
        &self,
        query: &str,
        language: Language,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let response: ListResponse = self
            .get_json("search/multi", &[("query", query)], language)
            .await?;
        Ok(resolve_entries(response))
    }

    /// Full record for one movie
    pub async fn movie(&self, id: u64, language: Language) -> Result<CatalogItem, CatalogError> {
        let detail: MovieDetail = self
            .get_json(&format!("movie/{}", id), &[], language)
            .await?;
        Ok(detail.into())
    }

    /// Full record for one series
    pub async fn series(&self, id: u64, language: Language) -> Result<CatalogItem, CatalogError> {
        let detail: SeriesDetail = self.get_json(&format!("tv/{}", id), &[], language).await?;
        Ok(detail.into())
    }

    /// Full record for one item of either kind
    ///
    /// Detail payloads carry no media discriminator; the kind requested
    /// here is the kind stored.
    pub async fn detail(
        &self,
        kind: MediaKind,
        id: u64,
        language: Language,
    ) -> Result<CatalogItem, CatalogError> {
        match kind {
            MediaKind::Movie => self.movie(id, language).await,
            MediaKind::Series => self.series(id, language).await,
        }
    }

    /// Movie and series genres merged, de-duplicated by genre id
    pub async fn genres(&self, language: Language) -> Result<Vec<Genre>, CatalogError> {
        let (movie_genres, series_genres) = tokio::try_join!(
            self.get_json::<GenreList>("genre/movie/list", &[], language),
            self.get_json::<GenreList>("genre/tv/list", &[], language),
        )?;

        let mut genres = movie_genres.genres;
        for genre in series_genres.genres {
            if !genres.iter().any(|g| g.id == genre.id) {
                genres.push(genre);
            }
        }
        Ok(genres)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        language: Language,
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, locale = language.api_locale(), "catalog request");

        let mut query: Vec<(&str, &str)> = vec![
            ("api_key", self.api_key.as_str()),
            ("language", language.api_locale()),
        ];
        query.extend_from_slice(params);

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(CatalogError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        response.json().await.map_err(CatalogError::Decode)
    }
}

fn resolve_entries(response: ListResponse) -> Vec<CatalogItem> {
    response
        .results
        .into_iter()
        .filter_map(|entry| entry.resolve())
        .collect()
}
