//! TMDB-backed catalog.
//!
//! Uses The Movie Database v3 REST API for the now-playing list and reviews.
//! TMDB has no showtime or ticketing endpoints, so those two operations are
//! served from the in-memory schedule; a real deployment would swap in a
//! vendor client behind the same trait.

use crate::fixtures::StaticCatalog;
use async_trait::async_trait;
use marquee_core::catalog::{
    CatalogError, CatalogResult, Movie, MovieCatalog, Review, Showtime, TicketConfirmation,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default TMDB API root.
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// How many now-playing entries to hand back to the model.
const NOW_PLAYING_LIMIT: usize = 10;

/// Configuration for the TMDB client.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// TMDB v3 API key.
    pub api_key: String,

    /// API root URL.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl TmdbConfig {
    /// Create a configuration with the default API root.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: TMDB_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create a configuration with the API key read from an environment
    /// variable.
    pub fn from_env(env_var: &str) -> CatalogResult<Self> {
        let api_key = std::env::var(env_var).map_err(|_| {
            CatalogError::Lookup(format!("missing environment variable: {env_var}"))
        })?;
        Ok(Self::new(api_key))
    }

    /// Override the API root (for tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Catalog backed by the TMDB API, with the in-memory schedule for
/// showtimes and ticketing.
pub struct TmdbCatalog {
    config: TmdbConfig,
    client: Client,
    schedule: StaticCatalog,
}

impl TmdbCatalog {
    /// Create a catalog client with the given configuration.
    pub fn new(config: TmdbConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            config,
            client,
            schedule: StaticCatalog::new(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> CatalogResult<T> {
        let url = format!(
            "{}{}?api_key={}&language=en-US",
            self.config.base_url, path, self.config.api_key
        );
        debug!(%path, "TMDB request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Lookup(format!("TMDB request failed: {e}")))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| CatalogError::Lookup(format!("malformed TMDB payload: {e}"))),
            StatusCode::NOT_FOUND => Err(CatalogError::MovieNotFound(path.to_string())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(CatalogError::Lookup(format!("TMDB error {status}: {body}")))
            }
        }
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn now_playing(&self) -> CatalogResult<Vec<Movie>> {
        let page: TmdbPage = self.get_json("/movie/now_playing").await?;
        Ok(page
            .results
            .into_iter()
            .take(NOW_PLAYING_LIMIT)
            .map(|m| Movie {
                title: m.title,
                id: m.id.to_string(),
                release_date: m.release_date,
                overview: m.overview,
            })
            .collect())
    }

    async fn showtimes(&self, title: &str, location: &str) -> CatalogResult<Vec<Showtime>> {
        self.schedule.showtimes(title, location).await
    }

    async fn reviews(&self, movie_id: &str) -> CatalogResult<Vec<Review>> {
        if movie_id.is_empty() || !movie_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CatalogError::MovieNotFound(movie_id.to_string()));
        }

        let page: TmdbReviewPage = self.get_json(&format!("/movie/{movie_id}/reviews")).await?;
        Ok(page
            .results
            .into_iter()
            .map(|r| Review {
                author: r.author,
                content: r.content,
                rating: r.author_details.and_then(|d| d.rating),
            })
            .collect())
    }

    async fn buy_ticket(
        &self,
        theater: &str,
        movie: &str,
        showtime: &str,
    ) -> CatalogResult<TicketConfirmation> {
        self.schedule.buy_ticket(theater, movie, showtime).await
    }
}

// TMDB API types
#[derive(Debug, Deserialize)]
struct TmdbPage {
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    title: String,
    #[serde(default)]
    release_date: String,
    #[serde(default)]
    overview: String,
}

#[derive(Debug, Deserialize)]
struct TmdbReviewPage {
    results: Vec<TmdbReview>,
}

#[derive(Debug, Deserialize)]
struct TmdbReview {
    author: String,
    content: String,
    author_details: Option<TmdbAuthorDetails>,
}

#[derive(Debug, Deserialize)]
struct TmdbAuthorDetails {
    rating: Option<f32>,
}
