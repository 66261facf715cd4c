//! Movie-catalog interface: the external operations behind the actions.
//!
//! The dispatch core never fetches movie data itself. Each registered action
//! maps onto one method of [`MovieCatalog`], and implementations (HTTP
//! clients, in-memory fixtures) live in the `marquee-movies` crate. Handlers
//! may block on network I/O; callers that need bounded latency wrap the call
//! with their own deadline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// A movie currently in theaters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Display title.
    pub title: String,

    /// Catalog identifier, usable with the reviews lookup.
    pub id: String,

    /// Release date, `YYYY-MM-DD`.
    pub release_date: String,

    /// Short synopsis.
    pub overview: String,
}

/// A single scheduled showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showtime {
    /// Theater name.
    pub theater: String,

    /// Start time as displayed to the user, e.g. `"7:30 PM"`.
    pub starts_at: String,
}

/// One review of a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer name or handle.
    pub author: String,

    /// Review text.
    pub content: String,

    /// Score out of 10, when the reviewer gave one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

/// Receipt for a completed ticket purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketConfirmation {
    /// Booking reference.
    pub confirmation_code: String,

    /// Theater the ticket is for.
    pub theater: String,

    /// Movie the ticket is for.
    pub movie: String,

    /// Showing the ticket is for.
    pub showtime: String,
}

/// Failures surfaced by catalog implementations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested movie is not in the catalog.
    #[error("movie not found: {0}")]
    MovieNotFound(String),

    /// No showtime data for the given title/location pair.
    #[error("no showtimes for '{title}' near {location}")]
    NoShowtimes {
        /// Requested movie title.
        title: String,
        /// Requested city or zip code.
        location: String,
    },

    /// The requested showing does not exist.
    #[error("no such showing: '{movie}' at {theater}, {showtime}")]
    UnknownShowing {
        /// Requested theater.
        theater: String,
        /// Requested movie.
        movie: String,
        /// Requested showtime.
        showtime: String,
    },

    /// The showing exists but has no seats left.
    #[error("showing sold out: '{movie}' at {theater}, {showtime}")]
    SoldOut {
        /// Requested theater.
        theater: String,
        /// Requested movie.
        movie: String,
        /// Requested showtime.
        showtime: String,
    },

    /// Upstream lookup failed (network, auth, malformed payload).
    #[error("catalog lookup failed: {0}")]
    Lookup(String),
}

/// The four external operations the model can request.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// List movies currently playing in theaters.
    async fn now_playing(&self) -> CatalogResult<Vec<Movie>>;

    /// Showtimes for a title in a city or zip code.
    async fn showtimes(&self, title: &str, location: &str) -> CatalogResult<Vec<Showtime>>;

    /// Reviews for a movie id.
    async fn reviews(&self, movie_id: &str) -> CatalogResult<Vec<Review>>;

    /// Purchase one ticket for a specific showing.
    async fn buy_ticket(
        &self,
        theater: &str,
        movie: &str,
        showtime: &str,
    ) -> CatalogResult<TicketConfirmation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serialization() {
        let movie = Movie {
            title: "Dune".to_string(),
            id: "438631".to_string(),
            release_date: "2021-10-22".to_string(),
            overview: "Paul Atreides leads nomadic tribes.".to_string(),
        };
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["title"], "Dune");

        let back: Movie = serde_json::from_value(json).unwrap();
        assert_eq!(back, movie);
    }

    #[test]
    fn test_review_rating_omitted_when_absent() {
        let review = Review {
            author: "anon".to_string(),
            content: "Loved it.".to_string(),
            rating: None,
        };
        let json = serde_json::to_value(&review).unwrap();
        assert!(json.get("rating").is_none());
    }

    #[test]
    fn test_error_messages_name_the_request() {
        let err = CatalogError::NoShowtimes {
            title: "Dune".to_string(),
            location: "94158".to_string(),
        };
        assert!(err.to_string().contains("Dune"));
        assert!(err.to_string().contains("94158"));
    }
}
