//! Movie-catalog implementations for marquee.
//!
//! Two implementations of the `MovieCatalog` trait from `marquee-core`:
//!
//! - [`TmdbCatalog`] - now-playing and reviews over the TMDB v3 API, with
//!   the in-memory schedule serving showtimes and ticketing
//! - [`StaticCatalog`] - fully deterministic fixture data for offline use
//!   and tests

pub mod fixtures;
pub mod tmdb;

pub use fixtures::StaticCatalog;
pub use tmdb::{TmdbCatalog, TmdbConfig};
