//! Deterministic in-memory catalog.
//!
//! Backs the offline mode and the integration tests: fixed movies, a fixed
//! showtime schedule, and a seat count per showing so a sold-out purchase is
//! reproducible. Matching on titles, theaters, and locations is
//! case-insensitive; users type these by hand.

use async_trait::async_trait;
use marquee_core::catalog::{
    CatalogError, CatalogResult, Movie, MovieCatalog, Review, Showtime, TicketConfirmation,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// One scheduled showing in the fixture data.
#[derive(Debug, Clone)]
struct Listing {
    title: &'static str,
    location: &'static str,
    theater: &'static str,
    starts_at: &'static str,
    seats: u32,
}

const MOVIES: &[(&str, &str, &str, &str)] = &[
    (
        "Dune: Part Two",
        "693134",
        "2024-02-28",
        "Paul Atreides unites with Chani and the Fremen while seeking revenge against the conspirators who destroyed his family.",
    ),
    (
        "The Wild Robot",
        "1184918",
        "2024-09-12",
        "A shipwrecked robot learns to adapt to the island's animals and becomes the adoptive parent of an orphaned gosling.",
    ),
    (
        "Conclave",
        "974576",
        "2024-10-25",
        "A cardinal manages the secretive process of electing a new pope while uncovering a trail of secrets.",
    ),
    (
        "Flow",
        "823219",
        "2024-08-29",
        "A solitary cat displaced by a great flood finds refuge on a boat with other species.",
    ),
];

const SCHEDULE: &[Listing] = &[
    Listing {
        title: "Dune: Part Two",
        location: "94158",
        theater: "AMC Metreon",
        starts_at: "4:15 PM",
        seats: 40,
    },
    Listing {
        title: "Dune: Part Two",
        location: "94158",
        theater: "AMC Metreon",
        starts_at: "7:30 PM",
        seats: 12,
    },
    Listing {
        title: "Dune: Part Two",
        location: "san francisco",
        theater: "Roxie Theater",
        starts_at: "9:45 PM",
        seats: 0,
    },
    Listing {
        title: "The Wild Robot",
        location: "94158",
        theater: "AMC Metreon",
        starts_at: "5:00 PM",
        seats: 55,
    },
    Listing {
        title: "Conclave",
        location: "san francisco",
        theater: "Roxie Theater",
        starts_at: "6:20 PM",
        seats: 30,
    },
];

const REVIEWS: &[(&str, &str, &str, Option<f32>)] = &[
    (
        "693134",
        "screenjunkie",
        "A staggering achievement in scale and sound. The sandworm sequences alone are worth the ticket.",
        Some(9.0),
    ),
    (
        "693134",
        "quietcritic",
        "Gorgeous but glacial in its middle hour.",
        Some(6.5),
    ),
    (
        "1184918",
        "animation_fan",
        "The warmest film of the year. Bring tissues.",
        Some(8.5),
    ),
];

/// In-memory catalog with fixed data and mutable seat counts.
pub struct StaticCatalog {
    seats: Mutex<Vec<u32>>,
    next_confirmation: AtomicU32,
}

impl StaticCatalog {
    /// Create a catalog with the built-in fixture data.
    pub fn new() -> Self {
        Self {
            seats: Mutex::new(SCHEDULE.iter().map(|l| l.seats).collect()),
            next_confirmation: AtomicU32::new(1),
        }
    }

    fn movie_by_title(&self, title: &str) -> Option<Movie> {
        MOVIES
            .iter()
            .find(|(t, _, _, _)| t.eq_ignore_ascii_case(title))
            .map(|&(title, id, release_date, overview)| Movie {
                title: title.to_string(),
                id: id.to_string(),
                release_date: release_date.to_string(),
                overview: overview.to_string(),
            })
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovieCatalog for StaticCatalog {
    async fn now_playing(&self) -> CatalogResult<Vec<Movie>> {
        Ok(MOVIES
            .iter()
            .map(|&(title, id, release_date, overview)| Movie {
                title: title.to_string(),
                id: id.to_string(),
                release_date: release_date.to_string(),
                overview: overview.to_string(),
            })
            .collect())
    }

    async fn showtimes(&self, title: &str, location: &str) -> CatalogResult<Vec<Showtime>> {
        if self.movie_by_title(title).is_none() {
            return Err(CatalogError::MovieNotFound(title.to_string()));
        }

        let matches: Vec<Showtime> = SCHEDULE
            .iter()
            .filter(|l| {
                l.title.eq_ignore_ascii_case(title) && l.location.eq_ignore_ascii_case(location)
            })
            .map(|l| Showtime {
                theater: l.theater.to_string(),
                starts_at: l.starts_at.to_string(),
            })
            .collect();

        if matches.is_empty() {
            return Err(CatalogError::NoShowtimes {
                title: title.to_string(),
                location: location.to_string(),
            });
        }
        Ok(matches)
    }

    async fn reviews(&self, movie_id: &str) -> CatalogResult<Vec<Review>> {
        let matches: Vec<Review> = REVIEWS
            .iter()
            .filter(|(id, _, _, _)| *id == movie_id)
            .map(|&(_, author, content, rating)| Review {
                author: author.to_string(),
                content: content.to_string(),
                rating,
            })
            .collect();

        if matches.is_empty() {
            return Err(CatalogError::MovieNotFound(movie_id.to_string()));
        }
        Ok(matches)
    }

    async fn buy_ticket(
        &self,
        theater: &str,
        movie: &str,
        showtime: &str,
    ) -> CatalogResult<TicketConfirmation> {
        let index = SCHEDULE.iter().position(|l| {
            l.theater.eq_ignore_ascii_case(theater)
                && l.title.eq_ignore_ascii_case(movie)
                && l.starts_at.eq_ignore_ascii_case(showtime)
        });

        let Some(index) = index else {
            return Err(CatalogError::UnknownShowing {
                theater: theater.to_string(),
                movie: movie.to_string(),
                showtime: showtime.to_string(),
            });
        };

        let mut seats = self.seats.lock().expect("seat table poisoned");
        if seats[index] == 0 {
            return Err(CatalogError::SoldOut {
                theater: theater.to_string(),
                movie: movie.to_string(),
                showtime: showtime.to_string(),
            });
        }
        seats[index] -= 1;

        let code = self.next_confirmation.fetch_add(1, Ordering::SeqCst);
        Ok(TicketConfirmation {
            confirmation_code: format!("MRQ-{code:04}"),
            theater: SCHEDULE[index].theater.to_string(),
            movie: SCHEDULE[index].title.to_string(),
            showtime: SCHEDULE[index].starts_at.to_string(),
        })
    }
}
