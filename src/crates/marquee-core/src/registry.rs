//! Action registry: the closed set of functions the model may request.
//!
//! Dispatch from a wire-level name resolves into [`ActionKind`] exactly
//! once; everything downstream matches on the enum, so adding an action is a
//! compile-time exhaustiveness check rather than a stringly-typed branch.
//! The registry is immutable and process-wide — there is no dynamic
//! registration.

/// One registered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// List movies currently in theaters.
    NowPlaying,

    /// Fetch showtimes for a title in a location.
    Showtimes,

    /// Fetch reviews for a movie id.
    Reviews,

    /// Purchase a ticket for a specific showing. Irreversible, so it is
    /// gated behind an explicit user confirmation.
    BuyTicket,
}

impl ActionKind {
    /// Every registered action, in declaration order.
    pub const ALL: [ActionKind; 4] = [
        ActionKind::NowPlaying,
        ActionKind::Showtimes,
        ActionKind::Reviews,
        ActionKind::BuyTicket,
    ];

    /// Resolve a wire-level function name. Unknown names are a miss, never
    /// a panic.
    pub fn resolve(name: &str) -> Option<ActionKind> {
        match name {
            "get_now_playing_movies" => Some(ActionKind::NowPlaying),
            "get_showtimes" => Some(ActionKind::Showtimes),
            "get_reviews" => Some(ActionKind::Reviews),
            "buy_ticket" => Some(ActionKind::BuyTicket),
            _ => None,
        }
    }

    /// The wire-level function name.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::NowPlaying => "get_now_playing_movies",
            ActionKind::Showtimes => "get_showtimes",
            ActionKind::Reviews => "get_reviews",
            ActionKind::BuyTicket => "buy_ticket",
        }
    }

    /// Declared parameter names, in call order.
    pub fn params(&self) -> &'static [&'static str] {
        match self {
            ActionKind::NowPlaying => &[],
            ActionKind::Showtimes => &["title", "location"],
            ActionKind::Reviews => &["movie_id"],
            ActionKind::BuyTicket => &["theater", "movie", "showtime"],
        }
    }

    /// True for actions whose side effect is irreversible and therefore
    /// require a second user acknowledgment before execution.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, ActionKind::BuyTicket)
    }
}
