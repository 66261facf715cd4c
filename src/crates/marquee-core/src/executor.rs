//! Action executor: resolves, validates, and invokes parsed function calls.
//!
//! Every outcome — success, unknown name, bad arguments, handler failure —
//! is normalized into [`ActionOutcome`]. Nothing an action does can
//! propagate an error past this boundary; the dialogue loop must stay alive
//! after a failed lookup. The executor awaits a single in-flight call and
//! adds no concurrency of its own.

use crate::catalog::MovieCatalog;
use crate::registry::ActionKind;
use crate::wire::{ActionCall, ActionParams};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Normalized result of one action invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The handler succeeded; the payload is the action-specific result.
    Success(Value),

    /// The action could not be completed. The message is user-presentable.
    Error(String),
}

impl ActionOutcome {
    /// True for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success(_))
    }
}

/// Executes parsed action calls against a [`MovieCatalog`].
#[derive(Clone)]
pub struct Executor {
    catalog: Arc<dyn MovieCatalog>,
}

impl Executor {
    /// Create an executor over the given catalog.
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve and run one parsed call.
    ///
    /// Unknown names yield `Error("Unknown function <name>")` without
    /// invoking anything.
    pub async fn execute(&self, call: &ActionCall) -> ActionOutcome {
        let Some(kind) = ActionKind::resolve(&call.name) else {
            return ActionOutcome::Error(format!("Unknown function {}", call.name));
        };

        let args = match bind_params(kind, &call.params) {
            Ok(args) => args,
            Err(message) => return ActionOutcome::Error(message),
        };

        self.invoke(kind, &args).await
    }

    /// Run an already-resolved action with bound positional arguments.
    ///
    /// Used directly by the dialogue loop when a previously captured,
    /// confirmed purchase is finally executed.
    pub async fn invoke(&self, kind: ActionKind, args: &[String]) -> ActionOutcome {
        if args.len() != kind.params().len() {
            return ActionOutcome::Error(format!(
                "{} takes {} argument(s), got {}",
                kind.name(),
                kind.params().len(),
                args.len()
            ));
        }

        debug!(action = kind.name(), ?args, "invoking action handler");

        let result = match kind {
            ActionKind::NowPlaying => self
                .catalog
                .now_playing()
                .await
                .and_then(|movies| to_payload(&movies)),
            ActionKind::Showtimes => self
                .catalog
                .showtimes(&args[0], &args[1])
                .await
                .and_then(|showtimes| to_payload(&showtimes)),
            ActionKind::Reviews => self
                .catalog
                .reviews(&args[0])
                .await
                .and_then(|reviews| to_payload(&reviews)),
            ActionKind::BuyTicket => self
                .catalog
                .buy_ticket(&args[0], &args[1], &args[2])
                .await
                .and_then(|confirmation| to_payload(&confirmation)),
        };

        match result {
            Ok(payload) => ActionOutcome::Success(payload),
            Err(err) => ActionOutcome::Error(err.to_string()),
        }
    }
}

fn to_payload<T: serde::Serialize>(value: &T) -> crate::catalog::CatalogResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| crate::catalog::CatalogError::Lookup(format!("unserializable result: {e}")))
}

/// Coerce supplied arguments into the handler's declared call order.
///
/// Positional arguments must match the declared arity exactly. Named
/// arguments are looked up by declared name, in declared order, regardless
/// of how the map iterates; unknown extra names are ignored.
pub fn bind_params(kind: ActionKind, params: &ActionParams) -> Result<Vec<String>, String> {
    let declared = kind.params();

    match params {
        ActionParams::Positional(args) => {
            if args.len() != declared.len() {
                return Err(format!(
                    "{} takes {} argument(s) ({}), got {}",
                    kind.name(),
                    declared.len(),
                    declared.join(", "),
                    args.len()
                ));
            }
            Ok(args.clone())
        }
        ActionParams::Named(args) => declared
            .iter()
            .map(|&name| {
                args.get(name)
                    .cloned()
                    .ok_or_else(|| format!("{} is missing parameter '{}'", kind.name(), name))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CatalogError, CatalogResult, Movie, MovieCatalog, Review, Showtime, TicketConfirmation,
    };
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    /// Catalog stub: now-playing succeeds, everything else fails.
    struct OneMovieCatalog;

    #[async_trait]
    impl MovieCatalog for OneMovieCatalog {
        async fn now_playing(&self) -> CatalogResult<Vec<Movie>> {
            Ok(vec![Movie {
                title: "Dune".to_string(),
                id: "438631".to_string(),
                release_date: "2021-10-22".to_string(),
                overview: "Sand.".to_string(),
            }])
        }

        async fn showtimes(&self, title: &str, location: &str) -> CatalogResult<Vec<Showtime>> {
            Err(CatalogError::NoShowtimes {
                title: title.to_string(),
                location: location.to_string(),
            })
        }

        async fn reviews(&self, movie_id: &str) -> CatalogResult<Vec<Review>> {
            Err(CatalogError::MovieNotFound(movie_id.to_string()))
        }

        async fn buy_ticket(
            &self,
            theater: &str,
            movie: &str,
            showtime: &str,
        ) -> CatalogResult<TicketConfirmation> {
            Err(CatalogError::UnknownShowing {
                theater: theater.to_string(),
                movie: movie.to_string(),
                showtime: showtime.to_string(),
            })
        }
    }

    fn executor() -> Executor {
        Executor::new(Arc::new(OneMovieCatalog))
    }

    fn positional(name: &str, args: &[&str]) -> ActionCall {
        ActionCall {
            name: name.to_string(),
            params: ActionParams::Positional(args.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[tokio::test]
    async fn test_unknown_action_names_the_function() {
        let outcome = executor().execute(&positional("launch_rocket", &[])).await;
        assert_eq!(
            outcome,
            ActionOutcome::Error("Unknown function launch_rocket".to_string())
        );
    }

    #[tokio::test]
    async fn test_successful_invocation_serializes_result() {
        let outcome = executor()
            .execute(&positional("get_now_playing_movies", &[]))
            .await;
        let ActionOutcome::Success(payload) = outcome else {
            panic!("expected success");
        };
        assert_eq!(payload[0]["title"], "Dune");
    }

    #[tokio::test]
    async fn test_handler_failure_becomes_error_outcome() {
        let outcome = executor()
            .execute(&positional("get_showtimes", &["Dune", "94158"]))
            .await;
        let ActionOutcome::Error(message) = outcome else {
            panic!("expected error");
        };
        assert!(message.contains("Dune"));
        assert!(message.contains("94158"));
    }

    #[tokio::test]
    async fn test_positional_arity_mismatch() {
        let outcome = executor()
            .execute(&positional("get_showtimes", &["Dune"]))
            .await;
        let ActionOutcome::Error(message) = outcome else {
            panic!("expected error");
        };
        assert!(message.contains("get_showtimes"));
        assert!(message.contains("got 1"));
    }

    #[test]
    fn test_named_binding_follows_declared_order() {
        // BTreeMap iterates "location" before "title"; binding must not.
        let mut args = BTreeMap::new();
        args.insert("location".to_string(), "94158".to_string());
        args.insert("title".to_string(), "Dune".to_string());

        let bound = bind_params(ActionKind::Showtimes, &ActionParams::Named(args)).unwrap();
        assert_eq!(bound, vec!["Dune".to_string(), "94158".to_string()]);
    }

    #[test]
    fn test_named_binding_missing_key() {
        let mut args = BTreeMap::new();
        args.insert("title".to_string(), "Dune".to_string());

        let err = bind_params(ActionKind::Showtimes, &ActionParams::Named(args)).unwrap_err();
        assert!(err.contains("location"));
    }

    #[test]
    fn test_named_binding_ignores_extras() {
        let mut args = BTreeMap::new();
        args.insert("movie_id".to_string(), "603".to_string());
        args.insert("spoilers".to_string(), "yes".to_string());

        let bound = bind_params(ActionKind::Reviews, &ActionParams::Named(args)).unwrap();
        assert_eq!(bound, vec!["603".to_string()]);
    }
}
