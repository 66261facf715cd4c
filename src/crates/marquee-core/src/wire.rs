//! Response parser: classifies raw model output.
//!
//! Every model reply is either ordinary chat text or a structured request to
//! invoke one function. Two wire grammars exist, selected per deployment by
//! [`WireFormat`] — a deployment runs exactly one of them, never both:
//!
//! - [`WireFormat::Json`]: the entire reply is a single JSON object,
//!   `{"function": "<name>", "parameters": {"<param>": "<value>", ...}}`.
//! - [`WireFormat::Delimited`]: the reply contains
//!   `[FUNCTION_CALL]name(arg1, arg2)[/FUNCTION_CALL]`, possibly embedded in
//!   surrounding prose; arguments are positional.
//!
//! Parsing is pure and infallible: malformed or partial markers degrade to
//! [`ModelReply::Chat`] with the raw text intact, so a legitimate
//! conversational answer is never lost to a misfired classification.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Wire grammar for function-call requests, fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// Strict single-object JSON as the entire reply.
    Json,

    /// `[FUNCTION_CALL]...[/FUNCTION_CALL]` tag wrapping a call expression.
    Delimited,
}

/// Classification of one raw model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    /// Ordinary chat text, returned unmodified.
    Chat(String),

    /// A structured function-call request.
    Action(ActionCall),
}

/// A parsed function-call request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    /// Wire-level function name, exactly as the model wrote it.
    pub name: String,

    /// Supplied arguments, positional or named depending on the grammar.
    pub params: ActionParams,
}

/// Arguments attached to a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionParams {
    /// Ordered argument values, matched to the declared parameter order.
    Positional(Vec<String>),

    /// Named argument values, looked up by declared parameter name.
    Named(BTreeMap<String, String>),
}

impl ActionParams {
    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        match self {
            ActionParams::Positional(args) => args.len(),
            ActionParams::Named(args) => args.len(),
        }
    }

    /// True when no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify one complete model reply under the given wire grammar.
pub fn parse_reply(format: WireFormat, raw: &str) -> ModelReply {
    match format {
        WireFormat::Json => parse_json_reply(raw),
        WireFormat::Delimited => parse_delimited_reply(raw),
    }
}

/// Strict whole-string JSON decode. Anything that is not a JSON object with
/// a string `function` key is ordinary chat.
fn parse_json_reply(raw: &str) -> ModelReply {
    let value: Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(_) => return ModelReply::Chat(raw.to_string()),
    };

    let object = match value.as_object() {
        Some(object) => object,
        None => return ModelReply::Chat(raw.to_string()),
    };

    let name = match object.get("function").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return ModelReply::Chat(raw.to_string()),
    };

    let mut params = BTreeMap::new();
    if let Some(parameters) = object.get("parameters") {
        let map = match parameters.as_object() {
            Some(map) => map,
            None => return ModelReply::Chat(raw.to_string()),
        };
        for (key, value) in map {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            params.insert(key.clone(), rendered);
        }
    }

    ModelReply::Action(ActionCall {
        name,
        params: ActionParams::Named(params),
    })
}

fn call_tag_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"(?s)\[FUNCTION_CALL\](.*?)\[/FUNCTION_CALL\]")
            .expect("call tag pattern is valid")
    })
}

/// Bounded tag search followed by a split on the first `(`. Arguments are
/// comma-separated, trimmed, and empty-after-trim segments are dropped.
fn parse_delimited_reply(raw: &str) -> ModelReply {
    let inner = match call_tag_pattern().captures(raw) {
        Some(captures) => captures[1].trim().to_string(),
        None => return ModelReply::Chat(raw.to_string()),
    };

    let (name, rest) = match inner.split_once('(') {
        Some((name, rest)) => (name.trim().to_string(), rest),
        None => return ModelReply::Chat(raw.to_string()),
    };

    if name.is_empty() {
        return ModelReply::Chat(raw.to_string());
    }

    let args: Vec<String> = rest
        .trim_end_matches(')')
        .split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect();

    ModelReply::Action(ActionCall {
        name,
        params: ActionParams::Positional(args),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(raw: &str) -> ModelReply {
        ModelReply::Chat(raw.to_string())
    }

    #[test]
    fn test_json_valid_call() {
        let raw = r#"{"function": "get_showtimes", "parameters": {"title": "Dune", "location": "94158"}}"#;
        match parse_reply(WireFormat::Json, raw) {
            ModelReply::Action(call) => {
                assert_eq!(call.name, "get_showtimes");
                let ActionParams::Named(params) = call.params else {
                    panic!("expected named params");
                };
                assert_eq!(params.get("title").map(String::as_str), Some("Dune"));
                assert_eq!(params.get("location").map(String::as_str), Some("94158"));
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn test_json_no_parameters_key() {
        let raw = r#"{"function": "get_now_playing_movies"}"#;
        match parse_reply(WireFormat::Json, raw) {
            ModelReply::Action(call) => {
                assert_eq!(call.name, "get_now_playing_movies");
                assert!(call.params.is_empty());
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn test_json_malformed_degrades_to_chat() {
        for raw in [
            "The movie opens Friday.",
            r#"{"function": "#,
            r#"{"parameters": {"title": "Dune"}}"#,
            r#"["function", "get_reviews"]"#,
            r#"{"function": ""}"#,
            r#"Sure! {"function": "get_reviews", "parameters": {}}"#,
            r#"{"function": "get_reviews", "parameters": [1, 2]}"#,
        ] {
            assert_eq!(parse_reply(WireFormat::Json, raw), chat(raw), "input: {raw}");
        }
    }

    #[test]
    fn test_json_non_string_parameter_values_rendered() {
        let raw = r#"{"function": "get_reviews", "parameters": {"movie_id": 603}}"#;
        match parse_reply(WireFormat::Json, raw) {
            ModelReply::Action(call) => {
                let ActionParams::Named(params) = call.params else {
                    panic!("expected named params");
                };
                assert_eq!(params.get("movie_id").map(String::as_str), Some("603"));
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn test_delimited_valid_call() {
        let raw = "[FUNCTION_CALL]get_showtimes(Dune, 94158)[/FUNCTION_CALL]";
        match parse_reply(WireFormat::Delimited, raw) {
            ModelReply::Action(call) => {
                assert_eq!(call.name, "get_showtimes");
                assert_eq!(
                    call.params,
                    ActionParams::Positional(vec!["Dune".to_string(), "94158".to_string()])
                );
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn test_delimited_embedded_in_prose() {
        let raw = "Let me look that up.\n[FUNCTION_CALL]get_now_playing_movies()[/FUNCTION_CALL]\nOne moment.";
        match parse_reply(WireFormat::Delimited, raw) {
            ModelReply::Action(call) => {
                assert_eq!(call.name, "get_now_playing_movies");
                assert!(call.params.is_empty());
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn test_delimited_whitespace_trimmed_and_empties_dropped() {
        let raw = "[FUNCTION_CALL]get_showtimes( Dune ,  )[/FUNCTION_CALL]";
        match parse_reply(WireFormat::Delimited, raw) {
            ModelReply::Action(call) => {
                assert_eq!(
                    call.params,
                    ActionParams::Positional(vec!["Dune".to_string()])
                );
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn test_delimited_malformed_degrades_to_chat() {
        for raw in [
            "What would you like to watch?",
            "[FUNCTION_CALL]get_showtimes(Dune, 94158)",
            "[FUNCTION_CALL]no_parens_here[/FUNCTION_CALL]",
            "[FUNCTION_CALL](Dune)[/FUNCTION_CALL]",
            "[FUNCTION_CALL][/FUNCTION_CALL]",
        ] {
            assert_eq!(
                parse_reply(WireFormat::Delimited, raw),
                chat(raw),
                "input: {raw}"
            );
        }
    }

    #[test]
    fn test_delimited_multiline_call() {
        let raw = "[FUNCTION_CALL]buy_ticket(AMC Metreon,\n Dune, 7:30 PM)[/FUNCTION_CALL]";
        match parse_reply(WireFormat::Delimited, raw) {
            ModelReply::Action(call) => {
                assert_eq!(call.name, "buy_ticket");
                assert_eq!(
                    call.params,
                    ActionParams::Positional(vec![
                        "AMC Metreon".to_string(),
                        "Dune".to_string(),
                        "7:30 PM".to_string(),
                    ])
                );
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn test_parser_is_pure() {
        // Same malformed input twice yields the same classification: the
        // parser keeps no hidden state.
        let raw = "[FUNCTION_CALL]broken";
        let first = parse_reply(WireFormat::Delimited, raw);
        let second = parse_reply(WireFormat::Delimited, raw);
        assert_eq!(first, second);
        assert_eq!(first, chat(raw));
    }
}
