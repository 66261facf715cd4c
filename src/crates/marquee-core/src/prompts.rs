//! System instruction templates, one per wire grammar.

use crate::wire::WireFormat;

/// Keyword the user must type, case-insensitively, to confirm a pending
/// ticket purchase.
pub const CONFIRM_KEYWORD: &str = "BUY";

const SHARED_RULES: &str = "\
You are a helpful assistant for a movie information and ticket booking \
service. Help users find movie information, showtimes, and book tickets. \
Always be polite and professional.

Available functions:
- get_now_playing_movies(): movies currently playing in theaters.
- get_showtimes(title, location): showtimes for a movie in a city or zip code.
- get_reviews(movie_id): reviews for a specific movie.
- buy_ticket(theater, movie, showtime): purchases a ticket for a showing.

When users ask about showtimes:
1. Make sure you have both the movie title and the location before calling \
get_showtimes.
2. If either is missing, ask for it in a normal response instead of calling \
the function.
3. Recognize common city abbreviations and nicknames (e.g. \"SF\" for San \
Francisco).

Ticket purchases require an extra confirmation step handled by the system: \
after you request buy_ticket, the user will be asked to type BUY to confirm. \
Do not ask for that confirmation yourself.

If a function returns an error or no results, explain the issue to the user \
and suggest alternatives where possible.

When presenting the list of now-playing movies, format it as a markdown \
table with columns Title, Release Date, and Overview (truncate overviews to \
about 100 characters).";

const JSON_CALL_RULES: &str = "\
IMPORTANT: when a function call is needed, respond ONLY with a single JSON \
object in this exact format, with no surrounding text:
{\"function\": \"function_name\", \"parameters\": {\"param1\": \"value1\", \"param2\": \"value2\"}}

For everything else, respond normally. Use the JSON format for function \
calls and only for function calls.";

const DELIMITED_CALL_RULES: &str = "\
IMPORTANT: when a function call is needed, ALWAYS respond in the following \
format:
[FUNCTION_CALL]function_name(param1, param2)[/FUNCTION_CALL]

For everything else, respond normally. Use the [FUNCTION_CALL] format for \
function calls and only for function calls.";

/// The system instruction a new session is seeded with.
pub fn system_instruction(format: WireFormat) -> String {
    let call_rules = match format {
        WireFormat::Json => JSON_CALL_RULES,
        WireFormat::Delimited => DELIMITED_CALL_RULES,
    };
    format!("{SHARED_RULES}\n\n{call_rules}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_matches_wire_format() {
        let json = system_instruction(WireFormat::Json);
        assert!(json.contains("\"function\""));
        assert!(!json.contains("[FUNCTION_CALL]"));

        let delimited = system_instruction(WireFormat::Delimited);
        assert!(delimited.contains("[FUNCTION_CALL]"));
        assert!(!delimited.contains("{\"function\""));
    }

    #[test]
    fn test_instruction_names_every_action() {
        for format in [WireFormat::Json, WireFormat::Delimited] {
            let instruction = system_instruction(format);
            for kind in crate::registry::ActionKind::ALL {
                assert!(instruction.contains(kind.name()), "missing {}", kind.name());
            }
        }
    }
}
