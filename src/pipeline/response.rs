//! Isolate and parse the JSON array inside a free-text model response.
//!
//! Models are asked for a bare JSON array but often wrap it in a ```json
//! fence or open with "Here are your flashcards:". Rather than tokenising the
//! whole response we slice from the first `[` to the last `]` and check that
//! the slice parses as a JSON array.
//!
//! Known limitation: a `[` in prose before the real array (e.g. "see [1]")
//! moves the slice start and the validation step then rejects the response.

use crate::error::{GenerationError, JsonExtractError};
use crate::output::Flashcard;
use serde_json::Value;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Return the substring of `response` holding a syntactically valid JSON array.
pub fn extract_json_array(response: &str) -> Result<&str, JsonExtractError> {
    let trimmed = response.strip_prefix(FENCE_OPEN).unwrap_or(response);
    let trimmed = trimmed.strip_suffix(FENCE_CLOSE).unwrap_or(trimmed);
    let trimmed = trimmed.trim();

    let start = trimmed.find('[').ok_or(JsonExtractError::NoArrayFound)?;
    let end = trimmed
        .rfind(']')
        .filter(|&end| end > start)
        .ok_or(JsonExtractError::MalformedArray)?;

    let candidate = &trimmed[start..=end];

    // Shape check only; element types are checked by `parse_flashcards`.
    serde_json::from_str::<Vec<Value>>(candidate).map_err(JsonExtractError::InvalidJson)?;

    Ok(candidate)
}

/// Parse a validated JSON array into flashcards.
///
/// Every element must deserialize into a [`Flashcard`] and carry a non-blank
/// front or back; one bad element rejects the whole array. Errors report
/// `json` as both the extracted array and the raw response.
pub fn parse_flashcards(json: &str) -> Result<Vec<Flashcard>, GenerationError> {
    parse_extracted(json, json)
}

/// [`extract_json_array`] then [`parse_flashcards`], keeping the raw text on failure.
pub fn flashcards_from_response(raw: &str) -> Result<Vec<Flashcard>, GenerationError> {
    let json = extract_json_array(raw).map_err(|source| GenerationError::Extraction {
        source,
        raw: raw.to_string(),
    })?;
    parse_extracted(json, raw)
}

fn parse_extracted(json: &str, raw: &str) -> Result<Vec<Flashcard>, GenerationError> {
    let cards: Vec<Flashcard> =
        serde_json::from_str(json).map_err(|source| GenerationError::Parse {
            source,
            json: json.to_string(),
            raw: raw.to_string(),
        })?;

    if let Some(index) = cards
        .iter()
        .position(|c| c.front.trim().is_empty() && c.back.trim().is_empty())
    {
        return Err(GenerationError::EmptyCard {
            index,
            json: json.to_string(),
            raw: raw.to_string(),
        });
    }

    Ok(cards)
}
