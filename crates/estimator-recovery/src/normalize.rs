//! Raw response normalizer
//!
//! Locates the JSON payload inside free-form model text. This is a
//! best-effort cut, not a parser; balance is only checked to decide where a
//! truncated payload ends.

use estimator_utils::error::RecoveryError;
use tracing::debug;

use crate::scan::scan;

const FENCE: &str = "```";

/// Extract the candidate JSON text from a model response.
///
/// 1. The first fenced code block whose interior contains `{` wins; an
///    unclosed fence runs to end of input. The fence's language tag line
///    (` ```json `) is skipped.
/// 2. Within the chosen region, take the first `{` through the last `}`.
///    If the object starting at the first `{` never closes, the payload was
///    truncated and everything from the first `{` to the end is kept so the
///    repair engine can complete it.
/// 3. No `{` at all → [`RecoveryError::NoJsonFound`].
pub fn normalize(raw: &str) -> Result<String, RecoveryError> {
    let region = match fenced_block(raw) {
        Some(interior) => {
            debug!(len = interior.len(), "Using fenced code block");
            interior
        }
        None => raw,
    };

    locate_object(region).ok_or(RecoveryError::NoJsonFound)
}

/// Interior of the first fenced block that contains an opening brace.
fn fenced_block(text: &str) -> Option<&str> {
    let mut rest = text;
    while let Some(open) = rest.find(FENCE) {
        let after_fence = &rest[open + FENCE.len()..];
        // Skip the info string (`json`, `JSON`, ...) up to end of line.
        let body_start = after_fence.find('\n').map_or(after_fence.len(), |i| i + 1);
        let body = &after_fence[body_start..];

        let (interior, next) = match body.find(FENCE) {
            Some(close) => (&body[..close], &body[close + FENCE.len()..]),
            None => (body, ""),
        };

        if interior.contains('{') {
            return Some(interior);
        }
        rest = next;
    }
    None
}

fn locate_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let from_start = &text[start..];

    let state = scan(from_start);
    if state.first_close.is_none() {
        return Some(from_start.trim_end().to_string());
    }

    let end = text.rfind('}')?;
    Some(text[start..=end].to_string())
}
