//! Structural repair engine
//!
//! A fixed pipeline of text heuristics for the usual ways model JSON breaks.
//! Text rewrites come first: trailing commas, raw control characters,
//! single-quoted strings, bare keys and Python literals. Truncation handling
//! follows: close open containers, close an open string, and as a last
//! resort back up to the last complete value and close from there.
//! Each step runs only if the previous text still fails to parse, and each
//! step builds on the previous step's output.

use std::fmt;

use estimator_utils::error::RecoveryError;
use serde_json::Value;
use tracing::debug;

use crate::lexical::{
    python_literals, quote_bare_keys, sanitize_control_chars, single_to_double_quotes,
};
use crate::scan::{scan, strip_trailing_commas};

/// Heuristic applied to reach a parseable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStep {
    StripTrailingCommas,
    SanitizeControlChars,
    SingleQuotes,
    QuoteBareKeys,
    PythonLiterals,
    CloseContainers,
    CloseString,
    TrimIncompleteValue,
}

impl fmt::Display for RepairStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StripTrailingCommas => write!(f, "strip-trailing-commas"),
            Self::SanitizeControlChars => write!(f, "sanitize-control-chars"),
            Self::SingleQuotes => write!(f, "single-quotes"),
            Self::QuoteBareKeys => write!(f, "quote-bare-keys"),
            Self::PythonLiterals => write!(f, "python-literals"),
            Self::CloseContainers => write!(f, "close-containers"),
            Self::CloseString => write!(f, "close-string"),
            Self::TrimIncompleteValue => write!(f, "trim-incomplete-value"),
        }
    }
}

/// A successfully parsed payload.
#[derive(Debug, Clone)]
pub struct Repaired {
    /// Text that parsed
    pub text: String,
    pub value: Value,
    /// Heuristics that changed the text, in order
    pub steps: Vec<RepairStep>,
}

/// Rewrites tried in order before any truncation handling.
const TEXT_FIXES: [(RepairStep, fn(&str) -> String); 5] = [
    (RepairStep::StripTrailingCommas, strip_trailing_commas),
    (RepairStep::SanitizeControlChars, sanitize_control_chars),
    (RepairStep::SingleQuotes, single_to_double_quotes),
    (RepairStep::QuoteBareKeys, quote_bare_keys),
    (RepairStep::PythonLiterals, python_literals),
];

/// Value boundaries tried when backing up from a truncated tail.
const MAX_TRIM_ATTEMPTS: usize = 32;

/// Parse `candidate`, repairing it as needed.
///
/// Order: parse as-is → each text rewrite in turn →
/// (if not inside a string) append missing closers innermost-first →
/// (if inside a string) close the string and then append missing closers →
/// cut back to the last `,`, `{` or `[` outside a string and close from
/// there, moving one boundary further back each time.
pub fn repair(candidate: &str) -> Result<Repaired, RecoveryError> {
    let mut steps = Vec::new();
    let mut text = candidate.to_string();

    let mut last_error = match try_parse(&text) {
        Ok(value) => return Ok(Repaired { text, value, steps }),
        Err(e) => e,
    };

    for (step, fix) in TEXT_FIXES {
        let fixed = fix(&text);
        if fixed != text {
            text = fixed;
            steps.push(step);
            match try_parse(&text) {
                Ok(value) => return Ok(finish(text, value, steps)),
                Err(e) => last_error = e,
            }
        }
    }

    let state = scan(&text);
    let mut attempted = text.clone();

    if !state.in_string && !state.open.is_empty() {
        attempted = close_containers(&text, &state.open);
        match try_parse(&attempted) {
            Ok(value) => {
                steps.push(RepairStep::CloseContainers);
                return Ok(finish(attempted, value, steps));
            }
            Err(e) => last_error = e,
        }
    }

    if state.in_string {
        let mut closed = text.clone();
        if state.dangling_escape {
            closed.pop();
        }
        closed.push('"');
        attempted = close_containers(&closed, &scan(&closed).open);
        match try_parse(&attempted) {
            Ok(value) => {
                steps.push(RepairStep::CloseString);
                return Ok(finish(attempted, value, steps));
            }
            Err(e) => last_error = e,
        }
    }

    if !state.open.is_empty() {
        for &boundary in state.boundaries.iter().rev().take(MAX_TRIM_ATTEMPTS) {
            let kept = if text[boundary..].starts_with(',') {
                &text[..boundary]
            } else {
                &text[..=boundary]
            };
            let open = scan(kept).open;
            let trimmed = close_containers(kept, &open);
            if let Ok(value) = try_parse(&trimmed) {
                steps.push(RepairStep::TrimIncompleteValue);
                if !open.is_empty() {
                    steps.push(RepairStep::CloseContainers);
                }
                return Ok(finish(trimmed, value, steps));
            }
        }
    }

    debug!(steps = steps.len(), error = %last_error, "Repair heuristics exhausted");
    Err(RecoveryError::UnrepairableJson {
        message: last_error.to_string(),
        attempted,
    })
}

fn try_parse(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

fn finish(text: String, value: Value, steps: Vec<RepairStep>) -> Repaired {
    debug!(
        steps = %steps.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
        "Repaired model JSON"
    );
    Repaired { text, value, steps }
}

/// Append closers for `open` (outermost first) innermost-first.
///
/// A dangling `,` left by the truncation is dropped first, and a dangling
/// `:` gets a `null` value so the last key survives.
fn close_containers(text: &str, open: &[char]) -> String {
    let mut out = text.trim_end().to_string();
    if out.ends_with(',') {
        out.pop();
        out.truncate(out.trim_end().len());
    }
    if out.ends_with(':') {
        out.push_str("null");
    }
    out.extend(open.iter().rev());
    out
}
