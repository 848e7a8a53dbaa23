//! String-aware lexical scan shared by the normalizer and the repair engine.
//!
//! Braces, brackets and commas inside string literals are never structural.

/// Lexical state after scanning a JSON-like text.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ScanState {
    /// Closers for containers still open, outermost first.
    pub open: Vec<char>,
    /// Text ended inside a string literal.
    pub in_string: bool,
    /// Text ended on an unfinished escape inside a string literal.
    pub dangling_escape: bool,
    /// Byte offset just past the closer that first brought depth back to 0.
    pub first_close: Option<usize>,
    /// Byte offsets of `,`, `{` and `[` outside string literals.
    pub boundaries: Vec<usize>,
}

pub(crate) fn scan(text: &str) -> ScanState {
    let mut state = ScanState::default();
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if state.in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                state.in_string = false;
            }
            continue;
        }

        match c {
            '"' => state.in_string = true,
            ',' => state.boundaries.push(i),
            '{' => {
                state.open.push('}');
                state.boundaries.push(i);
            }
            '[' => {
                state.open.push(']');
                state.boundaries.push(i);
            }
            '}' | ']' => {
                // A mismatched closer is left for the parser to report.
                if state.open.last() == Some(&c) {
                    state.open.pop();
                    if state.open.is_empty() && state.first_close.is_none() {
                        state.first_close = Some(i + c.len_utf8());
                    }
                }
            }
            _ => {}
        }
    }

    state.dangling_escape = state.in_string && escaped;
    state
}

/// Remove commas that directly precede `}` or `]` (whitespace allowed
/// between). Returns the input unchanged when there are none.
pub(crate) fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[ -~]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z,{}\\[\\]]{1,6}", inner, 0..6)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_serialized_json_scans_balanced(value in json_value()) {
            let text = serde_json::to_string(&value).unwrap();
            let state = scan(&text);
            prop_assert!(state.open.is_empty());
            prop_assert!(!state.in_string);
            prop_assert!(!state.dangling_escape);
            if text.starts_with(['{', '[']) {
                prop_assert_eq!(state.first_close, Some(text.len()));
            }
        }

        #[test]
        fn prop_strip_trailing_commas_keeps_valid_json(value in json_value()) {
            let text = serde_json::to_string_pretty(&value).unwrap();
            prop_assert_eq!(strip_trailing_commas(&text), text);
        }
    }
}
