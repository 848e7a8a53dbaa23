//! String-aware rewrites for JSON written in a looser dialect: raw control
//! characters, single-quoted strings, bare object keys and Python literals.
//!
//! Every rewrite leaves double-quoted string contents alone, and returns
//! the input unchanged when there is nothing to fix.

/// Raw characters below U+0020.
fn is_raw_control(c: char) -> bool {
    (c as u32) < 0x20
}

/// Drop control characters outside strings (JSON whitespace excepted).
/// Inside strings, raw newlines, carriage returns and tabs are escaped and
/// any other control character is dropped.
pub(crate) fn sanitize_control_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            } else if is_raw_control(c) && !matches!(c, '\n' | '\r' | '\t') {
                continue;
            }
            out.push(c);
            continue;
        }

        if is_raw_control(c) {
            let escape = match c {
                '\n' => Some('n'),
                '\r' => Some('r'),
                '\t' => Some('t'),
                _ => None,
            };
            match (escape, escaped) {
                (Some(letter), false) => {
                    out.push('\\');
                    out.push(letter);
                }
                // The backslash is already in place.
                (Some(letter), true) => out.push(letter),
                (None, true) => {
                    out.pop();
                }
                (None, false) => {}
            }
            escaped = false;
            continue;
        }

        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            in_string = false;
        }
        out.push(c);
    }

    out
}

/// Rewrite `'single quoted'` strings as double-quoted JSON strings.
///
/// Embedded `"` are escaped and `\'` loses its backslash. A single-quoted
/// string cut off by truncation stays open for the repair engine to close.
pub(crate) fn single_to_double_quotes(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum Mode {
        Code,
        Double,
        Single,
    }

    let mut out = String::with_capacity(text.len());
    let mut mode = Mode::Code;
    let mut escaped = false;

    for c in text.chars() {
        match mode {
            Mode::Code => match c {
                '"' => {
                    mode = Mode::Double;
                    out.push(c);
                }
                '\'' => {
                    mode = Mode::Single;
                    out.push('"');
                }
                _ => out.push(c),
            },
            Mode::Double => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    mode = Mode::Code;
                }
                out.push(c);
            }
            Mode::Single => {
                if escaped {
                    escaped = false;
                    if c == '\'' {
                        out.pop();
                    }
                    out.push(c);
                } else {
                    match c {
                        '\\' => {
                            escaped = true;
                            out.push(c);
                        }
                        '\'' => {
                            mode = Mode::Code;
                            out.push('"');
                        }
                        '"' => out.push_str("\\\""),
                        _ => out.push(c),
                    }
                }
            }
        }
    }

    out
}

/// Quote identifiers used as object keys: `{phases: []}` becomes
/// `{"phases": []}`.
pub(crate) fn quote_bare_keys(text: &str) -> String {
    rewrite_outside_strings(text, |chars, i, out| {
        if !is_identifier_start(chars[i]) || !at_key_position(out) {
            return None;
        }
        let end = identifier_end(chars, i);
        let next = chars[end..].iter().find(|c| !c.is_whitespace());
        if next != Some(&':') {
            return None;
        }
        out.push('"');
        out.extend(&chars[i..end]);
        out.push('"');
        Some(end)
    })
}

/// Map the Python literals `True`, `False` and `None` to JSON.
pub(crate) fn python_literals(text: &str) -> String {
    rewrite_outside_strings(text, |chars, i, out| {
        if !is_identifier_char(chars[i]) {
            return None;
        }
        // Whole words only, so `Nonetheless` or `1e5` are copied as they are.
        let end = identifier_end(chars, i);
        let word: String = chars[i..end].iter().collect();
        out.push_str(match word.as_str() {
            "True" => "true",
            "False" => "false",
            "None" => "null",
            _ => word.as_str(),
        });
        Some(end)
    })
}

/// Copy `text`, handing every position outside a double-quoted string to
/// `rewrite`. A rewrite that handles the position writes its output and
/// returns the index just past what it consumed; `None` copies the
/// character unchanged.
fn rewrite_outside_strings(
    text: &str,
    mut rewrite: impl FnMut(&[char], usize, &mut String) -> Option<usize>,
) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if let Some(next) = rewrite(&chars, i, &mut out) {
            i = next;
            continue;
        }
        out.push(c);
        i += 1;
    }

    out
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn identifier_end(chars: &[char], start: usize) -> usize {
    chars[start..]
        .iter()
        .position(|c| !is_identifier_char(*c))
        .map_or(chars.len(), |len| start + len)
}

/// Output so far ends (ignoring whitespace) with `{` or `,`.
fn at_key_position(out: &str) -> bool {
    matches!(out.trim_end().chars().last(), Some('{' | ','))
}
