//! JSONC preprocessing for hand-edited configuration files.
//!
//! Turns JSON-with-comments into plain JSON that `serde_json` accepts:
//! - `//` line comments and `/* ... */` block comments are removed
//! - a trailing comma directly before `}` or `]` is removed
//! - string literals (including escaped quotes) are copied untouched

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    Str,
    StrEscape,
    LineComment,
    BlockComment,
}

/// Strip comments and trailing commas from JSONC input.
///
/// Comment-like sequences inside string literals are preserved. Newlines that
/// terminate a line comment are kept so line numbers in `serde_json` errors
/// still point at the original source line.
#[must_use]
pub fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut state = Scan::Code;
    // Byte offset in `out` of a comma that may turn out to be trailing.
    let mut pending_comma: Option<usize> = None;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Scan::Str => {
                out.push(c);
                match c {
                    '\\' => state = Scan::StrEscape,
                    '"' => state = Scan::Code,
                    _ => {}
                }
            }
            Scan::StrEscape => {
                out.push(c);
                state = Scan::Str;
            }
            Scan::LineComment => {
                if c == '\n' {
                    out.push(c);
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Scan::Code;
                }
            }
            Scan::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = Scan::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Scan::BlockComment;
                }
                '"' => {
                    pending_comma = None;
                    out.push(c);
                    state = Scan::Str;
                }
                ',' => {
                    pending_comma = Some(out.len());
                    out.push(c);
                }
                '}' | ']' => {
                    if let Some(at) = pending_comma.take() {
                        out.replace_range(at..at + 1, " ");
                    }
                    out.push(c);
                }
                c if c.is_whitespace() => out.push(c),
                _ => {
                    pending_comma = None;
                    out.push(c);
                }
            },
        }
    }
    out
}
