//! Free-format narrative parsing.
//!
//! Codewords here are not anchored to line starts: the value is read as one
//! `/`-delimited stream in which any uppercase token opens a new item.

use super::lines::non_empty_lines;
use crate::model::{Narrative, StructuredNarrative};
use crate::validate::{FREE_FORMAT_CODEWORD, is_valid_codeword};

/// Parse a free-format value.
///
/// A value is structured when it starts with `/` and the token up to the
/// next `/` is an uppercase codeword. Otherwise every non-empty line becomes
/// an unstructured fragment.
pub fn parse_free_format(value: Option<&str>) -> Narrative {
    let mut narrative = Narrative::new();
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return narrative;
    };

    if !is_structured(value) {
        for line in non_empty_lines(value) {
            narrative.push_unstructured(line.text);
        }
        return narrative;
    }

    let joined: String = non_empty_lines(value).map(|line| line.text).collect();
    let mut open: Option<&str> = None;
    let mut text = String::new();
    for token in tokens(&joined) {
        if is_valid_codeword(token, &FREE_FORMAT_CODEWORD) {
            if let Some(codeword) = open.replace(token) {
                narrative.push_structured(close(codeword, &text));
            }
            text.clear();
        } else {
            if !text.is_empty() {
                text.push('/');
            }
            text.push_str(token);
        }
    }
    if let Some(codeword) = open {
        narrative.push_structured(close(codeword, &text));
    }
    narrative
}

fn is_structured(value: &str) -> bool {
    value.strip_prefix('/').is_some_and(|after| {
        let token = after.split_once('/').map_or(after, |(token, _)| token);
        is_valid_codeword(token, &FREE_FORMAT_CODEWORD)
    })
}

/// Split on `/`, dropping trailing empty tokens.
fn tokens(joined: &str) -> impl Iterator<Item = &str> {
    let kept = joined.trim_end_matches('/');
    kept.split('/')
}

fn close(codeword: &str, text: &str) -> StructuredNarrative {
    let item = StructuredNarrative::new(codeword.trim());
    if text.trim().is_empty() {
        item
    } else {
        item.with_narrative(text)
    }
}
