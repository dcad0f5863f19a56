//! Shared test helpers for `mt_narrative_core` integration tests.

#![allow(unreachable_pub)]

use std::path::PathBuf;

use mt_narrative_core::{Diagnostic, Narrative, NarrativeResolver, StructuredNarrative};

/// Repository `samples/` directory.
#[allow(dead_code)]
pub fn samples_dir() -> PathBuf {
    let mut root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/core -> repo root
    root.pop();
    root.pop();
    root.join("samples")
}

/// Resolve with the built-in table and collect diagnostics.
#[allow(dead_code)]
pub fn resolve_collect(field: &str, value: &str) -> (Narrative, Vec<Diagnostic>) {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let narrative = NarrativeResolver::default()
        .resolve(field, Some(value), &mut diags)
        .unwrap_or_else(|e| panic!("resolve {field} failed: {e}"));
    (narrative, diags)
}

/// Codewords of all structured items, in order.
#[allow(dead_code)]
pub fn codewords(narrative: &Narrative) -> Vec<&str> {
    narrative
        .structured_narratives()
        .iter()
        .map(StructuredNarrative::codeword)
        .collect()
}

/// Diagnostic ids, in emission order.
#[allow(dead_code)]
pub fn diag_ids(diags: &[Diagnostic]) -> Vec<String> {
    diags.iter().map(|d| d.id.to_string()).collect()
}

/// Find first diagnostic with the given code.
#[allow(dead_code)]
pub fn find_diag<'a>(issues: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    issues
        .iter()
        .find(|d| &*d.id == code)
        .unwrap_or_else(|| panic!("expected diagnostic {code}"))
}
