use mt_narrative_diagnostics::Span;

/// A non-empty line of a field value and its byte span in that value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub(crate) text: &'a str,
    pub(crate) span: Span,
}

/// Split on `\n` (dropping a trailing `\r`) and skip empty lines.
pub(crate) fn non_empty_lines(value: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0usize;
    value.split('\n').filter_map(move |raw| {
        let start = offset;
        offset += raw.len() + 1;
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        (!text.is_empty()).then(|| Line {
            text,
            span: Span::new(start, start + text.len()),
        })
    })
}
