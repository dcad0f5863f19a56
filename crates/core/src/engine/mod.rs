/// Free-format engine: codewords anywhere in the text.
pub mod free_format;
/// Line-anchored structured/unstructured state machine.
pub mod line_parser;
mod lines;

pub use free_format::parse_free_format;
pub use line_parser::parse_lines;
