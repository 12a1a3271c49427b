//! Parsers for bundled and user-provided documents.

pub mod style_json;

pub use style_json::{parse_style_file, parse_style_str};
