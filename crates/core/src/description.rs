//! Parsing of the one-line product description returned by the vision
//! model.
//!
//! The wire format is a single comma-delimited line with fields in
//! fixed positional order:
//!
//! ```text
//! object_name, color, HxW, manufacturer, specification, description
//! ```
//!
//! There is no escaping: a comma inside a model-generated field shifts
//! every later field. Short lines degrade to empty fields rather than
//! erroring, so upstream garbage shows up as blank columns instead of a
//! server error.

/// Cap for the short text columns (object name, color, dimensions,
/// manufacturer).
pub const MAX_SHORT_FIELD: usize = 100;
/// Cap for the long text columns (specification, description).
pub const MAX_LONG_FIELD: usize = 1000;

/// Structured fields derived from one response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDescription {
    pub object_name: String,
    pub color: String,
    /// Formatted as `"Height={h}cm, Width={w}cm"`.
    pub dimensions: String,
    pub manufacturer: String,
    pub specification: String,
    pub description: String,
}

/// Format the dimensions column from the raw height/width halves.
pub fn format_dimensions(height: &str, width: &str) -> String {
    format!("Height={height}cm, Width={width}cm")
}

/// Parse one comma-delimited description line.
///
/// Positionally missing fields resolve to empty strings. The third
/// field is split on its first `x` with no numeric validation; without
/// an `x` the width half stays empty. A non-empty `transcription`
/// replaces the description field entirely, regardless of what the
/// line contained.
pub fn parse_description_line(line: &str, transcription: Option<&str>) -> ParsedDescription {
    let fields: Vec<&str> = line.split(',').collect();
    let field = |i: usize| fields.get(i).copied().unwrap_or("");

    let (height, width) = field(2).split_once('x').unwrap_or((field(2), ""));

    let description = match transcription {
        Some(t) if !t.is_empty() => t,
        _ => field(5).trim(),
    };

    ParsedDescription {
        object_name: truncate(field(0), MAX_SHORT_FIELD),
        color: truncate(field(1), MAX_SHORT_FIELD),
        dimensions: truncate(&format_dimensions(height, width), MAX_SHORT_FIELD),
        manufacturer: truncate(field(3).trim(), MAX_SHORT_FIELD),
        specification: truncate(field(4).trim(), MAX_LONG_FIELD),
        description: truncate(description, MAX_LONG_FIELD),
    }
}

/// Truncate to at most `max` bytes without splitting a char.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}
