//! Topic path splitting.

/// Segment delimiter for topic paths.
pub const DELIMITER: char = '/';

/// Split a raw topic into its non-empty segments.
///
/// Leading, trailing, and doubled delimiters produce empty fragments that
/// are dropped rather than indexed as empty-named nodes. A topic consisting
/// only of delimiters (or the empty string) yields an empty vector, which
/// callers must treat as a malformed path.
pub fn split_topic(raw: &str) -> Vec<String> {
    raw.split(DELIMITER)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}
