//! Filesystem-safe name sanitization.

/// Characters that are never allowed in a generated file name.
const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\n', '\r', '\t'];

/// Fallback used when nothing printable survives sanitization.
pub const UNTITLED: &str = "untitled";

/// Maps arbitrary text to a non-empty, filesystem-safe string.
///
/// Reserved characters become spaces, whitespace runs collapse to a single
/// space and the result is trimmed. Empty results become `"untitled"`.
pub fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if RESERVED.contains(&c) { ' ' } else { c })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        UNTITLED.to_string()
    } else {
        collapsed
    }
}
