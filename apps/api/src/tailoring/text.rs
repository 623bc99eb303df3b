//! Case-insensitive string helpers shared by the pipeline stages.

/// True when `needle` occurs in `haystack`, ignoring case.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Number of non-overlapping, case-insensitive occurrences of `needle`.
pub fn count_ignore_case(haystack: &str, needle: &str) -> usize {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    haystack.to_lowercase().matches(needle.as_str()).count()
}
