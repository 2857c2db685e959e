// src/watch/filter.rs

/// Returns true if any pattern is contained in `file_name`.
///
/// Be careful: patterns are NOT globs or regexes, only literal substrings,
/// and they are tested against the base name, never the full path.
pub fn should_ignore(file_name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| file_name.contains(p.as_str()))
}
