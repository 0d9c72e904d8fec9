//! Storage-safe file names.
//!
//! Everything here is pure: the caller supplies the timestamp, so two files
//! that share a company and base name only get distinct names when they are
//! given distinct timestamps.

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block, left behind by NFD decomposition.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Lower-case the name and replace everything outside `[a-z0-9]` with `_`.
pub fn sanitize_company_name(company: &str) -> String {
    company
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Split a file name at its last `.` into `(base, extension)`.
///
/// A name without a dot has an empty extension.
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) => (&filename[..idx], &filename[idx + 1..]),
        None => (filename, ""),
    }
}

/// Strip diacritics, replace characters outside `[a-zA-Z0-9.\-_]` with `_`
/// and collapse runs of `_`.
pub fn sanitize_base_name(base: &str) -> String {
    let mut out = String::with_capacity(base.len());
    for c in base.nfd().filter(|c| !COMBINING_MARKS.contains(c)) {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Build `{company}_{base}_{millis}.{extension}`.
///
/// The extension is kept verbatim. When the original name has none, the
/// trailing `.` is omitted as well.
pub fn storage_file_name(company: &str, filename: &str, millis: i64) -> String {
    let (base, extension) = split_extension(filename);
    let company = sanitize_company_name(company);
    let base = sanitize_base_name(base);
    if extension.is_empty() {
        format!("{company}_{base}_{millis}")
    } else {
        format!("{company}_{base}_{millis}.{extension}")
    }
}
