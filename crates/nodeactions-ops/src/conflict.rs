//! Name generation for resolving copy conflicts.

/// Split `name` into its stem and extension (including the dot).
///
/// The extension is the last `.` followed by at least one character, so
/// `"archive."` has none and `".bashrc"` is all extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx + 1..].contains('/') => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Split a trailing `-<n>` counter off `stem` and return the prefix with `n + 1`.
///
/// Only canonical integers count, so `"v-007"` keeps its digits. A counter
/// that cannot be incremented is not treated as one.
fn split_counter(stem: &str) -> Option<(&str, u64)> {
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)?;

    let prefix = stem[..digits_start].strip_suffix('-')?;
    let digits = &stem[digits_start..];
    let number: u64 = digits.parse().ok()?;

    if number.to_string() != digits {
        return None;
    }
    number.checked_add(1).map(|next| (prefix, next))
}

/// Generate the next name to try after `name` hit a conflict.
///
/// `base_name` is the name the entry had before any renaming. While `name`
/// still equals the base (ignoring extensions), a fresh `-1` counter is
/// appended; once a counter has been added it is incremented instead:
///
/// - `"report.pdf"` becomes `"report-1.pdf"`
/// - `"report-1.pdf"` with base `"report.pdf"` becomes `"report-2.pdf"`
/// - `"archive"` becomes `"archive-1"`
pub fn next_available_name(name: &str, base_name: Option<&str>) -> String {
    let (mut stem, extension) = split_extension(name);
    let base_stem = base_name.map(|base| split_extension(base).0);

    let mut counter = 1;
    if base_stem != Some(stem) {
        if let Some((prefix, next)) = split_counter(stem) {
            stem = prefix;
            counter = next;
        }
    }

    format!("{stem}-{counter}{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_rename_appends_counter() {
        assert_eq!(next_available_name("report.pdf", None), "report-1.pdf");
        assert_eq!(next_available_name("report.pdf", Some("report.pdf")), "report-1.pdf");
        assert_eq!(next_available_name("archive", None), "archive-1");
    }

    #[test]
    fn test_repeated_rename_increments_counter() {
        let first = next_available_name("report.pdf", Some("report.pdf"));
        let second = next_available_name(&first, Some("report.pdf"));
        let third = next_available_name(&second, Some("report.pdf"));

        assert_eq!(second, "report-2.pdf");
        assert_eq!(third, "report-3.pdf");
    }

    #[test]
    fn test_existing_counter_in_base_is_kept() {
        // The original name already ends in a counter; it is part of the stem.
        let first = next_available_name("build-3.tar", Some("build-3.tar"));
        assert_eq!(first, "build-3-1.tar");
        assert_eq!(next_available_name(&first, Some("build-3.tar")), "build-3-2.tar");

        // Without a base the counter is incremented directly.
        assert_eq!(next_available_name("build-3.tar", None), "build-4.tar");
    }

    #[test]
    fn test_non_canonical_counter_is_not_incremented() {
        assert_eq!(next_available_name("v-007", None), "v-007-1");
    }

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(split_extension("archive."), ("archive.", ""));
        assert_eq!(split_extension(".bashrc"), ("", ".bashrc"));
        assert_eq!(split_extension("a.b.c"), ("a.b", ".c"));
        assert_eq!(next_available_name("archive.", None), "archive.-1");
    }

    #[test]
    fn test_split_counter() {
        assert_eq!(split_counter("report-12"), Some(("report", 13)));
        assert_eq!(split_counter("a-1-12"), Some(("a-1", 13)));
        assert_eq!(split_counter("report12"), None);
        assert_eq!(split_counter("report-"), None);
        assert_eq!(split_counter("-5"), Some(("", 6)));
    }

    #[test]
    fn test_counter_at_limit_is_kept() {
        let name = format!("x-{}.txt", u64::MAX);
        assert_eq!(split_counter(&format!("x-{}", u64::MAX)), None);
        assert_eq!(
            next_available_name(&name, None),
            format!("x-{}-1.txt", u64::MAX)
        );
    }
}
