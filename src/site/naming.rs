//! Filename derivation for new entries.

use chrono::{DateTime, FixedOffset};

/// Extension every stored entry carries.
pub const MARKDOWN_EXT: &str = ".md";

/// Longest sanitized title, in bytes.
pub const MAX_TITLE_LEN: usize = 100;

/// Characters dropped from titles before they become filenames.
const ILLEGAL_CHARS: [char; 11] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\n', '\r'];

/// Turn a title into a filesystem-safe filename stem.
///
/// Illegal characters are deleted, spaces become hyphens, and the result is
/// cut to [`MAX_TITLE_LEN`] bytes. Case and non-ASCII text are left alone.
pub fn sanitize_title(title: &str) -> String {
    let mut cleaned: String = title
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();

    if cleaned.len() > MAX_TITLE_LEN {
        // Never split a multi-byte character.
        let mut end = MAX_TITLE_LEN;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
    }

    cleaned
}

/// Append `.md` unless the name already ends with it (case-sensitive).
pub fn ensure_markdown_ext(name: &str) -> String {
    if name.ends_with(MARKDOWN_EXT) {
        name.to_string()
    } else {
        format!("{name}{MARKDOWN_EXT}")
    }
}

/// `{YYYYMMDDHHMMSS}-{sanitized title}.md`, in the date's own zone.
pub fn default_filename(title: &str, date: &DateTime<FixedOffset>) -> String {
    format!(
        "{}-{}{}",
        date.format("%Y%m%d%H%M%S"),
        sanitize_title(title),
        MARKDOWN_EXT
    )
}

/// Pick the filename for a submission: the caller's choice if given,
/// otherwise one synthesized from the date and title.
pub fn resolve_filename(
    requested: Option<&str>,
    title: &str,
    date: &DateTime<FixedOffset>,
) -> String {
    match requested {
        Some(name) if !name.is_empty() => ensure_markdown_ext(name),
        _ => default_filename(title, date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cst_date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 9, 7, 5, 1)
            .unwrap()
    }

    #[test]
    fn test_sanitize_removes_illegal_chars() {
        assert_eq!(sanitize_title("a/b\\c:d*e?f\"g<h>i|j\nk\rl"), "abcdefghijkl");
    }

    #[test]
    fn test_sanitize_replaces_spaces() {
        assert_eq!(sanitize_title("Hello World  again"), "Hello-World--again");
    }

    #[test]
    fn test_sanitize_preserves_case_and_unicode() {
        assert_eq!(sanitize_title("Café Über 你好"), "Café-Über-你好");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "x".repeat(250);
        assert_eq!(sanitize_title(&long).len(), MAX_TITLE_LEN);

        // Truncation applies after removal, so removed chars don't count.
        let padded = format!("{}{}", "?".repeat(50), "y".repeat(100));
        assert_eq!(sanitize_title(&padded), "y".repeat(100));
    }

    #[test]
    fn test_sanitize_truncates_on_char_boundary() {
        // 3-byte characters: 33 of them fill 99 bytes, the 34th would overflow.
        let title = "你".repeat(40);
        let cleaned = sanitize_title(&title);
        assert!(cleaned.len() <= MAX_TITLE_LEN);
        assert_eq!(cleaned, "你".repeat(33));
    }

    #[test]
    fn test_sanitize_output_is_always_safe() {
        let slashes = "/ ".repeat(200);
        let words = "ab cd".repeat(60);
        let inputs: [&str; 7] = [
            "",
            " ",
            "plain",
            "a b/c\\d:e*f?g\"h<i>j|k\nl\rm",
            "   leading and trailing   ",
            &slashes,
            &words,
        ];
        for input in inputs {
            let out = sanitize_title(input);
            assert!(out.len() <= MAX_TITLE_LEN, "too long for {input:?}");
            assert!(!out.contains(' '), "space left in {out:?}");
            assert!(!out.chars().any(|c| ILLEGAL_CHARS.contains(&c)), "illegal char in {out:?}");
        }
    }

    #[test]
    fn test_ensure_markdown_ext() {
        assert_eq!(ensure_markdown_ext("note"), "note.md");
        assert_eq!(ensure_markdown_ext("note.md"), "note.md");
        assert_eq!(ensure_markdown_ext("note.MD"), "note.MD.md");
        assert_eq!(ensure_markdown_ext("note.txt"), "note.txt.md");
        assert_eq!(ensure_markdown_ext("archive.md.bak"), "archive.md.bak.md");
    }

    #[test]
    fn test_default_filename() {
        assert_eq!(
            default_filename("Hello World", &cst_date()),
            "20250309070501-Hello-World.md"
        );
    }

    #[test]
    fn test_resolve_filename() {
        let date = cst_date();
        assert_eq!(resolve_filename(Some("custom"), "ignored", &date), "custom.md");
        assert_eq!(resolve_filename(Some("custom.md"), "ignored", &date), "custom.md");
        assert_eq!(resolve_filename(Some(""), "T", &date), "20250309070501-T.md");
        assert_eq!(resolve_filename(None, "T", &date), "20250309070501-T.md");
    }

    #[test]
    fn test_resolved_filename_has_single_md_suffix() {
        let date = cst_date();
        for requested in [None, Some("a"), Some("a.md"), Some("b.txt")] {
            let name = resolve_filename(requested, "title", &date);
            assert!(name.ends_with(".md"));
            assert!(!name.ends_with(".md.md"), "double suffix in {name}");
        }
    }
}
