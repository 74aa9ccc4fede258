//! Hugo front matter.
//!
//! Only double quotes are escaped. Newlines in a title or tag pass through
//! unchanged and can break the YAML block.

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Metadata header for one entry.
#[derive(Debug, Clone)]
pub struct FrontMatter<'a> {
    pub title: &'a str,
    pub date: DateTime<FixedOffset>,
    pub draft: bool,
    pub tags: &'a [String],
    pub categories: &'a [String],
}

impl FrontMatter<'_> {
    /// Render the `---` delimited block, followed by a blank line.
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");

        // Writing into a String cannot fail.
        let _ = writeln!(out, "title: \"{}\"", escape_quotes(self.title));
        let _ = writeln!(
            out,
            "date: {}",
            self.date.to_rfc3339_opts(SecondsFormat::Secs, false)
        );
        let _ = writeln!(out, "draft: {}", self.draft);

        if !self.tags.is_empty() {
            let _ = writeln!(out, "tags: {}", quoted_list(self.tags));
        }
        if !self.categories.is_empty() {
            let _ = writeln!(out, "categories: {}", quoted_list(self.categories));
        }

        out.push_str("---\n\n");
        out
    }
}

/// Replace every `"` with `\"`.
pub fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| format!("\"{}\"", escape_quotes(item)))
        .collect();
    format!("[{}]", quoted.join(", "))
}
