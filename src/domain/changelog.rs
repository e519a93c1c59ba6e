use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use super::Version;

/// Maps category labels (`feature`, `fix`, ...) to changelog section headers
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap {
    headers: HashMap<String, String>,
}

impl CategoryMap {
    /// Build a map from label -> header pairs. Labels are matched
    /// case-insensitively.
    pub fn new(headers: &HashMap<String, String>) -> Self {
        CategoryMap {
            headers: headers
                .iter()
                .map(|(label, header)| (label.to_lowercase(), header.clone()))
                .collect(),
        }
    }

    /// Resolve the section header for a category label.
    ///
    /// Unknown labels pass through with their first letter capitalized,
    /// so `perf` becomes `Perf`.
    pub fn header_for(&self, label: &str) -> String {
        let label = label.trim();
        if let Some(header) = self.headers.get(&label.to_lowercase()) {
            return header.clone();
        }

        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "Other".to_string(),
        }
    }

    /// Whether the label has a configured header
    pub fn is_known(&self, label: &str) -> bool {
        self.headers.contains_key(&label.trim().to_lowercase())
    }
}

/// A single release section of the changelog
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogEntry {
    pub version: Version,
    pub date: NaiveDate,
    pub header: String,
    pub items: Vec<String>,
}

impl ChangelogEntry {
    /// Build an entry from a free-text message.
    ///
    /// Every non-blank line becomes one bullet. A bullet marker the user
    /// already typed (`- ` or `* `) is dropped so it is not doubled.
    pub fn new(version: Version, date: NaiveDate, header: impl Into<String>, message: &str) -> Self {
        let items = message
            .lines()
            .map(str::trim)
            .map(|line| {
                line.strip_prefix("- ")
                    .or_else(|| line.strip_prefix("* "))
                    .unwrap_or(line)
                    .trim()
            })
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        ChangelogEntry {
            version,
            date,
            header: header.into(),
            items,
        }
    }

    /// Render the Markdown block, ending with a single newline
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChangelogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## [{}] - {}", self.version, self.date.format("%Y-%m-%d"))?;
        writeln!(f, "### {}", self.header)?;
        for item in &self.items {
            writeln!(f, "- {}", item)?;
        }
        Ok(())
    }
}

/// Insert a rendered entry at the top of existing changelog content.
///
/// A leading `# Title` line and the blank lines after it stay on top. The
/// bytes of everything that follows are kept exactly as they were.
pub fn insert_entry(existing: &str, block: &str) -> String {
    if existing.trim().is_empty() {
        return block.to_string();
    }

    let split = title_end(existing);
    let (title, rest) = existing.split_at(split);

    let mut out = String::with_capacity(existing.len() + block.len() + 2);
    out.push_str(title);
    if !title.is_empty() && !title.ends_with('\n') {
        out.push_str("\n\n");
    } else if !title.is_empty() && !title.ends_with("\n\n") {
        out.push('\n');
    }
    out.push_str(block);
    if !rest.is_empty() {
        out.push('\n');
        out.push_str(rest);
    }
    out
}

/// Byte offset just past the title line and its trailing blank lines, or 0
/// when the content has no `# ` title.
fn title_end(content: &str) -> usize {
    if !content.starts_with("# ") {
        return 0;
    }

    let mut offset = match content.find('\n') {
        Some(idx) => idx + 1,
        None => return content.len(),
    };

    while offset < content.len() {
        let line_end = content[offset..]
            .find('\n')
            .map(|idx| offset + idx + 1)
            .unwrap_or(content.len());
        if !content[offset..line_end].trim().is_empty() {
            break;
        }
        offset = line_end;
    }
    offset
}
