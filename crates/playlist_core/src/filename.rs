use crate::Record;

/// Longest file stem we produce, in characters.
pub const MAX_FILENAME_CHARS: usize = 200;

/// Stem used when nothing printable is left after sanitizing.
pub const PLACEHOLDER_NAME: &str = "untitled";

/// Human file stem for a record: `artist - title`, else title, else artist,
/// else the external id. Not yet sanitized.
pub fn derive_base_name(record: &Record) -> String {
    let artist = record.artist.trim();
    let title = record.title.trim();
    match (artist.is_empty(), title.is_empty()) {
        (false, false) => format!("{artist} - {title}"),
        (true, false) => title.to_string(),
        (false, true) => artist.to_string(),
        (true, true) => record.external_id.trim().to_string(),
    }
}

/// Filesystem-safe stem: drops characters that are illegal on common
/// filesystems, collapses whitespace runs, trims spaces and dots at both ends
/// and caps the length.
pub fn sanitize_filename(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| !is_forbidden(*c)).collect();

    let mut collapsed = String::with_capacity(stripped.len());
    for word in stripped.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }

    let mut name = trim_edges(&collapsed).to_string();
    if name.chars().count() > MAX_FILENAME_CHARS {
        name = name.chars().take(MAX_FILENAME_CHARS).collect();
        // Truncation can expose a trailing space or dot.
        name = trim_edges(&name).to_string();
    }

    if name.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        name
    }
}

fn trim_edges(name: &str) -> &str {
    name.trim_matches(&[' ', '.'][..])
}

fn is_forbidden(c: char) -> bool {
    // Tabs and newlines are left for the whitespace collapse.
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
        || (c.is_control() && !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::{sanitize_filename, MAX_FILENAME_CHARS};

    #[test]
    fn control_characters_are_removed() {
        assert_eq!(sanitize_filename("a\u{7}b\tc"), "ab c");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let long = "ä".repeat(MAX_FILENAME_CHARS + 10);
        let name = sanitize_filename(&long);
        assert_eq!(name.chars().count(), MAX_FILENAME_CHARS);
    }

    #[test]
    fn truncation_retrims_trailing_dots() {
        let mut input = "x".repeat(MAX_FILENAME_CHARS - 1);
        input.push_str("...tail");
        let name = sanitize_filename(&input);
        assert_eq!(name, "x".repeat(MAX_FILENAME_CHARS - 1));
    }
}
