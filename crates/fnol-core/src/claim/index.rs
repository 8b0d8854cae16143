//! Label/value index over `label: value` style lines.

use std::collections::HashMap;

/// Colon positions must fall strictly inside this window to count as a label.
const MIN_COLON_POSITION: usize = 1;
const MAX_COLON_POSITION: usize = 60;

/// Case-insensitive lookup table built from `label: value` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    entries: HashMap<String, String>,
}

impl LineIndex {
    /// Index every `label: value` line of the text.
    ///
    /// Lines shorter than three characters, lines without a colon, and lines
    /// whose first colon sits at position 0, 1, or 60 and beyond are skipped.
    /// Entries with an empty value are dropped. A repeated label keeps the
    /// last value.
    pub fn build(text: &str) -> Self {
        let mut entries = HashMap::new();

        for line in text.split(['\n', '\r']) {
            let line = line.trim();
            if line.chars().count() < 3 {
                continue;
            }

            let Some((byte_pos, char_pos)) = first_colon(line) else {
                continue;
            };
            if char_pos <= MIN_COLON_POSITION || char_pos >= MAX_COLON_POSITION {
                continue;
            }

            let label = line[..byte_pos].trim().to_lowercase();
            let value = line[byte_pos + 1..].trim();
            if value.is_empty() {
                continue;
            }

            entries.insert(label, value.to_string());
        }

        Self { entries }
    }

    /// Look up a label, ignoring case and surrounding whitespace.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .get(&label.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Byte offset and character position of the first colon.
fn first_colon(line: &str) -> Option<(usize, usize)> {
    line.char_indices()
        .enumerate()
        .find(|(_, (_, c))| *c == ':')
        .map(|(char_pos, (byte_pos, _))| (byte_pos, char_pos))
}
