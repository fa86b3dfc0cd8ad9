//! # Line Cleaner

use regex::Regex;

use crate::{
    errors::{SCResult, SpellchipperError},
    noise::tables::ACCENTED,
};

/// Zero-width characters removed before filtering.
pub const ZERO_WIDTH_CHARS: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// ASCII punctuation kept by the cleaner.
pub const ALLOWED_PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Filters corpus lines to Vietnamese letters, ASCII digits and punctuation,
/// and whitespace.
///
/// Cleaning is idempotent.
#[derive(Debug, Clone)]
pub struct LineCleaner {
    disallowed: Regex,
}

impl LineCleaner {
    /// Create a new line cleaner.
    pub fn new() -> SCResult<Self> {
        let pattern = format!(
            r"[^a-zA-Z0-9\s{}{}]+",
            regex::escape(ACCENTED),
            regex::escape(ALLOWED_PUNCTUATION),
        );
        Ok(Self {
            disallowed: Regex::new(&pattern)
                .map_err(|e| SpellchipperError::External(e.to_string()))?,
        })
    }

    /// Clean one line.
    ///
    /// ## Returns
    /// The filtered, trimmed line; possibly empty.
    pub fn clean(
        &self,
        line: &str,
    ) -> String {
        let line: String = line
            .chars()
            .filter(|c| !ZERO_WIDTH_CHARS.contains(c))
            .collect();
        self.disallowed.replace_all(&line, "").trim().to_string()
    }
}
