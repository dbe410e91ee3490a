//! Parsing of single indented lines.
//!
//! A line such as `"....narrower"` with separator `".."` is read as the label
//! `narrower` at level 2. The level is the number of whole separator tokens
//! at the start of the line; everything after them is the label.
//!
//! A multi-character separator that is only partially present (`"---x"` with
//! separator `"--"`) cannot be told apart from label content. Such lines still
//! parse, with the leftover characters kept in the label, but they come with
//! a [`SeparatorWarning`] so the caller can flag a likely miscount.

use std::fmt;

use crate::error::HierarchyError;

// ---------------------------------------------------------------------------
// Separator
// ---------------------------------------------------------------------------

/// The token that encodes one level of nesting in indented text.
///
/// A *flat* separator means the text carries no nesting at all: every line is
/// a level-0 label. Callers whose levels come from elsewhere (for example a
/// spreadsheet cell's indent attribute) use the flat separator together with
/// [`crate::Hierarchy::from_levels`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Separator {
    token: Option<String>,
}

impl Separator {
    /// No separator: levels are always 0 and labels are trimmed lines.
    #[must_use]
    pub const fn flat() -> Self {
        Self { token: None }
    }

    /// A single space, the usual separator for hand-written outlines.
    #[must_use]
    pub fn space() -> Self {
        Self {
            token: Some(" ".to_string()),
        }
    }

    /// Use `token` as the per-level separator.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::EmptySeparator`] if `token` is empty.
    pub fn indent(token: impl Into<String>) -> Result<Self, HierarchyError> {
        let token = token.into();
        if token.is_empty() {
            return Err(HierarchyError::EmptySeparator);
        }
        Ok(Self { token: Some(token) })
    }

    /// The separator token, or `None` for the flat separator.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns `true` for the flat separator.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.token.is_none()
    }

    /// The indentation prefix for `level`. Empty for the flat separator.
    #[must_use]
    pub fn prefix(&self, level: usize) -> String {
        self.token
            .as_deref()
            .map_or_else(String::new, |token| token.repeat(level))
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::space()
    }
}

// ---------------------------------------------------------------------------
// Parse result
// ---------------------------------------------------------------------------

/// Non-fatal notice that a line may carry an incomplete separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorWarning {
    /// The label as parsed, including the suspicious leading characters.
    pub label: String,
    /// The configured separator token.
    pub separator: String,
}

impl fmt::Display for SeparatorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line \"{}\": Incomplete separator \"{}\"?",
            self.label, self.separator
        )
    }
}

/// One parsed line of indented text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub label: String,
    pub level: usize,
    pub warning: Option<SeparatorWarning>,
}

/// Split `line` into its label and nesting level.
///
/// Trailing whitespace is dropped before counting. With the flat separator
/// the whole trimmed line is the label at level 0.
#[must_use]
pub fn parse_line(line: &str, separator: &Separator) -> ParsedLine {
    let Some(token) = separator.token() else {
        return ParsedLine {
            label: line.trim().to_string(),
            level: 0,
            warning: None,
        };
    };

    let mut rest = line.trim_end();
    let mut level = 0;
    while let Some(stripped) = rest.strip_prefix(token) {
        rest = stripped;
        level += 1;
    }

    let warning = token
        .chars()
        .next()
        .filter(|first| token.chars().count() > 1 && rest.starts_with(*first))
        .map(|_| SeparatorWarning {
            label: rest.to_string(),
            separator: token.to_string(),
        });

    ParsedLine {
        label: rest.to_string(),
        level,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sep(token: &str) -> Separator {
        Separator::indent(token).expect("non-empty separator")
    }

    #[test]
    fn counts_leading_tokens() {
        let parsed = parse_line("   L1", &Separator::space());
        assert_eq!(parsed.label, "L1");
        assert_eq!(parsed.level, 3);
        assert!(parsed.warning.is_none());
    }

    #[test]
    fn multi_char_separator() {
        let parsed = parse_line("....c1", &sep(".."));
        assert_eq!(parsed.label, "c1");
        assert_eq!(parsed.level, 2);
    }

    #[test]
    fn label_keeps_inner_separator_text() {
        let parsed = parse_line("-label-with-dashes", &sep("-"));
        assert_eq!(parsed.label, "label-with-dashes");
        assert_eq!(parsed.level, 1);
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        let parsed = parse_line("  b1  \t", &Separator::space());
        assert_eq!(parsed.label, "b1");
        assert_eq!(parsed.level, 2);
    }

    #[test]
    fn flat_separator_is_always_level_zero() {
        let parsed = parse_line("  n1 ", &Separator::flat());
        assert_eq!(parsed.label, "n1");
        assert_eq!(parsed.level, 0);
        assert!(parsed.warning.is_none());
    }

    #[test]
    fn incomplete_separator_warns() {
        let parsed = parse_line("---n3", &sep("--"));
        assert_eq!(parsed.label, "-n3");
        assert_eq!(parsed.level, 1);
        let warning = parsed.warning.expect("warning expected");
        assert_eq!(warning.to_string(), "Line \"-n3\": Incomplete separator \"--\"?");
    }

    #[test]
    fn single_char_separator_never_warns() {
        // A one-character token is always consumed whole.
        let parsed = parse_line("--x", &sep("-"));
        assert_eq!(parsed.level, 2);
        assert!(parsed.warning.is_none());
    }

    #[test]
    fn empty_separator_is_rejected() {
        assert_eq!(Separator::indent(""), Err(HierarchyError::EmptySeparator));
    }

    #[test]
    fn prefix_repeats_token() {
        assert_eq!(sep("..").prefix(3), "......");
        assert_eq!(Separator::flat().prefix(3), "");
        assert_eq!(Separator::space().prefix(0), "");
    }
}
