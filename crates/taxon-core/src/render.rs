//! Indented-text rendering of level sequences.

use crate::graph::NodeLevel;
use crate::indent::Separator;

/// Render each row as `level × separator + node`.
///
/// With the flat separator every line is the bare label; the levels are
/// then the caller's to carry some other way.
#[must_use]
pub fn to_indented_lines(rows: &[NodeLevel], separator: &Separator) -> Vec<String> {
    rows.iter()
        .map(|row| format!("{}{}", separator.prefix(row.level), row.node))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_prefix_per_level() {
        let rows = vec![
            NodeLevel::new("a1", 0),
            NodeLevel::new("b1", 1),
            NodeLevel::new("c1", 2),
        ];
        let dots = Separator::indent("..").expect("non-empty separator");
        assert_eq!(to_indented_lines(&rows, &dots), vec!["a1", "..b1", "....c1"]);
    }

    #[test]
    fn flat_separator_drops_indentation() {
        let rows = vec![NodeLevel::new("a", 0), NodeLevel::new("b", 3)];
        assert_eq!(to_indented_lines(&rows, &Separator::flat()), vec!["a", "b"]);
    }
}
