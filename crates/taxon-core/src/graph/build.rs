//! Hierarchy construction from indented text and from relation mappings.
//!
//! # Indented text
//!
//! Each non-blank line is parsed into `(label, level)` by
//! [`crate::indent::parse_line`]. The sequence must satisfy two rules:
//!
//! - a line is never more than one level deeper than the line before it;
//! - the first line sits at the shallowest level in the text (the *base
//!   level*).
//!
//! Edges are then reconstructed in one pass by remembering, for every open
//! level, the label that last appeared there. A line at level `L > base`
//! becomes a child of the holder of level `L - 1`. Going back to an equal or
//! shallower level closes all deeper levels.
//!
//! A label that occurs on several lines is a single node, but every
//! occurrence contributes its own edge. Re-indenting a concept under a second
//! parent is how indented text expresses multiple parents.
//!
//! # Relation mappings
//!
//! Keys become nodes in mapping order; every listed child becomes an edge.
//! A child that is not itself a key is rejected.

use std::collections::BTreeMap;

use tracing::{instrument, warn};

use super::Hierarchy;
use crate::error::HierarchyError;
use crate::indent::{Separator, SeparatorWarning, parse_line};
use crate::mapping::RelationMapping;

/// A hierarchy parsed from indented text together with the non-fatal
/// warnings raised on the way.
#[derive(Debug, Clone)]
pub struct ParsedText {
    pub hierarchy: Hierarchy,
    pub warnings: Vec<SeparatorWarning>,
}

impl Hierarchy {
    /// Build a hierarchy from indented text. Blank lines are skipped.
    ///
    /// Incomplete-separator warnings are logged through `tracing`; use
    /// [`Hierarchy::parse_indented_text`] to receive them as values.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::IndentJump`] or
    /// [`HierarchyError::FirstLineNotAtBase`] for malformed nesting.
    pub fn from_indented_text(text: &str, separator: &Separator) -> Result<Self, HierarchyError> {
        Ok(Self::parse_indented_text(text, separator)?.hierarchy)
    }

    /// Like [`Hierarchy::from_indented_text`], but also returns warnings.
    ///
    /// # Errors
    ///
    /// Same as [`Hierarchy::from_indented_text`].
    pub fn parse_indented_text(
        text: &str,
        separator: &Separator,
    ) -> Result<ParsedText, HierarchyError> {
        Self::parse_indented_lines(text.lines(), separator)
    }

    /// Build a hierarchy from already split lines.
    ///
    /// # Errors
    ///
    /// Same as [`Hierarchy::from_indented_text`].
    #[instrument(skip(lines))]
    pub fn parse_indented_lines<'a, I>(
        lines: I,
        separator: &Separator,
    ) -> Result<ParsedText, HierarchyError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rows: Vec<(String, usize)> = Vec::new();
        let mut warnings = Vec::new();

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let parsed = parse_line(line, separator);
            if let Some(warning) = parsed.warning {
                warn!(label = %warning.label, separator = %warning.separator, "{warning}");
                warnings.push(warning);
            }
            rows.push((parsed.label, parsed.level));
        }

        let hierarchy = Self::from_levels(rows)?;
        Ok(ParsedText {
            hierarchy,
            warnings,
        })
    }

    /// Build a hierarchy from `(label, level)` rows.
    ///
    /// This is the entry point for callers that know each concept's level
    /// from somewhere other than separator characters. The same nesting
    /// rules as for indented text apply.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::IndentJump`] if a row is more than one level
    /// deeper than its predecessor, and [`HierarchyError::FirstLineNotAtBase`]
    /// if the first row is not at the minimum level.
    pub fn from_levels<I, S>(rows: I) -> Result<Self, HierarchyError>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let rows: Vec<(String, usize)> = rows
            .into_iter()
            .map(|(label, level)| (label.into(), level))
            .collect();

        let base_level = validate_levels(&rows)?;

        let mut hierarchy = Self::new();
        for (label, _) in &rows {
            hierarchy.add_node(label);
        }
        for (parent, child) in nesting_edges(&rows, base_level) {
            hierarchy.add_edge(parent, child);
        }
        Ok(hierarchy)
    }

    /// Build a hierarchy from a relation mapping.
    ///
    /// Nodes follow the mapping's key order; edges follow key order and then
    /// child order.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UndefinedChild`] for the first child that is
    /// not also a key of `mapping`.
    #[instrument(skip(mapping), fields(concepts = mapping.len()))]
    pub fn from_mapping(mapping: &RelationMapping) -> Result<Self, HierarchyError> {
        let mut hierarchy = Self::new();
        for concept in mapping.concepts() {
            hierarchy.add_node(concept);
        }

        for (concept, children) in mapping.iter() {
            for child in children {
                if !mapping.contains(child) {
                    return Err(HierarchyError::UndefinedChild {
                        child: child.clone(),
                    });
                }
                hierarchy.add_edge(concept, child);
            }
        }
        Ok(hierarchy)
    }

    /// Serialize to a relation mapping: every node, in node order, with the
    /// sorted list of its direct children.
    ///
    /// Cycles are kept as they are; nothing is broken.
    #[must_use]
    pub fn to_mapping(&self) -> RelationMapping {
        let mut mapping = RelationMapping::new();
        for node in self.nodes() {
            let mut children: Vec<String> =
                self.children(node).into_iter().map(str::to_string).collect();
            children.sort_unstable();
            mapping.insert(node, children);
        }
        mapping
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Check the nesting rules and return the base level.
///
/// Indentation jumps are reported before a misplaced first line.
fn validate_levels(rows: &[(String, usize)]) -> Result<usize, HierarchyError> {
    for pair in rows.windows(2) {
        let (_, previous) = &pair[0];
        let (label, level) = &pair[1];
        if level.saturating_sub(*previous) > 1 {
            return Err(HierarchyError::IndentJump {
                label: label.clone(),
            });
        }
    }

    let Some((first_label, first_level)) = rows.first() else {
        return Ok(0);
    };
    let base_level = rows.iter().map(|(_, level)| *level).min().unwrap_or(0);
    if *first_level != base_level {
        return Err(HierarchyError::FirstLineNotAtBase {
            label: first_label.clone(),
        });
    }
    Ok(base_level)
}

/// Reconstruct parent → child edges from validated rows.
fn nesting_edges(rows: &[(String, usize)], base_level: usize) -> Vec<(&str, &str)> {
    // Holder of every open level. Keys are always base..=current.
    let mut holders: BTreeMap<usize, &str> = BTreeMap::new();
    let mut edges = Vec::new();

    for (label, level) in rows {
        // Returning to an equal or shallower level closes everything deeper.
        holders.retain(|open, _| open <= level);
        holders.insert(*level, label.as_str());

        if *level > base_level {
            if let Some(parent) = holders.get(&(level - 1)) {
                edges.push((*parent, label.as_str()));
            }
        }
    }
    edges
}
