//! End-to-end conversions between indented text and relation mappings.
//!
//! [`Converter`] bundles the separator and base level that a caller uses on
//! both sides of a conversion, and returns the side information (warnings,
//! broken edges) together with the converted value.

use tracing::{info, instrument};

use crate::config::HierarchyConfig;
use crate::error::HierarchyError;
use crate::graph::{Hierarchy, NodeLevel, assign_levels, resolve_cycles};
use crate::indent::{Separator, SeparatorWarning};
use crate::mapping::RelationMapping;
use crate::render::to_indented_lines;

/// A mapping produced from indented text.
#[derive(Debug, Clone)]
pub struct MappingConversion {
    pub mapping: RelationMapping,
    pub warnings: Vec<SeparatorWarning>,
}

/// Indented text produced from a hierarchy.
#[derive(Debug, Clone)]
pub struct Rendering {
    pub lines: Vec<String>,
    pub rows: Vec<NodeLevel>,
    /// Edges that could not be expressed by nesting and were appended as
    /// two-line blocks.
    pub broken_edges: Vec<(String, String)>,
    /// Warnings from parsing, when the source was indented text.
    pub warnings: Vec<SeparatorWarning>,
}

/// Converts hierarchies with a fixed separator and base level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converter {
    separator: Separator,
    base_level: usize,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Separator::space(), 0)
    }
}

impl Converter {
    #[must_use]
    pub const fn new(separator: Separator, base_level: usize) -> Self {
        Self {
            separator,
            base_level,
        }
    }

    /// Build a converter from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::EmptySeparator`] for a zero-length
    /// separator.
    pub fn from_config(config: &HierarchyConfig) -> Result<Self, HierarchyError> {
        Ok(Self::new(config.separator()?, config.base_level))
    }

    #[must_use]
    pub const fn separator(&self) -> &Separator {
        &self.separator
    }

    #[must_use]
    pub const fn base_level(&self) -> usize {
        self.base_level
    }

    /// Indented text → relation mapping.
    ///
    /// # Errors
    ///
    /// Returns a [`HierarchyError`] if the text is not well nested.
    #[instrument(skip(self, text))]
    pub fn text_to_mapping(&self, text: &str) -> Result<MappingConversion, HierarchyError> {
        let parsed = Hierarchy::parse_indented_text(text, &self.separator)?;
        Ok(MappingConversion {
            mapping: parsed.hierarchy.to_mapping(),
            warnings: parsed.warnings,
        })
    }

    /// Relation mapping → indented text.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UndefinedChild`] if the mapping references
    /// a concept it does not define.
    #[instrument(skip(self, mapping))]
    pub fn mapping_to_text(&self, mapping: &RelationMapping) -> Result<Rendering, HierarchyError> {
        let hierarchy = Hierarchy::from_mapping(mapping)?;
        Ok(self.render(&hierarchy))
    }

    /// Re-render indented text with this converter's separator.
    ///
    /// # Errors
    ///
    /// Returns a [`HierarchyError`] if `text` is not well nested under
    /// `source`.
    pub fn reindent(&self, text: &str, source: &Separator) -> Result<Rendering, HierarchyError> {
        let parsed = Hierarchy::parse_indented_text(text, source)?;
        let mut rendering = self.render(&parsed.hierarchy);
        rendering.warnings = parsed.warnings;
        Ok(rendering)
    }

    /// Linearize `hierarchy`, breaking cycles as needed.
    #[must_use]
    pub fn render(&self, hierarchy: &Hierarchy) -> Rendering {
        let resolution = resolve_cycles(hierarchy);
        let rows = assign_levels(hierarchy, &resolution, self.base_level);
        let lines = to_indented_lines(&rows, &self.separator);
        if !resolution.broken_edges.is_empty() {
            info!(
                broken = resolution.broken_edges.len(),
                "hierarchy has cycles; broken edges appended"
            );
        }
        Rendering {
            lines,
            rows,
            broken_edges: resolution.broken_edges,
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_to_mapping_sorts_children() {
        let converter = Converter::default();
        let conversion = converter
            .text_to_mapping("a\n c\n b\n")
            .expect("valid text");
        assert_eq!(
            conversion.mapping.get("a"),
            Some(&["b".to_string(), "c".to_string()][..])
        );
        assert!(conversion.warnings.is_empty());
    }

    #[test]
    fn mapping_to_text_with_base_level() {
        let dots = Separator::indent("..").expect("non-empty separator");
        let converter = Converter::new(dots, 1);
        let mapping: RelationMapping = [("a", vec!["b"]), ("b", vec![])].into_iter().collect();
        let rendering = converter.mapping_to_text(&mapping).expect("valid mapping");
        assert_eq!(rendering.lines, vec!["..a", "....b"]);
        assert!(rendering.broken_edges.is_empty());
    }

    #[test]
    fn reindent_keeps_warnings() {
        let converter = Converter::default();
        let source = Separator::indent("--").expect("non-empty separator");
        let rendering = converter
            .reindent("n1\n--n2\n---n3", &source)
            .expect("warnings are not fatal");
        assert_eq!(rendering.warnings.len(), 1);
        assert_eq!(rendering.lines, vec!["n1", " n2", " -n3"]);
    }

    #[test]
    fn from_config_rejects_empty_separator() {
        let config = HierarchyConfig {
            separator: Some(String::new()),
            base_level: 0,
        };
        assert_eq!(
            Converter::from_config(&config),
            Err(HierarchyError::EmptySeparator)
        );
    }
}
