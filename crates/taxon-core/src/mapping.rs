//! Relation mappings: concept → ordered list of narrower concepts.
//!
//! This is the explicit exchange format for a hierarchy. Key order is
//! significant (it becomes node order), so the mapping is stored as an
//! ordered entry list with a lookup index rather than a hash map.
//!
//! # Children cells
//!
//! Tabular sources usually keep the child list of a concept in one cell as
//! comma-separated labels (`"ex:2, ex:3"`). [`parse_children_cell`] and
//! [`format_children_cell`] convert between that form and a list.
//!
//! # JSON
//!
//! A mapping serializes as a JSON object whose key order is the mapping
//! order:
//!
//! ```json
//! { "ex:1": ["ex:2", "ex:3"], "ex:2": [], "ex:3": [] }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered mapping from concept to its narrower concepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationMapping {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl RelationMapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the children of `concept`.
    ///
    /// A new concept is appended; an existing one keeps its position and has
    /// its children replaced.
    pub fn insert(&mut self, concept: impl Into<String>, children: Vec<String>) {
        let concept = concept.into();
        if let Some(&pos) = self.index.get(&concept) {
            self.entries[pos].1 = children;
            return;
        }
        self.index.insert(concept.clone(), self.entries.len());
        self.entries.push((concept, children));
    }

    /// Children of `concept`, if it is a key.
    #[must_use]
    pub fn get(&self, concept: &str) -> Option<&[String]> {
        self.index
            .get(concept)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Returns `true` if `concept` is a key.
    #[must_use]
    pub fn contains(&self, concept: &str) -> bool {
        self.index.contains_key(concept)
    }

    /// Number of concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the mapping has no concepts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concepts in mapping order.
    pub fn concepts(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(concept, _)| concept.as_str())
    }

    /// `(concept, children)` pairs in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.entries
            .iter()
            .map(|(concept, children)| (concept.as_str(), children.as_slice()))
    }

    /// Build a mapping from `(concept, children cell)` rows.
    ///
    /// A concept that appears on several rows takes the children of the last
    /// one but keeps the position of the first.
    pub fn from_children_cells<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut mapping = Self::new();
        for (concept, cell) in rows {
            mapping.insert(concept.trim(), parse_children_cell(cell));
        }
        mapping
    }

    /// The mapping as `(concept, children cell)` rows.
    #[must_use]
    pub fn to_children_cells(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(concept, children)| (concept.to_string(), format_children_cell(children)))
            .collect()
    }

    /// Parse a mapping from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or values that are
    /// not arrays of strings.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Render the mapping as pretty-printed JSON, keys in mapping order.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for RelationMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, Vec<V>)>>(iter: T) -> Self {
        let mut mapping = Self::new();
        for (concept, children) in iter {
            mapping.insert(concept, children.into_iter().map(Into::into).collect());
        }
        mapping
    }
}

impl Serialize for RelationMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (concept, children) in &self.entries {
            map.serialize_entry(concept, children)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RelationMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = RelationMapping;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from concept to a list of narrower concepts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut mapping = RelationMapping::new();
                while let Some((concept, children)) = access.next_entry::<String, Vec<String>>()? {
                    mapping.insert(concept, children);
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

// ---------------------------------------------------------------------------
// Children cells
// ---------------------------------------------------------------------------

/// Split a comma-separated children cell into trimmed labels.
///
/// Blank cells and empty items (`"a,,b"`, trailing commas) yield no labels.
#[must_use]
pub fn parse_children_cell(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join child labels into a children cell (`"a, b, c"`).
#[must_use]
pub fn format_children_cell(children: &[String]) -> String {
    children.join(", ")
}
