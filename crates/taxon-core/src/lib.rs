#![forbid(unsafe_code)]
//! taxon-core library.
//!
//! Converts concept hierarchies between indented text and narrower-relation
//! mappings. Graphs that indented text cannot express (multiple parents,
//! cycles) are made renderable by breaking a deterministic set of edges and
//! appending each broken edge as its own two-line block.
//!
//! # Conventions
//!
//! - **Errors**: Library operations return [`HierarchyError`]; file and
//!   configuration loading uses `anyhow::Result` with context.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod config;
pub mod convert;
pub mod error;
pub mod graph;
pub mod indent;
pub mod mapping;
pub mod render;

pub use config::{HierarchyConfig, TaxonConfig, load_config, parse_config};
pub use convert::{Converter, MappingConversion, Rendering};
pub use error::{ErrorCode, HierarchyError};
pub use graph::{
    CycleResolution, Hierarchy, NodeLevel, ParsedText, assign_levels, cycle_basis, resolve_cycles,
};
pub use indent::{ParsedLine, Separator, SeparatorWarning, parse_line};
pub use mapping::{RelationMapping, format_children_cell, parse_children_cell};
pub use render::to_indented_lines;
