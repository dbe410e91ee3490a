use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::HierarchyError;
use crate::indent::Separator;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonConfig {
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
}

/// Settings shared by both directions of a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Per-level indent token. Absent means no separator: levels come from
    /// the caller, and rendered lines carry no indentation.
    #[serde(default)]
    pub separator: Option<String>,
    /// Level of root concepts when rendering.
    #[serde(default)]
    pub base_level: usize,
}

impl HierarchyConfig {
    /// The configured separator.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::EmptySeparator`] for `separator = ""`.
    pub fn separator(&self) -> Result<Separator, HierarchyError> {
        self.separator
            .as_deref()
            .map_or_else(|| Ok(Separator::flat()), Separator::indent)
    }
}

/// Load configuration from a TOML file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<TaxonConfig> {
    if !path.exists() {
        return Ok(TaxonConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse configuration from TOML text.
///
/// # Errors
///
/// Returns an error for invalid TOML or mistyped fields.
pub fn parse_config(content: &str) -> Result<TaxonConfig> {
    Ok(toml::from_str::<TaxonConfig>(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let cfg = load_config(&dir.path().join("taxon.toml")).expect("load should succeed");
        assert_eq!(cfg, TaxonConfig::default());
        assert!(cfg.hierarchy.separator().expect("valid").is_flat());
        assert_eq!(cfg.hierarchy.base_level, 0);
    }

    #[test]
    fn config_file_is_parsed() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("taxon.toml");
        std::fs::write(
            &path,
            r#"
[hierarchy]
separator = ".."
base_level = 1
"#,
        )
        .expect("write config");

        let cfg = load_config(&path).expect("load should succeed");
        assert_eq!(cfg.hierarchy.separator.as_deref(), Some(".."));
        assert_eq!(cfg.hierarchy.base_level, 1);
        assert_eq!(
            cfg.hierarchy.separator().expect("valid").token(),
            Some("..")
        );
    }

    #[test]
    fn empty_separator_is_rejected() {
        let cfg = parse_config("[hierarchy]\nseparator = \"\"\n").expect("toml is valid");
        assert_eq!(
            cfg.hierarchy.separator(),
            Err(HierarchyError::EmptySeparator)
        );
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("taxon.toml");
        std::fs::write(&path, "[hierarchy]\nbase_level = \"deep\"\n").expect("write config");

        let err = load_config(&path).expect_err("base_level must be an integer");
        assert!(err.to_string().contains("Failed to parse"));
    }
}
