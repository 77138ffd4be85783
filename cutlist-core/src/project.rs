//! Versioned project snapshots.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::error::Result;
use crate::model::{GrainPreferences, Part, Sheet, SheetLayout};

/// Version written by [`ProjectSnapshot`] exports.
pub const PROJECT_VERSION: &str = "3.0";

/// Versions accepted on import.
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0", "2.0", "3.0"];

/// Full engine state: catalog, settings, grain table and last result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub version: String,
    /// Unix timestamp of the export, if the caller stamped one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<u64>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grain_preferences: Option<GrainPreferences>,
    #[serde(default)]
    pub results: Vec<SheetLayout>,
}

impl Default for ProjectSnapshot {
    fn default() -> Self {
        Self {
            version: PROJECT_VERSION.to_string(),
            exported_at: None,
            parts: Vec::new(),
            sheets: Vec::new(),
            settings: None,
            grain_preferences: None,
            results: Vec::new(),
        }
    }
}

impl ProjectSnapshot {
    /// Parse a snapshot from JSON text. The version is not checked here.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading project {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the snapshot as indented JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!("Saving project {}", path.display());
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Whether [`crate::Optimizer::import_project`] accepts this version.
    pub fn is_supported(&self) -> bool {
        SUPPORTED_VERSIONS.contains(&self.version.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Material;
    use pretty_assertions::assert_eq;

    fn snapshot() -> ProjectSnapshot {
        ProjectSnapshot {
            parts: vec![Part::new(1, "Side", 720, 560, Material::parse("ПДЧ 18мм"))],
            sheets: vec![Sheet::new("sheet-1", "Egger", 2800, 2070, 80.0, Material::parse("ПДЧ 18мм"))],
            settings: Some(Settings::default()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_version() {
        assert_eq!(ProjectSnapshot::default().version, "3.0");
        assert!(ProjectSnapshot::default().is_supported());
    }

    #[test]
    fn test_supported_versions() {
        let mut snap = snapshot();
        for version in ["1.0", "2.0", "3.0"] {
            snap.version = version.into();
            assert!(snap.is_supported());
        }
        snap.version = "0.9".into();
        assert!(!snap.is_supported());
    }

    #[test]
    fn test_minimal_json_defaults_sections() {
        let snap = ProjectSnapshot::from_json(r#"{"version": "1.0"}"#).unwrap();
        assert!(snap.parts.is_empty());
        assert!(snap.sheets.is_empty());
        assert!(snap.settings.is_none());
        assert!(snap.grain_preferences.is_none());
        assert!(snap.exported_at.is_none());
    }

    #[test]
    fn test_partial_settings_merge_over_defaults() {
        let snap = ProjectSnapshot::from_json(
            r#"{"version": "2.0", "settings": {"allowRotation": false, "sortingMethod": "maxside"}}"#,
        )
        .unwrap();
        let settings = snap.settings.unwrap();
        assert!(!settings.allow_rotation);
        assert_eq!(settings.sorting_method, crate::config::SortingMethod::MaxSide);
        assert_eq!(settings.min_waste_area, 10_000);
        assert!(settings.respect_grain_direction);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kitchen.json");

        let snap = snapshot();
        snap.save(&path).unwrap();
        let loaded = ProjectSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snap);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectSnapshot::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, crate::error::CutlistError::Io(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = ProjectSnapshot::from_json("{not json").unwrap_err();
        assert_eq!(err.code_value(), 301);
    }
}
