//! Export configuration

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::face::GeometryMode;

/// Forced tile capabilities for one block id; unset fields keep the inferred value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorOverride {
    #[serde(default)]
    pub provides_solid_face: Option<bool>,
    #[serde(default)]
    pub cull_over_edge: Option<bool>,
}

/// Configuration for one export run
#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Which rule decides the tilted-only shortcut
    pub geometry_mode: GeometryMode,
    /// Files processed in parallel (1 = sequential)
    pub jobs: usize,
    /// Grid used when the root group has none
    pub default_grid: u32,
    /// Structure ids whose groups never cover other faces
    pub non_colliding_structures: Vec<String>,
    /// Per block id capability overrides, applied after inference
    pub behavior_overrides: BTreeMap<String, BehaviorOverride>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            geometry_mode: GeometryMode::Client,
            jobs: 1,
            default_grid: 16,
            non_colliding_structures: vec!["noclip".to_string()],
            behavior_overrides: BTreeMap::new(),
        }
    }
}

impl ExportConfig {
    pub fn with_geometry_mode(mut self, mode: GeometryMode) -> Self {
        self.geometry_mode = mode;
        self
    }

    pub fn is_non_colliding(&self, structure_id: &str) -> bool {
        self.non_colliding_structures.iter().any(|id| id == structure_id)
    }

    /// Load behaviour overrides from a JSON object keyed by block id.
    pub fn load_overrides(&mut self, path: &Path) -> Result<()> {
        let json = std::fs::read_to_string(path)?;
        let overrides: BTreeMap<String, BehaviorOverride> = serde_json::from_str(&json)?;
        log::info!("Loaded {} behavior overrides from {}", overrides.len(), path.display());
        self.behavior_overrides.extend(overrides);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.geometry_mode, GeometryMode::Client);
        assert_eq!(config.jobs, 1);
        assert_eq!(config.default_grid, 16);
        assert!(config.is_non_colliding("noclip"));
        assert!(!config.is_non_colliding("door"));
    }

    #[test]
    fn test_load_overrides() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("overrides.json");
        std::fs::write(&path, r#"{"minecraft:glass": {"providesSolidFace": true}}"#).unwrap();

        let mut config = ExportConfig::default();
        config.load_overrides(&path).expect("load failed");

        let glass = config.behavior_overrides["minecraft:glass"];
        assert_eq!(glass.provides_solid_face, Some(true));
        assert_eq!(glass.cull_over_edge, None);
    }
}
