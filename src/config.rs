//! Layout configuration.
//!
//! All distances are in layout units (pixels for the default renderer). The
//! defaults match the card size the tree view draws; hosts can override any
//! subset from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of one member card
    pub node_width: f64,
    /// Height of one member card
    pub node_height: f64,
    /// Gap between neighbouring cards that are not partners
    pub node_margin: f64,
    /// Centre-to-centre distance between two partners
    pub spouse_gap: f64,
    /// Vertical distance between generations
    pub row_height: f64,
    /// Horizontal gap between independent family components
    pub component_gap: f64,
    /// Emit display-only sibling edges for siblings without a shared parent
    pub emit_sibling_edges: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            node_height: 60.0,
            node_margin: 40.0,
            spouse_gap: 180.0,
            row_height: 140.0,
            component_gap: 80.0,
            emit_sibling_edges: true,
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: LayoutConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let distances = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("node_margin", self.node_margin),
            ("spouse_gap", self.spouse_gap),
            ("row_height", self.row_height),
            ("component_gap", self.component_gap),
        ];
        for (field, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a finite, non-negative number (got {value})"),
                });
            }
        }
        if self.node_width <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "node_width",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.row_height <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "row_height",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.spouse_gap < self.node_width {
            return Err(ConfigError::Invalid {
                field: "spouse_gap",
                reason: format!(
                    "must be at least node_width ({}) so partner cards do not overlap (got {})",
                    self.node_width, self.spouse_gap
                ),
            });
        }
        Ok(())
    }

    /// Width reserved by a single member
    pub fn single_width(&self) -> f64 {
        self.node_width
    }

    /// Width reserved by a couple, outer edge to outer edge
    pub fn couple_width(&self) -> f64 {
        self.node_width + self.spouse_gap
    }

    /// y coordinate of a generation row
    pub fn row_y(&self, level: u32) -> f64 {
        f64::from(level) * self.row_height
    }
}
