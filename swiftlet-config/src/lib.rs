//! Serde-facing configuration for the swiftlet canvases.
//!
//! An embedding page supplies these settings (typically as JSON) and the
//! drivers convert them into the core's tuning structs. Validation happens
//! once, up front, so a misconfigured sprite sheet fails loudly at mount
//! time instead of optional-chaining its way into a blank animation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use swiftlet_core::{BirdConfig, FlockConfig, Sequence, SequenceTable};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("missing required sequence `{0}`")]
    MissingSequence(&'static str),
    #[error("sequence `{name}` has zero frames")]
    EmptySequence { name: String },
    #[error("sequence `{name}` fps must be positive, got {fps}")]
    NonPositiveRate { name: String, fps: f32 },
    #[error("sequence `{name}` row {row} is outside the {rows}-row sprite grid")]
    RowOutOfGrid { name: String, row: u32, rows: u32 },
    #[error("sequence `{name}` has {frames} frames but the grid has {columns} columns")]
    TooManyFrames {
        name: String,
        frames: u32,
        columns: u32,
    },
    #[error("sprite grid must have at least one row and one column")]
    EmptyGrid,
    #[error("no perch selectors configured")]
    NoSelectors,
    #[error("perch selector at index {0} is empty")]
    EmptySelector(usize),
    #[error("`{0}` must be positive")]
    NonPositive(&'static str),
    #[error("`{0}` must not be negative")]
    Negative(&'static str),
    #[error("`{name}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
}

/// Settings for the flocking canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockSettings {
    pub count: usize,
    pub base_speed: f32,
    pub base_size: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub neighbor_radius: f32,
    pub separation_radius: f32,
    pub mouse_radius: f32,
    /// Canvas background, also the motion-blur fill color.
    pub background: String,
    /// Alpha of the per-frame background repaint; lower leaves longer trails.
    pub trail_alpha: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        let core = FlockConfig::default();
        Self {
            count: 48,
            base_speed: core.base_speed,
            base_size: core.base_size,
            alignment_weight: core.alignment_weight,
            cohesion_weight: core.cohesion_weight,
            separation_weight: core.separation_weight,
            neighbor_radius: core.neighbor_radius,
            separation_radius: core.separation_radius,
            mouse_radius: core.mouse_radius,
            background: "#0a0a0a".to_string(),
            trail_alpha: 0.12,
        }
    }
}

impl FlockSettings {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.count == 0 {
            return Err(ProfileError::NonPositive("count"));
        }
        if self.base_speed <= 0.0 {
            return Err(ProfileError::NonPositive("base_speed"));
        }
        if self.base_size <= 0.0 {
            return Err(ProfileError::NonPositive("base_size"));
        }
        if self.neighbor_radius <= 0.0 {
            return Err(ProfileError::NonPositive("neighbor_radius"));
        }
        if self.separation_radius <= 0.0 {
            return Err(ProfileError::NonPositive("separation_radius"));
        }
        if self.mouse_radius <= 0.0 {
            return Err(ProfileError::NonPositive("mouse_radius"));
        }
        // Zero disables a force; a negative weight inverts it.
        let weights = [
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
        ];
        for (name, weight) in weights {
            if weight < 0.0 {
                return Err(ProfileError::Negative(name));
            }
        }
        if !(0.0..=1.0).contains(&self.trail_alpha) {
            return Err(ProfileError::OutOfRange {
                name: "trail_alpha",
                min: 0.0,
                max: 1.0,
                value: self.trail_alpha,
            });
        }
        Ok(())
    }

    pub fn to_config(&self) -> FlockConfig {
        FlockConfig {
            base_speed: self.base_speed,
            base_size: self.base_size,
            alignment_weight: self.alignment_weight,
            cohesion_weight: self.cohesion_weight,
            separation_weight: self.separation_weight,
            neighbor_radius: self.neighbor_radius,
            separation_radius: self.separation_radius,
            mouse_radius: self.mouse_radius,
            ..FlockConfig::default()
        }
    }
}

/// Dimensions of the fixed sprite grid: frames run along columns, sequences
/// along rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpriteGrid {
    pub columns: u32,
    pub rows: u32,
}

/// One animation sequence as configured: a grid row, its frame count and
/// playback rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SequenceSpec {
    pub row: u32,
    pub frames: u32,
    pub fps: f32,
}

impl SequenceSpec {
    fn to_sequence(self) -> Sequence {
        Sequence {
            row: self.row,
            frame_count: self.frames,
            fps: self.fps,
        }
    }
}

/// Full configuration for the perching-bird canvas: the contract an
/// embedding page must supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdSettings {
    /// Sprite sheet URL; an unloadable image falls back to a vector shape.
    pub sprite_url: String,
    pub size: f32,
    pub base_speed: f32,
    pub repel_distance: f32,
    /// CSS selectors the perch scan queries for landing targets.
    pub perch_selectors: Vec<String>,
    pub grid: SpriteGrid,
    /// State name ("flying", "searching", "approaching", "perched",
    /// "fleeing") to sequence. Flying, perched and fleeing are required.
    pub sequences: BTreeMap<String, SequenceSpec>,
}

impl Default for BirdSettings {
    fn default() -> Self {
        let core = BirdConfig::default();
        let mut sequences = BTreeMap::new();
        sequences.insert(
            "flying".to_string(),
            SequenceSpec {
                row: 0,
                frames: 6,
                fps: 12.0,
            },
        );
        sequences.insert(
            "perched".to_string(),
            SequenceSpec {
                row: 1,
                frames: 4,
                fps: 4.0,
            },
        );
        sequences.insert(
            "fleeing".to_string(),
            SequenceSpec {
                row: 2,
                frames: 6,
                fps: 18.0,
            },
        );
        Self {
            sprite_url: String::new(),
            size: core.size,
            base_speed: core.base_speed,
            repel_distance: core.repel_distance,
            perch_selectors: vec!["[data-perch]".to_string()],
            grid: SpriteGrid {
                columns: 6,
                rows: 3,
            },
            sequences,
        }
    }
}

impl BirdSettings {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.size <= 0.0 {
            return Err(ProfileError::NonPositive("size"));
        }
        if self.base_speed <= 0.0 {
            return Err(ProfileError::NonPositive("base_speed"));
        }
        if self.repel_distance <= 0.0 {
            return Err(ProfileError::NonPositive("repel_distance"));
        }
        if self.perch_selectors.is_empty() {
            return Err(ProfileError::NoSelectors);
        }
        for (i, selector) in self.perch_selectors.iter().enumerate() {
            if selector.trim().is_empty() {
                return Err(ProfileError::EmptySelector(i));
            }
        }
        self.sequence_table().map(|_| ())
    }

    /// Builds the core lookup table, enforcing the required sequences and
    /// that every configured sequence fits the sprite grid.
    pub fn sequence_table(&self) -> Result<SequenceTable, ProfileError> {
        if self.grid.columns == 0 || self.grid.rows == 0 {
            return Err(ProfileError::EmptyGrid);
        }

        for (name, spec) in &self.sequences {
            if spec.frames == 0 {
                return Err(ProfileError::EmptySequence { name: name.clone() });
            }
            if spec.fps <= 0.0 {
                return Err(ProfileError::NonPositiveRate {
                    name: name.clone(),
                    fps: spec.fps,
                });
            }
            if spec.row >= self.grid.rows {
                return Err(ProfileError::RowOutOfGrid {
                    name: name.clone(),
                    row: spec.row,
                    rows: self.grid.rows,
                });
            }
            if spec.frames > self.grid.columns {
                return Err(ProfileError::TooManyFrames {
                    name: name.clone(),
                    frames: spec.frames,
                    columns: self.grid.columns,
                });
            }
        }

        let required = |name: &'static str| -> Result<Sequence, ProfileError> {
            self.sequences
                .get(name)
                .map(|s| s.to_sequence())
                .ok_or(ProfileError::MissingSequence(name))
        };

        Ok(SequenceTable::new(
            required("flying")?,
            self.sequences.get("searching").map(|s| s.to_sequence()),
            self.sequences.get("approaching").map(|s| s.to_sequence()),
            required("perched")?,
            required("fleeing")?,
        ))
    }

    pub fn to_config(&self) -> BirdConfig {
        BirdConfig {
            base_speed: self.base_speed,
            size: self.size,
            repel_distance: self.repel_distance,
            ..BirdConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftlet_core::BirdState;

    #[test]
    fn test_defaults_validate() {
        FlockSettings::default().validate().expect("flock defaults");
        BirdSettings::default().validate().expect("bird defaults");
    }

    #[test]
    fn test_missing_required_sequence() {
        let mut settings = BirdSettings::default();
        settings.sequences.remove("perched");
        assert_eq!(
            settings.validate(),
            Err(ProfileError::MissingSequence("perched"))
        );
    }

    #[test]
    fn test_row_outside_grid_rejected() {
        let mut settings = BirdSettings::default();
        settings
            .sequences
            .insert("fleeing".to_string(), SequenceSpec {
                row: 9,
                frames: 4,
                fps: 10.0,
            });
        assert!(matches!(
            settings.validate(),
            Err(ProfileError::RowOutOfGrid { row: 9, .. })
        ));
    }

    #[test]
    fn test_zero_frames_rejected() {
        let mut settings = BirdSettings::default();
        settings
            .sequences
            .insert("flying".to_string(), SequenceSpec {
                row: 0,
                frames: 0,
                fps: 10.0,
            });
        assert!(matches!(
            settings.validate(),
            Err(ProfileError::EmptySequence { .. })
        ));
    }

    #[test]
    fn test_empty_selectors_rejected() {
        let mut settings = BirdSettings::default();
        settings.perch_selectors.clear();
        assert_eq!(settings.validate(), Err(ProfileError::NoSelectors));

        settings.perch_selectors.push("  ".to_string());
        assert_eq!(settings.validate(), Err(ProfileError::EmptySelector(0)));
    }

    #[test]
    fn test_optional_sequences_fall_back_to_flying() {
        let settings = BirdSettings::default();
        let table = settings.sequence_table().expect("table");
        assert_eq!(
            table.for_state(BirdState::Searching),
            table.for_state(BirdState::Flying)
        );
    }

    #[test]
    fn test_json_round_trip_with_partial_fields() {
        // Unspecified fields take defaults, the way an embedding page would
        // supply only what it overrides.
        let json = r#"{
            "size": 32.0,
            "perch_selectors": ["h1", ".card"]
        }"#;
        let settings: BirdSettings = serde_json::from_str(json).expect("parse");
        assert_eq!(settings.size, 32.0);
        assert_eq!(settings.perch_selectors.len(), 2);
        assert!(settings.sequences.contains_key("flying"));
        settings.validate().expect("valid");
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut settings = FlockSettings::default();
        settings.separation_weight = -1.6;
        assert_eq!(
            settings.validate(),
            Err(ProfileError::Negative("separation_weight"))
        );

        // Zero just disables the force.
        settings.separation_weight = 0.0;
        settings.validate().expect("zero weight");
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let mut settings = FlockSettings::default();
        settings.neighbor_radius = 0.0;
        assert_eq!(
            settings.validate(),
            Err(ProfileError::NonPositive("neighbor_radius"))
        );

        let mut settings = FlockSettings::default();
        settings.mouse_radius = -150.0;
        assert_eq!(
            settings.validate(),
            Err(ProfileError::NonPositive("mouse_radius"))
        );
    }

    #[test]
    fn test_trail_alpha_out_of_range_rejected() {
        let mut settings = FlockSettings::default();
        settings.trail_alpha = 1.2;
        assert!(matches!(
            settings.validate(),
            Err(ProfileError::OutOfRange {
                name: "trail_alpha",
                ..
            })
        ));

        // An opaque repaint (no trails) and a fully transparent one (trails
        // never fade) are both still drawable.
        settings.trail_alpha = 1.0;
        settings.validate().expect("opaque repaint");
        settings.trail_alpha = 0.0;
        settings.validate().expect("transparent repaint");
    }

    #[test]
    fn test_flock_settings_to_config() {
        let mut settings = FlockSettings::default();
        settings.separation_weight = 2.5;
        let config = settings.to_config();
        assert_eq!(config.separation_weight, 2.5);
        // Fields not exposed in settings keep the core defaults.
        assert_eq!(config.max_delta, FlockConfig::default().max_delta);
    }
}
