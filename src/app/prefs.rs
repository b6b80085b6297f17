use serde::{Deserialize, Serialize};

use crate::project::SemanticType;

use super::store::{MAX_CONNECTION_DEPTH, MIN_CONNECTION_DEPTH};

pub const PREFS_STORAGE_KEY: &str = "code-visual-prefs";

pub const MIN_MOTION_SPEED: f32 = 0.4;
pub const MAX_MOTION_SPEED: f32 = 3.0;
pub const DEFAULT_MOTION_SPEED: f32 = 1.6;
pub const DEFAULT_CONNECTION_DEPTH: u32 = 3;

/// User preferences that survive restarts. Anything unreadable falls back to
/// defaults; a corrupt blob never blocks startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Preferences {
    pub motion_speed_factor: f32,
    pub connection_depth: u32,
    pub hidden_types: Vec<SemanticType>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            motion_speed_factor: DEFAULT_MOTION_SPEED,
            connection_depth: DEFAULT_CONNECTION_DEPTH,
            hidden_types: Vec::new(),
        }
    }
}

impl Preferences {
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let Some(raw) = storage.and_then(|storage| storage.get_string(PREFS_STORAGE_KEY)) else {
            return Self::default();
        };
        serde_json::from_str::<Preferences>(&raw)
            .map(Preferences::sanitized)
            .unwrap_or_default()
    }

    pub fn store(&self, storage: &mut dyn eframe::Storage) {
        if let Ok(raw) = serde_json::to_string(self) {
            storage.set_string(PREFS_STORAGE_KEY, raw);
        }
    }

    fn sanitized(mut self) -> Self {
        if !self.motion_speed_factor.is_finite() {
            self.motion_speed_factor = DEFAULT_MOTION_SPEED;
        }
        self.motion_speed_factor = self
            .motion_speed_factor
            .clamp(MIN_MOTION_SPEED, MAX_MOTION_SPEED);
        self.connection_depth = self
            .connection_depth
            .clamp(MIN_CONNECTION_DEPTH, MAX_CONNECTION_DEPTH);
        self.hidden_types.sort_by_key(|semantic_type| semantic_type.label());
        self.hidden_types.dedup();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let prefs = Preferences::default();
        assert_eq!(prefs.motion_speed_factor, DEFAULT_MOTION_SPEED);
        assert_eq!(prefs.connection_depth, DEFAULT_CONNECTION_DEPTH);
        assert!(prefs.hidden_types.is_empty());
    }

    #[test]
    fn round_trips_through_json() {
        let prefs = Preferences {
            motion_speed_factor: 2.2,
            connection_depth: 5,
            hidden_types: vec![SemanticType::Import, SemanticType::Variable],
        };
        let raw = serde_json::to_string(&prefs).unwrap();
        let back: Preferences = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.motion_speed_factor, 2.2);
        assert_eq!(back.connection_depth, 5);
        assert_eq!(back.hidden_types, prefs.hidden_types);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let prefs = Preferences {
            motion_speed_factor: 40.0,
            connection_depth: 99,
            hidden_types: Vec::new(),
        }
        .sanitized();
        assert_eq!(prefs.motion_speed_factor, MAX_MOTION_SPEED);
        assert_eq!(prefs.connection_depth, MAX_CONNECTION_DEPTH);

        let prefs = Preferences {
            motion_speed_factor: f32::NAN,
            connection_depth: 0,
            hidden_types: Vec::new(),
        }
        .sanitized();
        assert_eq!(prefs.motion_speed_factor, DEFAULT_MOTION_SPEED);
        assert_eq!(prefs.connection_depth, MIN_CONNECTION_DEPTH);
    }

    #[test]
    fn sanitize_drops_repeated_hidden_types_anywhere_in_the_list() {
        let prefs = Preferences {
            motion_speed_factor: 1.0,
            connection_depth: 3,
            hidden_types: vec![
                SemanticType::Import,
                SemanticType::Variable,
                SemanticType::Import,
            ],
        }
        .sanitized();
        assert_eq!(
            prefs.hidden_types,
            vec![SemanticType::Import, SemanticType::Variable]
        );
    }

    #[test]
    fn garbage_blob_falls_back_to_defaults() {
        let parsed = serde_json::from_str::<Preferences>("{not json").ok();
        assert!(parsed.is_none());
    }
}
