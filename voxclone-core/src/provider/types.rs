use serde::{Deserialize, Serialize};

/// Provider-side voice parameters, each within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    #[serde(default = "default_stability")]
    pub stability: f32,
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
        }
    }
}

fn default_stability() -> f32 {
    0.7
}

fn default_similarity_boost() -> f32 {
    0.8
}

impl VoiceSettings {
    pub fn new(stability: f32, similarity_boost: f32) -> Self {
        Self {
            stability,
            similarity_boost,
        }
    }

    /// Returns a description of the first out-of-range field, if any.
    pub fn out_of_range(&self) -> Option<String> {
        let check = |name: &str, value: f32| {
            (!(0.0..=1.0).contains(&value))
                .then(|| format!("{name} must be between 0 and 1, got {value}"))
        };
        check("stability", self.stability)
            .or_else(|| check("similarity_boost", self.similarity_boost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tune_endpoint() {
        let settings: VoiceSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, VoiceSettings::new(0.7, 0.8));
    }

    #[test]
    fn test_out_of_range() {
        assert!(VoiceSettings::new(0.0, 1.0).out_of_range().is_none());
        assert!(VoiceSettings::new(1.5, 0.5)
            .out_of_range()
            .unwrap()
            .contains("stability"));
        assert!(VoiceSettings::new(0.5, -0.1)
            .out_of_range()
            .unwrap()
            .contains("similarity_boost"));
        assert!(VoiceSettings::new(f32::NAN, 0.5).out_of_range().is_some());
    }
}
