use serde::{Deserialize, Serialize};

/// Tuning for bundle finalization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Upper bound on bundle hash candidates tried before giving up.
    pub max_finalize_attempts: usize,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            max_finalize_attempts: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: BundleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BundleConfig::default());

        let config: BundleConfig =
            serde_json::from_str(r#"{"max_finalize_attempts": 5}"#).unwrap();
        assert_eq!(config.max_finalize_attempts, 5);
    }
}
