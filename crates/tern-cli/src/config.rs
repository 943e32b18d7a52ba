use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tern_bundle::BundleConfig;
use tern_crypto::SpongeKind;
use tern_signing::SecurityLevel;

/// Settings read from the `--config` TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Security level used when `--security` is not given.
    pub security: SecurityLevel,
    /// Sponge used by `tern hash` when `--sponge` is not given.
    pub sponge: SpongeKind,
    pub bundle: BundleConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            security: SecurityLevel::default(),
            sponge: SpongeKind::Curl81,
            bundle: BundleConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_path_gives_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.security, SecurityLevel::Medium);
        assert_eq!(config.bundle.max_finalize_attempts, 10_000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "security = 3\nsponge = \"kerl\"\n\n[bundle]\nmax_finalize_attempts = 50").unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.security, SecurityLevel::High);
        assert_eq!(config.sponge, SpongeKind::Kerl);
        assert_eq!(config.bundle.max_finalize_attempts, 50);
    }

    #[test]
    fn invalid_security_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "security = 4").unwrap();
        let err = CliConfig::load(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = CliConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn serializes_back_to_toml() {
        let text = toml::to_string(&CliConfig::default()).unwrap();
        let back: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, CliConfig::default());
    }
}
