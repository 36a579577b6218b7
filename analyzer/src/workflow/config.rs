use anyhow::Context;
use serde::{Deserialize, Serialize};
use speedcore::prelude::{DropZone, RuleConfig};
use std::fs;
use std::path::Path;

/// Analyzer configuration: the competition rule constants plus the drop-zone
/// elevation. Every field is optional in the YAML; missing rule values fall
/// back to the ISC defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub rules: RuleConfig,
    /// Drop-zone elevation MSL, meters. Mutually exclusive with `dz_ft`.
    pub dz_meters: f64,
    /// Drop-zone elevation MSL, feet. Mutually exclusive with `dz_meters`.
    pub dz_ft: f64,
}

impl AnalyzerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading analyzer config {}", path_ref.display()))?;
        let config: AnalyzerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing analyzer config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Command-line elevation flags override whatever the YAML carried, as a
    /// pair so a CLI override cannot silently conflict with a file value in
    /// the other unit.
    pub fn apply_cli(&mut self, dz_meters: f64, dz_ft: f64) {
        if dz_meters != 0.0 || dz_ft != 0.0 {
            self.dz_meters = dz_meters;
            self.dz_ft = dz_ft;
        }
    }

    pub fn drop_zone(&self) -> DropZone {
        DropZone {
            elevation_meters: self.dz_meters,
            elevation_ft: self.dz_ft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_carry_isc_rules() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.rules.breakoff_altitude, 1707.0);
        assert_eq!(config.dz_meters, 0.0);
        assert_eq!(config.dz_ft, 0.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"dz_meters: 187.0\nrules:\n  scoring_interval: 3.0\n")
            .unwrap();
        let path = temp.into_temp_path();
        let config = AnalyzerConfig::load(&path).unwrap();
        assert_eq!(config.dz_meters, 187.0);
        // unset rule fields keep their defaults
        assert_eq!(config.rules.performance_window_length, 2256.0);
    }

    #[test]
    fn cli_elevation_overrides_file_pair() {
        let mut config = AnalyzerConfig {
            dz_meters: 187.0,
            ..AnalyzerConfig::default()
        };
        config.apply_cli(0.0, 615.0);
        assert_eq!(config.dz_meters, 0.0);
        assert_eq!(config.dz_ft, 615.0);

        // no flags given leaves the file value alone
        let mut untouched = AnalyzerConfig {
            dz_meters: 187.0,
            ..AnalyzerConfig::default()
        };
        untouched.apply_cli(0.0, 0.0);
        assert_eq!(untouched.dz_meters, 187.0);
    }
}
