use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::flysight::detect;
use crate::prelude::RuleConfig;
use crate::records::FlySightVersion;

/// Editor-swap and notebook-checkpoint artifacts skipped during discovery.
const IGNORED_PARTS: [&str; 2] = [".swp", ".ipynb_checkpoints"];

/// Recursively enumerates scorable track files under `root`, keyed by path
/// in lexical order. Files failing the size gate or version detection are
/// skipped silently; discovery never aborts a walk over one bad file.
pub fn speed_jump_files_in(root: &Path, rules: &RuleConfig) -> BTreeMap<PathBuf, FlySightVersion> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let lossy = path.to_string_lossy();
        if IGNORED_PARTS.iter().any(|part| lossy.contains(part)) {
            continue;
        }
        let size = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
        if size < rules.min_jump_file_size {
            continue;
        }
        match detect::detect_version(path) {
            Ok(version) => {
                files.insert(path.to_path_buf(), version);
            }
            Err(err) => debug!("{}: skipped ({err})", path.display()),
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const V1_HEADER: &str =
        "time,lat,lon,hMSL,velN,velE,velD,hAcc,vAcc,sAcc,heading,cAcc,gpsFix,numSV\n";

    fn ungated_rules() -> RuleConfig {
        RuleConfig {
            min_jump_file_size: 0,
            ..RuleConfig::default()
        }
    }

    #[test]
    fn discovery_finds_tracks_and_skips_artifacts() {
        let lake = TempDir::new().unwrap();
        fs::write(lake.path().join("10-00-00.CSV"), V1_HEADER).unwrap();
        fs::create_dir(lake.path().join("23-06-10")).unwrap();
        fs::write(lake.path().join("23-06-10/TRACK.CSV"), "$FLYS,1\n").unwrap();
        fs::write(lake.path().join("23-06-10/EVENT.CSV"), "$FLYS,1\n").unwrap();
        fs::write(lake.path().join("notes.txt"), "not a track").unwrap();
        fs::write(lake.path().join(".10-00-00.CSV.swp"), V1_HEADER).unwrap();

        let files = speed_jump_files_in(lake.path(), &ungated_rules());
        assert_eq!(files.len(), 2);
        let versions: Vec<_> = files.values().copied().collect();
        assert!(versions.contains(&FlySightVersion::V1));
        assert!(versions.contains(&FlySightVersion::V2));
    }

    #[test]
    fn discovery_applies_size_gate() {
        let lake = TempDir::new().unwrap();
        fs::write(lake.path().join("10-00-00.CSV"), V1_HEADER).unwrap();

        let rules = RuleConfig::default();
        assert!(speed_jump_files_in(lake.path(), &rules).is_empty());
    }

    #[test]
    fn discovery_of_empty_lake_is_empty() {
        let lake = TempDir::new().unwrap();
        assert!(speed_jump_files_in(lake.path(), &ungated_rules()).is_empty());
    }
}
