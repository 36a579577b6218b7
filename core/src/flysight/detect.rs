use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::prelude::{AnalysisError, AnalysisResult};
use crate::records::FlySightVersion;

/// Column names a FlySight v1 header row must carry; a superset is fine.
pub const FLYSIGHT_1_HEADER: [&str; 14] = [
    "time", "lat", "lon", "hMSL", "velN", "velE", "velD", "hAcc", "vAcc", "sAcc", "heading",
    "cAcc", "gpsFix", "numSV",
];

/// Fixed column order of the headerless FlySight v2 track format. The
/// leading `GNSS` fix-source tag is dropped after parsing.
pub const FLYSIGHT_2_COLUMNS: [&str; 12] = [
    "GNSS", "time", "lat", "lon", "hMSL", "velN", "velE", "velD", "hAcc", "vAcc", "sAcc", "numSV",
];

/// Sentinel token opening every v2 track file.
pub const FLYSIGHT_2_SENTINEL: &str = "$FLYS";

/// Auxiliary device logs that carry no trajectory data.
const EXCLUDED_NAME_PARTS: [&str; 2] = ["EVENT", "SENSOR"];

/// Rejects file names that cannot be speed-skydive tracks: wrong suffix, or
/// one of the event/sensor auxiliary logs.
fn check_name(name: &str) -> AnalysisResult<()> {
    let upper = name.to_uppercase();
    if !upper.ends_with(".CSV") {
        return Err(AnalysisError::InvalidFormat(format!(
            "{name}: not a .CSV track file"
        )));
    }
    if EXCLUDED_NAME_PARTS.iter().any(|part| upper.contains(part)) {
        return Err(AnalysisError::InvalidFormat(format!(
            "{name}: event/sensor logs carry no trajectory data"
        )));
    }
    Ok(())
}

fn version_from_header(line: &str) -> Option<FlySightVersion> {
    if !line.contains(',') {
        return None;
    }
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.first() == Some(&FLYSIGHT_2_SENTINEL) {
        return Some(FlySightVersion::V2);
    }
    if FLYSIGHT_1_HEADER.iter().all(|name| fields.contains(name)) {
        return Some(FlySightVersion::V1);
    }
    None
}

/// Detects the FlySight format version of an on-disk track file. Read-only
/// probe on its own reader; the caller's streams are untouched.
pub fn detect_version(path: &Path) -> AnalysisResult<FlySightVersion> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    check_name(name)?;
    let file = File::open(path).map_err(|err| {
        AnalysisError::InvalidFormat(format!("{}: {err}", path.display()))
    })?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|err| AnalysisError::InvalidFormat(format!("{}: {err}", path.display())))?;
    version_from_header(line.trim_end()).ok_or_else(|| {
        AnalysisError::InvalidFormat(format!("{}: not a FlySight v1 or v2 track", path.display()))
    })
}

/// Buffer variant of `detect_version`; `name` stands in for the file name
/// in the admissibility checks and error reports.
pub fn detect_version_in_buffer(buffer: &[u8], name: &str) -> AnalysisResult<FlySightVersion> {
    check_name(name)?;
    let text = std::str::from_utf8(buffer)
        .map_err(|_| AnalysisError::InvalidFormat(format!("{name}: not valid UTF-8")))?;
    let first_line = text.lines().next().unwrap_or("");
    version_from_header(first_line)
        .ok_or_else(|| AnalysisError::InvalidFormat(format!("{name}: not a FlySight v1 or v2 track")))
}

/// Non-failing probe used by batch discovery.
pub fn has_valid_track_header(path: &Path) -> bool {
    detect_version(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const V1_HEADER: &str =
        "time,lat,lon,hMSL,velN,velE,velD,hAcc,vAcc,sAcc,heading,cAcc,gpsFix,numSV\n";

    fn temp_csv(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn detects_v1_header() {
        let file = temp_csv(V1_HEADER);
        assert_eq!(detect_version(file.path()).unwrap(), FlySightVersion::V1);
    }

    #[test]
    fn detects_v2_sentinel() {
        let file = temp_csv("$FLYS,1\n$VER,2023.05.01\n");
        assert_eq!(detect_version(file.path()).unwrap(), FlySightVersion::V2);
    }

    #[test]
    fn rejects_foreign_header() {
        let file = temp_csv("a,b,c\n1,2,3\n");
        assert!(matches!(
            detect_version(file.path()),
            Err(AnalysisError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_wrong_extension() {
        assert!(detect_version_in_buffer(V1_HEADER.as_bytes(), "track.gpx").is_err());
    }

    #[test]
    fn rejects_auxiliary_logs() {
        assert!(detect_version_in_buffer(b"$FLYS,1\n", "EVENT.CSV").is_err());
        assert!(detect_version_in_buffer(b"$FLYS,1\n", "SENSOR.CSV").is_err());
    }

    #[test]
    fn buffer_probe_matches_file_probe() {
        assert_eq!(
            detect_version_in_buffer(V1_HEADER.as_bytes(), "19-42-00.CSV").unwrap(),
            FlySightVersion::V1
        );
    }

    #[test]
    fn unreadable_first_line_is_invalid_format() {
        // invalid UTF-8 makes the line read fail rather than the open
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        file.write_all(&[0xFF, 0xFE, 0x00, 0x41]).unwrap();
        assert!(matches!(
            detect_version(file.path()),
            Err(AnalysisError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_non_delimited_content() {
        let file = temp_csv("just some prose\n");
        assert!(!has_valid_track_header(file.path()));
    }
}
