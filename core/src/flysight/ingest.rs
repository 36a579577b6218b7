use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use log::debug;

use crate::flysight::detect::{self, FLYSIGHT_2_COLUMNS};
use crate::prelude::{AnalysisError, AnalysisResult, RuleConfig};
use crate::records::{FlySightVersion, RawRecord};

/// Reads a FlySight track file into raw records plus its human-readable
/// jump tag.
pub fn ingest_file(
    path: &Path,
    rules: &RuleConfig,
) -> AnalysisResult<(Vec<RawRecord>, String)> {
    let version = detect::detect_version(path)?;
    let content = fs::read_to_string(path)?;
    let records = parse_content(&content, version, rules)?;
    Ok((records, tag_for(path, version)))
}

/// Buffer variant of `ingest_file`; `name` is the originating file name
/// used for version checks and tagging.
pub fn ingest_buffer(
    buffer: &[u8],
    name: &str,
    rules: &RuleConfig,
) -> AnalysisResult<(Vec<RawRecord>, String)> {
    let version = detect::detect_version_in_buffer(buffer, name)?;
    let content = std::str::from_utf8(buffer)
        .map_err(|_| AnalysisError::MalformedLog(format!("{name}: not valid UTF-8")))?;
    let records = parse_content(content, version, rules)?;
    Ok((records, tag_for(Path::new(name), version)))
}

/// Human-readable jump tag: the sanitized file stem for v1 logs; the flight
/// directory name for v2 logs, since several device files share one
/// directory per flight. Batch processing uses the same scheme for files
/// that fail to ingest, so result keys stay stable either way.
pub fn tag_for(path: &Path, version: FlySightVersion) -> String {
    let label = match version {
        FlySightVersion::V1 => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("track")
            .replace(['/', '\\'], " ")
            .trim()
            .to_string(),
        FlySightVersion::V2 => path
            .parent()
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("track")
            .to_string(),
    };
    format!("{label}:{}", version.tag_suffix())
}

fn parse_content(
    content: &str,
    version: FlySightVersion,
    rules: &RuleConfig,
) -> AnalysisResult<Vec<RawRecord>> {
    let records = match version {
        FlySightVersion::V1 => parse_v1(content, rules),
        FlySightVersion::V2 => parse_v2(content, rules),
    }?;
    ensure_ascending_time(&records)?;
    Ok(records)
}

/// Everything downstream, segmentation and the scoring binary searches
/// included, relies on samples ascending by time; a log that breaks the
/// ordering is a device artifact and fails here.
fn ensure_ascending_time(records: &[RawRecord]) -> AnalysisResult<()> {
    for pair in records.windows(2) {
        if pair[1].time < pair[0].time {
            return Err(AnalysisError::MalformedLog(format!(
                "samples out of order at {}",
                pair[1].time
            )));
        }
    }
    Ok(())
}

/// v1: headered CSV whose first data row is a units sub-header.
fn parse_v1(content: &str, rules: &RuleConfig) -> AnalysisResult<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    let index = HeaderIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        if row == 0 {
            // units sub-header, e.g. "(s),(deg),(deg),(m),..."
            continue;
        }
        if records.len() >= rules.max_rows {
            return Err(AnalysisError::MalformedLog(format!(
                "row ceiling of {} exceeded",
                rules.max_rows
            )));
        }
        records.push(index.record_from(&record)?);
    }
    Ok(records)
}

/// v2: headerless CSV in the fixed column order, preceded by a variable
/// number of device metadata rows without a populated timestamp.
fn parse_v2(content: &str, rules: &RuleConfig) -> AnalysisResult<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut seen_fix = false;
    for result in reader.records() {
        let record = result?;
        if !seen_fix {
            let timestamp_present = record
                .get(1)
                .map(|raw| parse_time(raw.trim()).is_ok())
                .unwrap_or(false);
            if !timestamp_present {
                skipped += 1;
                if skipped > rules.metadata_lookahead {
                    return Err(AnalysisError::MalformedLog(format!(
                        "no valid timestamp row within the first {} rows",
                        rules.metadata_lookahead
                    )));
                }
                continue;
            }
            seen_fix = true;
        }
        if records.len() >= rules.max_rows {
            return Err(AnalysisError::MalformedLog(format!(
                "row ceiling of {} exceeded",
                rules.max_rows
            )));
        }
        records.push(v2_record_from(&record)?);
    }
    if !seen_fix {
        return Err(AnalysisError::MalformedLog(
            "no valid timestamp row found".into(),
        ));
    }
    debug!("v2 ingest: {skipped} metadata rows skipped, {} samples", records.len());
    Ok(records)
}

/// Positions of the required v1 columns, resolved from the header row.
struct HeaderIndex {
    time: usize,
    lat: usize,
    lon: usize,
    h_msl: usize,
    vel_n: usize,
    vel_e: usize,
    vel_d: usize,
    h_acc: usize,
    v_acc: usize,
    s_acc: usize,
    num_sv: usize,
}

impl HeaderIndex {
    fn from_headers(headers: &StringRecord) -> AnalysisResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| {
                    AnalysisError::MalformedLog(format!("missing required column {name}"))
                })
        };
        Ok(Self {
            time: find("time")?,
            lat: find("lat")?,
            lon: find("lon")?,
            h_msl: find("hMSL")?,
            vel_n: find("velN")?,
            vel_e: find("velE")?,
            vel_d: find("velD")?,
            h_acc: find("hAcc")?,
            v_acc: find("vAcc")?,
            s_acc: find("sAcc")?,
            num_sv: find("numSV")?,
        })
    }

    fn record_from(&self, record: &StringRecord) -> AnalysisResult<RawRecord> {
        Ok(RawRecord {
            time: parse_time(field(record, self.time)?)?,
            lat: parse_f64(field(record, self.lat)?)?,
            lon: parse_f64(field(record, self.lon)?)?,
            h_msl: parse_f64(field(record, self.h_msl)?)?,
            vel_n: parse_f64(field(record, self.vel_n)?)?,
            vel_e: parse_f64(field(record, self.vel_e)?)?,
            vel_d: parse_f64(field(record, self.vel_d)?)?,
            h_acc: parse_f64(field(record, self.h_acc)?)?,
            v_acc: parse_f64(field(record, self.v_acc)?)?,
            s_acc: parse_f64(field(record, self.s_acc)?)?,
            num_sv: parse_f64(field(record, self.num_sv)?)? as u32,
        })
    }
}

/// v2 rows carry the fixed column order; the GNSS fix-source tag in column
/// 0 is dropped because nothing downstream uses it.
fn v2_record_from(record: &StringRecord) -> AnalysisResult<RawRecord> {
    if record.len() < FLYSIGHT_2_COLUMNS.len() {
        return Err(AnalysisError::MalformedLog(format!(
            "expected {} columns, found {}",
            FLYSIGHT_2_COLUMNS.len(),
            record.len()
        )));
    }
    Ok(RawRecord {
        time: parse_time(field(record, 1)?)?,
        lat: parse_f64(field(record, 2)?)?,
        lon: parse_f64(field(record, 3)?)?,
        h_msl: parse_f64(field(record, 4)?)?,
        vel_n: parse_f64(field(record, 5)?)?,
        vel_e: parse_f64(field(record, 6)?)?,
        vel_d: parse_f64(field(record, 7)?)?,
        h_acc: parse_f64(field(record, 8)?)?,
        v_acc: parse_f64(field(record, 9)?)?,
        s_acc: parse_f64(field(record, 10)?)?,
        num_sv: parse_f64(field(record, 11)?)? as u32,
    })
}

fn field<'a>(record: &'a StringRecord, index: usize) -> AnalysisResult<&'a str> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| AnalysisError::MalformedLog(format!("row truncated at column {index}")))
}

fn parse_f64(raw: &str) -> AnalysisResult<f64> {
    raw.parse()
        .map_err(|_| AnalysisError::MalformedLog(format!("not a number: {raw:?}")))
}

fn parse_time(raw: &str) -> AnalysisResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|_| AnalysisError::MalformedLog(format!("not a timestamp: {raw:?}")))
}
