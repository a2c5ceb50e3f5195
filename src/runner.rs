// src/runner.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{
    config::options::RunOptions,
    data::ActivityRecord,
    error::ScrapeError,
    format::{self, Payload},
    specs::SourceKind,
};

/// What one run produced.
pub struct RunSummary {
    /// Every record extracted, before the limit.
    pub records: Vec<ActivityRecord>,
    pub payload: Payload,
    pub written: Option<PathBuf>,
}

/// Read the whole source file. A missing file is its own error so callers can
/// tell "nothing to read" apart from "read fine, zero records".
pub fn load_source(path: &Path) -> Result<String, ScrapeError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ScrapeError::MissingSource(path.to_path_buf()),
        _ => ScrapeError::ReadSource { path: path.to_path_buf(), source: e },
    })
}

/// Extract with `kind`, or whatever [`SourceKind::detect`] picks.
pub fn extract(source: &str, kind: Option<SourceKind>) -> Result<Vec<ActivityRecord>, ScrapeError> {
    let kind = kind.unwrap_or_else(|| SourceKind::detect(source));
    logd!("Extracting as {kind:?}");
    kind.extractor().extract(source)
}

pub fn to_pretty_json(payload: &Payload) -> Result<String, ScrapeError> {
    Ok(serde_json::to_string_pretty(payload)?)
}

/// Pretty JSON plus trailing newline; parent directories are created.
pub fn write_payload(path: &Path, payload: &Payload) -> Result<(), ScrapeError> {
    let json = to_pretty_json(payload)?;
    let io_err = |source| ScrapeError::WriteOutput { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    fs::write(path, json + "\n").map_err(io_err)
}

/// Load → extract → envelope → (optionally) write.
pub fn run(opts: &RunOptions) -> Result<RunSummary, ScrapeError> {
    let source = load_source(&opts.source)?;
    let records = extract(&source, opts.kind)?;
    logf!("{}: {} activities parsed", opts.source.display(), records.len());

    let payload = Payload::from(format::build_envelope(&records, opts.limit, &opts.user));

    let written = match &opts.out {
        Some(path) => {
            write_payload(path, &payload)?;
            logf!("Wrote {}", path.display());
            Some(path.clone())
        }
        None => None,
    };

    Ok(RunSummary { records, payload, written })
}
