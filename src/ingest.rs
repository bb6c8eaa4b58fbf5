use log::{debug, info, warn};
use std::{
    fs::File,
    io::{prelude::*, BufReader},
    path::{Path, PathBuf},
    str::{self, FromStr},
};

use crate::{
    coordinate::CancellationToken,
    store::{SharedNumberStore, StoreError},
    validate::{self, UsageError},
};

/// What to do with a token that does not parse as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Keep what was read so far, report the token and stop.
    #[default]
    Stop,
    /// Report the token and keep going.
    Skip,
}

impl FromStr for MalformedPolicy {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stop" => Ok(MalformedPolicy::Stop),
            "skip" => Ok(MalformedPolicy::Skip),
            other => Err(UsageError::UnknownPolicy(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedToken {
    /// 1-based index among all whitespace separated tokens.
    pub position: usize,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Missing,
    Empty,
    NoTokens,
    Read,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub source: SourceState,
    /// File-derived values in file order, kept for the audit report.
    pub values: Vec<i64>,
    pub malformed: Vec<MalformedToken>,
}

impl IngestReport {
    fn new(source: SourceState) -> Self {
        Self {
            source,
            values: Vec::new(),
            malformed: Vec::new(),
        }
    }
}

pub struct FileIngestor {
    path: PathBuf,
    policy: MalformedPolicy,
}

impl FileIngestor {
    /// Fails without touching the file when the name lacks `extension`.
    pub fn new(
        path: impl Into<PathBuf>,
        extension: &str,
        policy: MalformedPolicy,
    ) -> Result<Self, UsageError> {
        let path = path.into();
        validate::require_extension(&path, extension)?;
        info!(
            "Provided file {} is a .{} file, proceeding with the number reading",
            path.display(),
            extension
        );
        Ok(Self { path, policy })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// An unreadable or empty file is not an error: the ingestor contributes
    /// nothing and the run goes on with the generated numbers only.
    pub fn run(
        &self,
        store: &SharedNumberStore,
        cancel: &CancellationToken,
    ) -> Result<IngestReport, StoreError> {
        match validate::is_file_empty(&self.path) {
            Err(e) => {
                info!(
                    "Could not read {}: {}. Only generated numbers will be sorted",
                    self.path.display(),
                    e
                );
                return Ok(IngestReport::new(SourceState::Missing));
            }
            Ok(true) => {
                info!(
                    "File {} is empty. Only generated numbers will be sorted",
                    self.path.display()
                );
                return Ok(IngestReport::new(SourceState::Empty));
            }
            Ok(false) => {}
        }

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                info!("Could not open {}: {}", self.path.display(), e);
                return Ok(IngestReport::new(SourceState::Missing));
            }
        };
        debug!("Opened {}", self.path.display());
        self.ingest(BufReader::new(file), store, cancel)
    }

    pub fn ingest<R: BufRead>(
        &self,
        reader: R,
        store: &SharedNumberStore,
        cancel: &CancellationToken,
    ) -> Result<IngestReport, StoreError> {
        let mut report = IngestReport::new(SourceState::NoTokens);
        let mut position = 0;

        'lines: for line in reader.split(b'\n') {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Stopped reading {}: {}", self.path.display(), e);
                    break;
                }
            };

            for raw in line
                .split(u8::is_ascii_whitespace)
                .filter(|raw| !raw.is_empty())
            {
                if cancel.is_cancelled() {
                    debug!("Ingestion of {} cancelled", self.path.display());
                    break 'lines;
                }
                position += 1;

                // Invalid UTF-8 is just another malformed token.
                let parsed = str::from_utf8(raw)
                    .ok()
                    .and_then(|token| token.parse::<i64>().ok());
                match parsed {
                    Some(value) => {
                        store.append(value)?;
                        debug!("Read number {} from {}", value, self.path.display());
                        report.values.push(value);
                    }
                    None => {
                        let token = String::from_utf8_lossy(raw).into_owned();
                        match self.policy {
                            MalformedPolicy::Stop => {
                                warn!(
                                    "Malformed token {:?} at position {} in {}, ignoring the rest of the file",
                                    token,
                                    position,
                                    self.path.display()
                                );
                                report.malformed.push(MalformedToken { position, token });
                                break 'lines;
                            }
                            MalformedPolicy::Skip => {
                                warn!(
                                    "Skipping malformed token {:?} at position {} in {}",
                                    token,
                                    position,
                                    self.path.display()
                                );
                                report.malformed.push(MalformedToken { position, token });
                            }
                        }
                    }
                }
            }
        }

        if position > 0 {
            report.source = SourceState::Read;
        }
        if report.values.is_empty() {
            info!("File {} contains no parseable tokens", self.path.display());
        } else {
            info!(
                "Read {} numbers from {}",
                report.values.len(),
                self.path.display()
            );
        }
        Ok(report)
    }
}
