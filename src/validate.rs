use std::{
    error::Error,
    fmt::{self, Display},
    fs, io,
    path::Path,
};

/// Faults in how the program was invoked. These are returned to the caller
/// instead of aborting, so `main` can print usage and exit non-zero.
#[derive(Debug, PartialEq, Eq)]
pub enum UsageError {
    WrongExtension { path: String, expected: String },
    InvalidMaxValue(i64),
    UnknownPolicy(String),
}

impl Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UsageError::WrongExtension { path, expected } => {
                write!(f, "File {path:?} does not have the .{expected} extension")
            }
            UsageError::InvalidMaxValue(max_value) => {
                write!(f, "Max value must be at least 1, got {max_value}")
            }
            UsageError::UnknownPolicy(policy) => {
                write!(f, "Unknown malformed token policy {policy:?}, expected stop or skip")
            }
        }
    }
}

impl Error for UsageError {}

/// Case-sensitive match of everything after the last `.` of the file name.
/// A name without a `.` never matches.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    let file_name = match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => name,
        None => return false,
    };
    match file_name.rsplit_once('.') {
        Some((_, suffix)) => suffix == extension,
        None => false,
    }
}

pub fn require_extension(path: &Path, extension: &str) -> Result<(), UsageError> {
    if has_extension(path, extension) {
        Ok(())
    } else {
        Err(UsageError::WrongExtension {
            path: path.display().to_string(),
            expected: extension.to_owned(),
        })
    }
}

/// Byte-level emptiness. Whitespace-only files are not empty.
pub fn is_file_empty(path: &Path) -> io::Result<bool> {
    Ok(fs::metadata(path)?.len() == 0)
}
