use chrono::Local;
use log::{LevelFilter, SetLoggerError};
use std::{io::Write, thread};

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// `RUST_LOG`, when set, overrides the level picked from `-v`.
pub fn init(verbosity: u8) -> Result<(), SetLoggerError> {
    env_logger::builder()
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                thread::current().name().unwrap_or("unnamed"),
                record.args()
            )
        })
        .try_init()
}
