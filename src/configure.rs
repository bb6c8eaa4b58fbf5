use clap::ArgMatches;
use eyre::{eyre, ErrReport};
use std::path::PathBuf;

use crate::{generate::GenerationParams, ingest::MalformedPolicy};

pub struct Config {
    pub input: PathBuf,
    pub extension: String,
    pub generation: GenerationParams,
    pub policy: MalformedPolicy,
    pub show_file_values: bool,
    pub verbosity: u8,
}

impl TryFrom<ArgMatches> for Config {
    type Error = ErrReport;
    fn try_from(mut matches: ArgMatches) -> Result<Self, Self::Error> {
        let show_file_values = matches.get_flag("show-file-values");
        let verbosity = matches.get_count("verbose");

        let input = matches
            .remove_one::<PathBuf>("input")
            .ok_or(eyre!("Missing input"))?;
        let extension = matches
            .remove_one::<String>("extension")
            .ok_or(eyre!("Missing extension"))?;
        let count = matches
            .remove_one::<usize>("count")
            .ok_or(eyre!("Missing count"))?;
        let max_value = matches
            .remove_one::<i64>("max-value")
            .ok_or(eyre!("Missing max-value"))?;
        let policy = matches
            .remove_one::<String>("on-malformed")
            .ok_or(eyre!("Missing on-malformed"))?
            .parse::<MalformedPolicy>()?;

        Ok(Self {
            input,
            extension,
            generation: GenerationParams::new(count, max_value)?,
            policy,
            show_file_values,
            verbosity,
        })
    }
}
