use eyre::Result;
use std::io::Write;

pub mod cmdline;
pub mod configure;
pub mod coordinate;
pub mod generate;
pub mod ingest;
pub mod logging;
pub mod report;
pub mod store;
pub mod validate;

use configure::Config;
use coordinate::{CancellationToken, Coordinator, SortOutcome};
use generate::RandomGenerator;
use ingest::FileIngestor;
use report::Reporter;

/// One full pass: validate the input name, collect from both producers,
/// sort and write the report to `out`.
pub fn run<W: Write>(
    config: &Config,
    cancel: CancellationToken,
    out: &mut W,
) -> Result<SortOutcome> {
    let ingestor = FileIngestor::new(&config.input, &config.extension, config.policy)?;
    let generator = RandomGenerator::from_entropy(config.generation);
    let reporter = Reporter::new(config.show_file_values);

    let mut coordinator = Coordinator::new(cancel);
    let outcome = coordinator.run(ingestor, generator, &reporter, out)?;
    Ok(outcome)
}
