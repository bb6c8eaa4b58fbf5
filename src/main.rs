use eyre::{Result, WrapErr};
use std::io;

use sorter::cmdline;
use sorter::configure::Config;
use sorter::coordinate::CancellationToken;
use sorter::logging;
use sorter::validate::UsageError;

fn register_sighandler(cancel: CancellationToken) -> Result<()> {
    ctrlc::set_handler(move || cancel.cancel()).wrap_err("Error setting Ctrl-C handler")
}

fn main() -> Result<()> {
    let mut command = cmdline::register_args();
    let help = command.render_help();
    let config = match Config::try_from(command.get_matches()) {
        Err(e) => {
            eprintln!("{help}");
            return Err(e);
        }
        Ok(config) => config,
    };

    logging::init(config.verbosity).wrap_err("Failed to initialise logging")?;

    let cancel = CancellationToken::new();
    register_sighandler(cancel.clone())?;

    let stdout = io::stdout();
    if let Err(e) = sorter::run(&config, cancel, &mut stdout.lock()) {
        if e.downcast_ref::<UsageError>().is_some() {
            eprintln!("{help}");
        }
        return Err(e);
    }

    Ok(())
}
