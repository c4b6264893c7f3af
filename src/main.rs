use std::io::stdout;
use std::process::ExitCode;

use log::{debug, error};

use uniquifier::cli::{
    apply_cli_overrides, get_config_file, get_location, get_log_file, get_matches, get_verbosity,
};
use uniquifier::prelude::*;

fn main() -> ExitCode {
    human_panic::setup_panic!();

    let matches = get_matches();

    let log_file = get_log_file(&matches);
    if let Err(e) = init_logger(get_verbosity(&matches), log_file.as_deref()) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    let target = match validate_target(get_location(&matches)) {
        Ok(target) => target,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut settings = match load_settings(get_config_file(&matches).map(|p| p.as_path())) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    apply_cli_overrides(&mut settings, &matches);
    debug!("Settings: {settings:?}");

    let scheduler = match Scheduler::new(settings) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let summary = match scheduler.run(&target, TerminalProgress::new) {
        Ok(summary) => summary,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = write_report(&mut stdout().lock(), &summary) {
        error!("Failed to print the run report: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
