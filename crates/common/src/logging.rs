use error_stack::Report;
use log::LevelFilter;

use crate::error::BidGuardError;

fn format_line(level: log::Level, message: &std::fmt::Arguments<'_>) -> String {
    format!(
        "{}  {} {}",
        chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        level,
        message
    )
}

/// Route `log` records to stderr with a timestamped line format.
/// Should be called once at the start of main().
///
/// # Errors
///
/// Returns [`BidGuardError::Configuration`] if a logger is already installed.
pub fn init_logger(level: LevelFilter) -> Result<(), Report<BidGuardError>> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{}", format_line(record.level(), message)));
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .map_err(|err| {
            Report::new(BidGuardError::configuration(format!(
                "Failed to initialize logger: {err}"
            )))
        })
}
