use stderrlog::{LogLevelNum, Timestamp};

/// Logging setup arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[clap(short, long)]
    pub quiet: bool,

    /// Raise the log level by one step per use, e.g. `-v` turns info into debug.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Prefix log lines with a timestamp.
    #[clap(long)]
    pub ts: bool,
}

/// Raise `default` by the verbosity count.
fn log_level(
    verbose: u8,
    default: u8,
) -> LogLevelNum {
    match default.saturating_add(verbose) {
        0 => LogLevelNum::Off,
        1 => LogLevelNum::Error,
        2 => LogLevelNum::Warn,
        3 => LogLevelNum::Info,
        4 => LogLevelNum::Debug,
        _ => LogLevelNum::Trace,
    }
}

impl LogArgs {
    /// Initialize `stderrlog` for the `spellchipper` crates.
    pub fn setup_logging(
        &self,
        default: u8,
    ) -> Result<(), Box<dyn std::error::Error>> {
        stderrlog::new()
            .modules(["spellchipper", "spellchipper_cli"])
            .quiet(self.quiet)
            .verbosity(log_level(self.verbose, default))
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;

        Ok(())
    }
}
