//! Logging setup.
//!
//! All output goes through the `log` facade. [`Verbosity`] is the single switch deciding how much
//! of it is shown, and is handed to the [`FetchQueue`](crate::FetchQueue) so it can hide its
//! progress bars as well.
use log::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// No log lines and no progress bars.
    Quiet,
    #[default]
    Normal,
    /// Adds debug detail such as every query URL.
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Off,
            Self::Normal => LevelFilter::Info,
            Self::Verbose => LevelFilter::Debug,
        }
    }

    /// Installs `env_logger` as the global logger. `RUST_LOG` can still refine the filter unless
    /// the run is quiet.
    pub fn init_logger(self) {
        let mut builder = env_logger::builder();
        builder
            .format_timestamp(None)
            .format_target(false)
            .filter_level(self.level_filter());

        if self != Self::Quiet {
            builder.parse_default_env();
        }

        // A logger may already be installed when used as a library.
        let _ = builder.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::Verbosity;
    use log::LevelFilter;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn level_filters() {
        assert_eq!(Verbosity::Quiet.level_filter(), LevelFilter::Off);
        assert_eq!(Verbosity::Normal.level_filter(), LevelFilter::Info);
        assert_eq!(Verbosity::Verbose.level_filter(), LevelFilter::Debug);
    }
}
