//! Module implementing logging for the application.
//!
//! Log records are emitted through the `log` facade and handled by `slog`,
//! formatted for the terminal and filtered by the RUST_LOG directives.

use std::env;
use std::sync::Mutex;

use log::{self, SetLoggerError};
use slog::{Drain, FilterLevel, Logger};
use slog_envlogger::LogBuilder;
use slog_scope::{self, GlobalLoggerGuard};
use slog_stdlog;
use slog_term::{CompactFormat, TermDecorator};


/// Environment variable with additional logging directives.
const LOG_ENV_VAR: &str = "RUST_LOG";


/// Initialize logging with given verbosity.
///
/// The returned guard has to be kept alive for as long as logging is needed.
pub fn init(verbosity: isize) -> Result<GlobalLoggerGuard, SetLoggerError> {
    let level = filter_level(verbosity);

    let decorator = TermDecorator::new().stderr().build();
    let drain = Mutex::new(CompactFormat::new(decorator).build()).fuse();

    let mut builder = LogBuilder::new(drain).filter(None, level);
    if let Ok(directives) = env::var(LOG_ENV_VAR) {
        builder = builder.parse(&directives);
    }
    let logger = Logger::root(builder.build().fuse(), o!());

    let guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init_with_level(log_level(level))?;
    Ok(guard)
}


/// Logging level corresponding to given verbosity.
fn filter_level(verbosity: isize) -> FilterLevel {
    match verbosity {
        v if v < -1 => FilterLevel::Critical,
        -1 => FilterLevel::Error,
        0 => FilterLevel::Warning,
        1 => FilterLevel::Info,
        2 => FilterLevel::Debug,
        _ => FilterLevel::Trace,
    }
}

/// The most detailed `log` level that can pass given filter.
fn log_level(level: FilterLevel) -> log::Level {
    match level {
        FilterLevel::Off | FilterLevel::Critical | FilterLevel::Error => log::Level::Error,
        FilterLevel::Warning => log::Level::Warn,
        FilterLevel::Info => log::Level::Info,
        FilterLevel::Debug => log::Level::Debug,
        FilterLevel::Trace => log::Level::Trace,
    }
}


#[cfg(test)]
mod tests {
    use log;
    use slog::FilterLevel;
    use super::{filter_level, log_level};

    #[test]
    fn verbosity_levels() {
        assert_eq!(FilterLevel::Warning, filter_level(0));
        assert_eq!(FilterLevel::Error, filter_level(-1));
        assert_eq!(FilterLevel::Critical, filter_level(-5));
        assert_eq!(FilterLevel::Debug, filter_level(2));
        assert_eq!(FilterLevel::Trace, filter_level(10));
    }

    #[test]
    fn log_levels() {
        assert_eq!(log::Level::Warn, log_level(filter_level(0)));
        assert_eq!(log::Level::Error, log_level(filter_level(-3)));
    }
}
