//! Logging setup for the nodeup CLI.
//!
//! All diagnostics go to stderr through the `log` facade so stdout stays
//! clean for the wrapped command's output. The `NODEUP_DEBUG` environment
//! variable switches the level from warnings to full debug tracing of
//! resolution and download steps.

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// Initializes the terminal logger.
///
/// Call once at process entry, before any command runs. Initialization
/// failure is ignored; logging is best-effort and must never prevent the
/// tool from running.
pub fn init(debug_enabled: bool) {
    let level = if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// Reads the debug toggle from the environment.
///
/// Any non-empty value other than `0` and `false` enables debug logging.
#[must_use]
pub fn debug_enabled_from_env() -> bool {
    match std::env::var(crate::config::DEBUG_ENV) {
        Ok(value) => !value.is_empty() && value != "0" && value != "false",
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEBUG_ENV;

    #[test]
    #[serial_test::serial]
    fn debug_toggle_reads_env_values() {
        std::env::remove_var(DEBUG_ENV);
        assert!(!debug_enabled_from_env());

        std::env::set_var(DEBUG_ENV, "1");
        assert!(debug_enabled_from_env());

        std::env::set_var(DEBUG_ENV, "true");
        assert!(debug_enabled_from_env());

        std::env::set_var(DEBUG_ENV, "0");
        assert!(!debug_enabled_from_env());

        std::env::set_var(DEBUG_ENV, "false");
        assert!(!debug_enabled_from_env());

        std::env::remove_var(DEBUG_ENV);
    }
}
