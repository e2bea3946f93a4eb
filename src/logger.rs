// Copyright (c) 2026 rezky_nightky

//! Prefixed stderr logging.
//!
//! The rain owns the alternate screen while it runs, so messages are only
//! emitted before the terminal session starts and after it ends.
//!
//! ```ignore
//! log!("rain"; "spawned {} waves", n);
//! debug!("config"; "fall every {:?}", period);
//! ```

use std::io::{stderr, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn color_enabled_stderr() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    stderr().is_terminal()
}

pub fn log(module: &str, message: &str) {
    let prefix = format_prefix(module, color_enabled_stderr());
    let mut err = stderr().lock();
    writeln!(err, "{prefix} {message}").ok();
    err.flush().ok();
}

fn format_prefix(module: &str, color: bool) -> String {
    let prefix = format!("[{module}]");
    if !color {
        return prefix;
    }
    let code = match module.to_ascii_lowercase().as_str() {
        "error" => "1;31",
        "warn" => "1;33",
        "rain" => "1;32",
        _ => "1;36",
    };
    format!("\x1b[{code}m{prefix}\x1b[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prefix_has_no_escapes() {
        assert_eq!(format_prefix("rain", false), "[rain]");
    }

    #[test]
    fn colored_prefix_picks_code_by_module() {
        assert_eq!(format_prefix("error", true), "\x1b[1;31m[error]\x1b[0m");
        assert_eq!(format_prefix("Config", true), "\x1b[1;36m[Config]\x1b[0m");
    }
}
