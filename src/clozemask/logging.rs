//! Diagnostics.
//!
//! Library code logs through `tracing`: per-note chatter (why a note was
//! skipped, what got written, bulk counts) at `debug`, contained failures at
//! `warn`. What actually reaches the user is up to the subscriber, so hosts
//! map the add-on's `debug` switch onto their filter.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `clozemask=debug`.
pub const LOG_ENV: &str = "CLOZEMASK_LOG";

/// Filter directive used when `CLOZEMASK_LOG` is unset.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "clozemask=debug"
    } else {
        "warn"
    }
}

/// Installs a stderr subscriber for the reference host.
///
/// `CLOZEMASK_LOG` wins when set; otherwise `debug` turns on the crate's
/// debug events.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    // A subscriber may already be installed (tests, embedding hosts).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_switch_selects_crate_debug_level() {
        assert_eq!(default_directive(true), "clozemask=debug");
        assert_eq!(default_directive(false), "warn");
    }
}
