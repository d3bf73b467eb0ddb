//! Logger bootstrap shared by the binary and tests.
//!
//! Verbosity only picks the default level; any `RUST_LOG` value in the
//! environment wins, so per-module filters such as
//! `RUST_LOG=ledge::level=debug` keep working regardless of the flag.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// `verbose` lowers the default filter from info to debug.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(default_level.to_string());

    // Repeat initialisation (tests share one process) is not worth
    // surfacing; the first configuration stays in effect.
    Builder::from_env(env).try_init().ok();
}
