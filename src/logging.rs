//! Logger setup for the binaries. The library itself only emits through the `log` facade.

use crate::util::GenericResult;
use flexi_logger::{Logger, LoggerHandle};

/// Start logging to stderr with a level spec such as `"info"` or
/// `"kou_steiner=debug"`. The `RUST_LOG` environment variable takes precedence.
///
/// The returned handle must be kept alive for as long as logging is wanted.
pub fn init(level: &str) -> GenericResult<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(level)?
        .log_to_stderr()
        .start()?;
    log::debug!("logging initialised at '{}'", level);
    Ok(handle)
}
