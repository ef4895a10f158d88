//! Stderr logging. Stdout stays clean for JSON output.
//!
//! The engine logs through the `log` facade; the subscriber's `tracing-log` bridge picks
//! those records up. `RUST_LOG` directives are added on top of the `--log-level` default.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

pub fn init_with_level(level: LevelFilter) -> anyhow::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_an_error() {
        assert!(init_with_level(LevelFilter::WARN).is_ok());
        assert!(init_with_level(LevelFilter::DEBUG).is_err());
    }
}
