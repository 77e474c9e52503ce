//! HoneyFarm telemetry CLI entry point.

use anyhow::Result;

fn main() -> Result<()> {
    if let Err(e) = honeyfarm_core::logging::init_logging() {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    honeyfarm_core::run(std::env::args().skip(1))
}
