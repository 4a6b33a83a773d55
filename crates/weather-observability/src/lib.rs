pub mod console;
pub mod rotating_file;

use rotating_file::SizeRotatingWriter;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const ROTATE_MAX_BYTES: u64 = 5 * 1024 * 1024;
const ROTATE_GENERATIONS: usize = 5;

/// Sets up the process-wide logging façade: a colorized console sink and
/// a rotating file sink, both at `level` unless overridden by
/// `RUST_LOG`. A dry run elevates the default level to DEBUG (§6.5).
pub fn init_logging(log_file: impl AsRef<Path>, debug: bool) -> anyhow::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(console::ColoredLevelFormatter)
        .with_ansi(true);

    let file_writer = SizeRotatingWriter::new(log_file, ROTATE_MAX_BYTES, ROTATE_GENERATIONS)?;
    let file_layer = tracing_subscriber::fmt::layer().with_writer(file_writer).with_ansi(false);

    tracing_subscriber::registry().with(env_filter).with(console_layer).with(file_layer).init();

    Ok(())
}
