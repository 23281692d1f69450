pub mod args;
pub mod figure;
pub mod output;
pub mod plot;
pub mod result;
pub mod run_main;
pub mod settings;
pub mod table;

use tracing::metadata::LevelFilter;

/// fmt subscriber filtered by `RUST_LOG`, info by default
pub fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .unwrap_or_else(|e| {
            eprintln!("failed to init logger: {}", e);
        });
}
