#![cfg_attr(windows, windows_subsystem = "windows")]

use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MUTE_IT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    use mute_it::app;
    use mute_it::config::AppConfig;

    init_tracing();

    let result = AppConfig::load()
        .map_err(anyhow::Error::from)
        .and_then(app::run);

    if let Err(e) = &result {
        tracing::error!("{e:#}");
        app::show_error(&format!("{e:#}"));
    }
    result
}

#[cfg(not(windows))]
fn main() -> anyhow::Result<()> {
    init_tracing();
    tracing::error!("mute-it only runs on Windows");
    anyhow::bail!("unsupported platform")
}
