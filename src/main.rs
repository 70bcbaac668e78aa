mod app;
mod cli;
mod config;
mod materialize;
mod paths;
mod prompt;
mod provider;

use anyhow::Context;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the per-file report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = cli::Args::parse();

    let config_path = paths::config_path();
    let cfg = match &config_path {
        Some(path) => config::Config::load_optional(path)?,
        None => None,
    };
    tracing::debug!(?config_path, found = cfg.is_some(), "resolved config");

    let settings = app::Settings::resolve(args, cfg.as_ref())?;
    tracing::debug!(
        model = %settings.model,
        provider = %settings.provider,
        root = %settings.root.display(),
        request_len = settings.request.len(),
        "resolved settings"
    );

    std::fs::create_dir_all(&settings.root)
        .with_context(|| format!("failed to create output directory: {}", settings.root.display()))?;

    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    let provider = app::build_provider(&http, &settings)?;
    let raw = app::generate(provider.as_ref(), &settings).await?;

    let mut out = std::io::stdout();
    app::materialize_and_report(&settings, &raw, &mut out)
}
