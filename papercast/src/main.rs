use anyhow::{Context, Result};
use clap::Parser;
use papercast::{
    run_daily, stitch, ArxivSource, Cli, Command, ElevenLabsClient, FfmpegTranscoder, Settings,
    StitchSettings,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "papercast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            // Validate everything before any external call
            let settings = Settings::from_args(&cli.settings)?;
            info!(
                "Publishing to {} from {}",
                settings.base_url,
                settings.site.root().display()
            );

            let source = ArxivSource::new(settings.source.clone())?;
            let narrator = Arc::new(ElevenLabsClient::new(settings.narration.clone())?);

            let status = run_daily(&settings, &source, narrator)
                .await
                .context("Daily build failed")?;
            println!("Created {} episode(s).", status.created_count);
        }
        Command::SmokeTest => {
            let settings = StitchSettings::from_args(&cli.settings)?;
            let narrator = ElevenLabsClient::new(settings.narration.clone())?;
            let transcoder = FfmpegTranscoder::new();

            let output = stitch::stitch_lines(
                &settings.site,
                &stitch::SMOKE_TEST_LINES,
                &narrator,
                &settings.voices,
                &transcoder,
            )
            .await
            .context("Smoke test failed")?;
            println!("Smoke test built: {}", output.display());
        }
    }
    Ok(())
}
