mod cli;

use anyhow::Result;
use clap::Parser;
use std::io::Write;

use cli::{Cli, Commands};
use shareparse::prelude::*;
use shareparse::Shareparse;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Commands::Download { output: Some(dir), .. } = &cli.command {
        config.download_dir = Some(dir.clone());
    }
    let session = Shareparse::new(&config)?;

    match cli.command {
        Commands::Parse { url } => {
            let info = resolve(&session, url).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Download { url, filename, .. } => {
            let info = resolve(&session, url).await?;
            let resource = info
                .video_url
                .clone()
                .or_else(|| info.music_url.clone())
                .or_else(|| info.images.first().map(|img| img.url.clone()));
            let Some(resource) = resource else {
                anyhow::bail!("nothing downloadable in the parse result");
            };

            let name = filename
                .unwrap_or_else(|| safe_filename(&info.title, &file_extension(&resource)));
            println!("downloading {name}");
            session
                .downloads
                .download_with_progress(&resource, &name, |pct| {
                    print!("\r{pct:>5.1}%");
                    let _ = std::io::stdout().flush();
                })
                .await?;
            println!("\nsaved to {}", config.download_dir().join(&name).display());
        }
        Commands::Themes => {
            for theme in session.themes.list_themes() {
                println!("{:<18} {:<10} {}", theme.name.as_str(), theme.label, theme.description);
            }
        }
    }

    Ok(())
}

/// Drive the parse store once and unwrap its outcome for CLI use.
async fn resolve(session: &Shareparse, url: String) -> Result<MediaInfo> {
    session.parser.set_input_url(url);
    session.parser.parse_url().await;

    let state = session.parser.state();
    match (state.result, state.error) {
        (Some(info), _) => Ok(info),
        (None, Some(err)) => anyhow::bail!("{err}"),
        (None, None) => anyhow::bail!("解析失败"),
    }
}
