use anyhow::Context;
use clap::Parser;
use compost_diagnose::{app, camera, cli, client, config, export, interactive};
use cli::{Cli, Commands};
use client::{ApiClient, Endpoints};
use config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "compost_diagnose=debug" } else { "compost_diagnose=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().context("設定ファイルの読み込みに失敗")?;
    let endpoints = match &cli.url {
        Some(url) => Endpoints::new(url.clone()),
        None => Endpoints::new(config.effective_base_url()),
    };

    match cli.command {
        Commands::Screen { source, capture_dir } => {
            let capture_dir = capture_dir.unwrap_or_else(|| config.capture_dir());
            let camera = camera::FileCamera::open(&source, capture_dir);
            let api = ApiClient::new(&endpoints, config.timeout())?;

            println!("🌱 compost-diagnose - {}", endpoints.base_url());
            let mut app = app::App::new(camera, api, config.progress());
            interactive::run_screen(&mut app).await?;
        }

        Commands::Detect { image, save_crops, json } => {
            let api = ApiClient::new(&endpoints, config.timeout())?;
            let detection = api
                .detection
                .detect(&image)
                .await
                .with_context(|| format!("検出に失敗: {}", image.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&detection)?);
            } else {
                println!("Detected Objects ({})", detection.descriptions.len());
                for description in &detection.descriptions {
                    println!("  [ {} ]", description);
                }
                println!("cropped images: {}", detection.cropped_images.len());
            }

            if let Some(dir) = save_crops {
                let saved = export::save_cropped_images(&detection.cropped_images, &dir)?;
                println!("✔ {}枚の切り出し画像を保存: {}", saved.len(), dir.display());
            }
        }

        Commands::Suggest { labels } => {
            let api = ApiClient::new(&endpoints, config.timeout())?;
            let lines = api
                .suggestion
                .suggest(&labels)
                .await
                .context("提案の取得に失敗")?;
            for line in lines {
                println!("• {}", line);
            }
        }

        Commands::Config { set_url, show } => {
            let mut config = config;

            if let Some(url) = set_url {
                config.set_base_url(url)?;
                println!("✔ サーバーURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  サーバーURL: {}", config.base_url);
                println!("  実効URL: {}", config.effective_base_url());
                println!("  撮影保存先: {}", config.capture_dir().display());
                println!(
                    "  疑似プログレス: +{} / {}ms",
                    config.progress_step, config.progress_interval_ms
                );
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: なし"),
                }
            }
        }
    }

    Ok(())
}
