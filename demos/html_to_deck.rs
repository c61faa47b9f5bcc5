use std::{env, fs};

use anyhow::Context;
use html2slides::{convert, ConversionConfig, DeckBackend, HttpImageSource, PresentationBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to Info, allow RUST_LOG override
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // IMAGE_BASE_URL may come from a .env file
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --example html_to_deck -- <INPUT.html> [CONFIG.json] [OUTPUT.json]");
        eprintln!("Set IMAGE_BASE_URL to resolve relative image sources.");
        return Ok(());
    }
    let input_path = &args[1];
    let output_path = args.get(3).map(String::as_str).unwrap_or("deck.json");

    log::info!("Reading markup from {}", input_path);
    let html = fs::read_to_string(input_path)
        .with_context(|| format!("Unable to read input file: {}", input_path))?;

    let config = match args.get(2) {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Unable to read config file: {}", path))?;
            ConversionConfig::from_json(&json)?
        }
        None => ConversionConfig::default(),
    };

    let mut source = HttpImageSource::new(reqwest::Client::new());
    if let Ok(base_url) = env::var("IMAGE_BASE_URL") {
        log::info!("Resolving relative images against {}", base_url);
        source = source.with_base_url(base_url);
    }

    let mut backend = DeckBackend::new();
    let handle = match convert(&html, &config, &source, &mut backend).await {
        Ok(handle) => handle,
        Err(e) => {
            log::error!("Conversion failed at the {} stage: {}", e.stage(), e);
            return Err(e.into());
        }
    };

    if let Some(deck) = backend.deck(&handle) {
        log::info!("Converted into {} slide(s).", deck.slides.len());
    }

    let bytes = backend.save(&handle, Some(output_path))?;
    fs::write(output_path, bytes)
        .with_context(|| format!("Unable to write deck file: {}", output_path))?;
    log::info!("Deck saved to {}", output_path);

    Ok(())
}
