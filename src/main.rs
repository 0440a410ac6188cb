//! Demo CLI: wires a config file to the facade and walks the viewer's
//! movement verbs against whatever the prefetcher currently has cached.
//!
//! Not part of the crate's core contract (`SPEC_FULL.md` §6 "CLI/env") —
//! a stand-in for the real viewer, useful for exercising the pipeline by
//! hand against a live URL.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use remote_image_prefetch::application::{CurrentImage, JumpDirection, RemoteImageList};
use remote_image_prefetch::infrastructure::StorageManager;

/// Command-line options for the demo binary.
#[derive(Debug, Parser)]
#[command(
    name = "remote-image-prefetch",
    version,
    about = "Demo CLI driving the remote-image prefetch pipeline",
    long_about = None
)]
struct Cli {
    /// Overrides the upstream URL from the loaded configuration.
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Configuration file path (defaults to the platform config directory).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// How many times to call `jump(NextFile)` after the first image.
    #[arg(long, default_value_t = 3)]
    steps: u32,

    /// Log verbosity, forwarded to `tracing_subscriber::EnvFilter` unless
    /// `RUST_LOG` is set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_level);

    info!(version = remote_image_prefetch::VERSION, "starting demo CLI");

    let storage = StorageManager::new()?;
    let mut config = storage.load_config(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.www_url = url;
    }

    let mut list = RemoteImageList::new(config);
    if !list.scan() {
        eprintln!("scan() failed; check the logs for the cause");
        std::process::exit(1);
    }

    report_current(&list);
    for _ in 0..cli.steps {
        std::thread::sleep(Duration::from_millis(50));
        if list.jump(JumpDirection::NextFile) {
            report_current(&list);
        } else {
            println!("no further image available yet");
        }
    }

    Ok(())
}

fn report_current(list: &RemoteImageList) {
    match list.current() {
        CurrentImage::Owned(image) => {
            let decoded = image.decoded();
            println!("current: {}x{}", decoded.width(), decoded.height());
        }
        CurrentImage::Placeholder(_) => println!("current: placeholder"),
        CurrentImage::None => println!("current: none"),
    }
}
