//! skinscan: command line companion to the skinscan web app.
//!
//! Bakes crops offline exactly as the app does before analysis, sends
//! images to a running classifier, checks its health, and keeps a
//! file-backed result history in the app's JSON format.
//!
//! # Usage
//!
//! ```text
//! skinscan bake photo.jpg -o spot.jpg --crop 120,80,400,400 --contrast 130
//! skinscan classify spot.jpg --save
//! skinscan history list
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod store;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use skinscan_client::{ClassifierClient, ClassifierConfig, ClientError, DEFAULT_API_URL};
use skinscan_core::geometry::initial_crop;
use skinscan_core::source::mime_from_filename;
use skinscan_core::types::{ENHANCEMENT_DEFAULT, ENHANCEMENT_MAX};
use skinscan_core::{
    BakeError, CropRect, Enhancement, HistoryRecord, HistoryStore, Size, SourceError,
    SourceImage, bake_with,
};
use tracing_subscriber::EnvFilter;

use crate::store::{FileHistoryStore, StoreError};

/// Bake, classify and keep a history of skin photos.
#[derive(Parser)]
#[command(name = "skinscan", version)]
struct Cli {
    /// Base URL of the classifier service.
    #[arg(long, global = true, env = "SKINSCAN_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// History file. Defaults to `skinscan/history.json` in the platform
    /// data directory.
    #[arg(long, global = true, value_name = "PATH")]
    history_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crop and enhance an image into a JPEG, as the app does before
    /// analysis.
    Bake {
        /// Input image path (PNG, JPEG, BMP, WebP).
        input: PathBuf,

        /// Output JPEG path.
        #[arg(short, long)]
        output: PathBuf,

        /// Crop rectangle in image pixels. Defaults to a centered square
        /// covering 60% of the shorter side.
        #[arg(long, value_name = "X,Y,W,H")]
        crop: Option<String>,

        /// Brightness in percent.
        #[arg(long, default_value_t = ENHANCEMENT_DEFAULT, value_parser = clap::value_parser!(u32).range(0..=i64::from(ENHANCEMENT_MAX)))]
        brightness: u32,

        /// Contrast in percent.
        #[arg(long, default_value_t = ENHANCEMENT_DEFAULT, value_parser = clap::value_parser!(u32).range(0..=i64::from(ENHANCEMENT_MAX)))]
        contrast: u32,
    },

    /// Send an image to the classifier and print the result.
    Classify {
        /// Image to classify.
        image: PathBuf,

        /// Save the result to the history.
        #[arg(long)]
        save: bool,
    },

    /// Check that the classifier is up and has its model loaded.
    Health,

    /// Show or clear saved results.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved results, newest first.
    List,
    /// Delete all saved results.
    Clear,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("error reading {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error writing {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}: not a supported image type")]
    UnknownType(PathBuf),

    #[error("--crop: {0}")]
    Crop(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Bake(#[from] BakeError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("classifier reports no model loaded (status {0})")]
    ModelNotLoaded(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no data directory; pass --history-file")]
    NoHistoryPath,

    #[error("failed to decode baked image: {0}")]
    Export(String),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Bake {
            ref input,
            ref output,
            ref crop,
            brightness,
            contrast,
        } => bake(
            input,
            output,
            crop.as_deref(),
            Enhancement::new(brightness, contrast),
        ),
        Command::Classify { ref image, save } => {
            let client = client(&cli.api_url)?;
            let source = read_source(image)?;
            let classification = client.predict(source.data_url()).await?;

            println!("{}", classification.label);
            println!("{}", classification.detail);
            println!("Confidence: {}", classification.confidence_label());
            if let Some(disclaimer) = &classification.disclaimer {
                println!("{disclaimer}");
            }

            if save {
                let mut store = history_store(cli.history_file.as_deref())?;
                let record = HistoryRecord::new(
                    source.data_url().to_owned(),
                    &classification,
                    chrono::Utc::now(),
                );
                store.append(record)?;
                eprintln!("Saved to {}", store.path().display());
            }
            Ok(())
        }
        Command::Health => {
            let health = client(&cli.api_url)?.health().await?;
            println!("status: {}", health.status);
            println!("model loaded: {}", health.model_loaded);
            if health.model_loaded {
                Ok(())
            } else {
                Err(CliError::ModelNotLoaded(health.status))
            }
        }
        Command::History { action } => {
            let mut store = history_store(cli.history_file.as_deref())?;
            match action {
                HistoryAction::List => {
                    let history = store.load();
                    if history.is_empty() {
                        eprintln!("No saved results.");
                    }
                    for (index, record) in history.records().iter().enumerate() {
                        println!(
                            "{index:>2}  {}  {:<12} {}%",
                            record.formatted_date(),
                            record.result,
                            record.confidence
                        );
                    }
                    Ok(())
                }
                HistoryAction::Clear => {
                    store.clear()?;
                    eprintln!("History cleared.");
                    Ok(())
                }
            }
        }
    }
}

fn bake(
    input: &Path,
    output: &Path,
    crop: Option<&str>,
    enhancement: Enhancement,
) -> Result<(), CliError> {
    let source = read_source(input)?;
    let dimensions = source.dimensions()?;
    // Lay the image out at its natural size, so crop units are pixels.
    let natural = Size::new(f64::from(dimensions.width), f64::from(dimensions.height));
    let crop = match crop {
        Some(spec) => parse_crop(spec).map_err(CliError::Crop)?,
        None => initial_crop(natural, natural),
    };
    tracing::info!(?crop, ?enhancement, "baking {}", input.display());

    let export = bake_with(&source, crop, natural, natural, enhancement)?;
    let bytes = export
        .jpeg_bytes()
        .map_err(|e| CliError::Export(e.to_string()))?;
    std::fs::write(output, bytes).map_err(|source| CliError::Write {
        path: output.to_owned(),
        source,
    })?;

    let size = export.dimensions();
    eprintln!(
        "Wrote {}x{} JPEG to {}",
        size.width,
        size.height,
        output.display()
    );
    Ok(())
}

fn read_source(path: &Path) -> Result<SourceImage, CliError> {
    let mime = mime_from_filename(&path.to_string_lossy())
        .ok_or_else(|| CliError::UnknownType(path.to_owned()))?;
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(SourceImage::from_file(&bytes, mime)?)
}

fn client(api_url: &str) -> Result<ClassifierClient, CliError> {
    let config = ClassifierConfig {
        base_url: api_url.to_owned(),
        ..ClassifierConfig::from_env()
    };
    Ok(ClassifierClient::new(config)?)
}

fn history_store(path: Option<&Path>) -> Result<FileHistoryStore, CliError> {
    path.map(Path::to_path_buf)
        .or_else(FileHistoryStore::default_path)
        .map(FileHistoryStore::new)
        .ok_or(CliError::NoHistoryPath)
}

/// Parse `X,Y,W,H` into a crop rectangle.
fn parse_crop(spec: &str) -> Result<CropRect, String> {
    let values = spec
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {e}", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [x, y, width, height] = values[..] else {
        return Err(format!("expected X,Y,W,H, got '{spec}'"));
    };
    if width <= 0.0 || height <= 0.0 {
        return Err(format!("width and height must be positive, got {width}x{height}"));
    }
    Ok(CropRect::new(x, y, width, height))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_crop_accepts_four_numbers() {
        let crop = parse_crop("10, 20,300.5,40").unwrap();
        assert_eq!(crop, CropRect::new(10.0, 20.0, 300.5, 40.0));
    }

    #[test]
    fn parse_crop_rejects_wrong_arity() {
        assert!(parse_crop("1,2,3").unwrap_err().contains("X,Y,W,H"));
        assert!(parse_crop("1,2,3,4,5").is_err());
    }

    #[test]
    fn parse_crop_rejects_garbage_and_empty_sizes() {
        assert!(parse_crop("a,2,3,4").unwrap_err().contains("invalid number"));
        assert!(parse_crop("0,0,0,10").is_err());
    }

    #[test]
    fn cli_parses_bake_defaults() {
        let cli = Cli::try_parse_from(["skinscan", "bake", "in.png", "-o", "out.jpg"]).unwrap();
        let Command::Bake {
            brightness,
            contrast,
            crop,
            ..
        } = cli.command
        else {
            unreachable!("parsed as bake");
        };
        assert_eq!((brightness, contrast), (100, 100));
        assert!(crop.is_none());
    }

    #[test]
    fn cli_rejects_out_of_range_enhancement() {
        assert!(
            Cli::try_parse_from([
                "skinscan", "bake", "in.png", "-o", "out.jpg", "--contrast", "201"
            ])
            .is_err()
        );
    }

    #[test]
    fn bake_writes_cropped_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.jpg");
        image_fixture(&input);

        bake(&input, &output, Some("10,10,40,20"), Enhancement::default()).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn bake_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, "hello").unwrap();
        let err = bake(&input, &dir.path().join("out.jpg"), None, Enhancement::default())
            .unwrap_err();
        assert!(matches!(err, CliError::UnknownType(_)));
    }

    /// A 100x60 grey PNG.
    fn image_fixture(path: &Path) {
        image::RgbImage::from_pixel(100, 60, image::Rgb([128, 128, 128]))
            .save(path)
            .unwrap();
    }
}
