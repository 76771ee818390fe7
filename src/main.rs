//! `pixel-tensor` CLI - Inspect observation tensors built from image files.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ndarray::Axis;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixel_tensor::image::save_tensor_image;
use pixel_tensor::tensor::ObservationTensor;
use pixel_tensor::{prefix_sum, ConvertConfig};

/// Convert images into normalized NHWC observation tensors.
#[derive(Parser, Debug)]
#[command(name = "pixel-tensor")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a batch of images and report tensor statistics.
    Convert {
        /// Input image paths, one per batch entry.
        #[arg(value_name = "IMAGES", required = true)]
        images: Vec<PathBuf>,

        /// Average the color channels into a single channel.
        #[arg(short, long)]
        grayscale: bool,

        /// Resize every image to this width.
        #[arg(long, value_name = "INT", requires = "height")]
        width: Option<u32>,

        /// Resize every image to this height.
        #[arg(long, value_name = "INT", requires = "width")]
        height: Option<u32>,

        /// Write batch entry 0 back out as an image.
        #[arg(long, value_name = "PATH")]
        preview: Option<PathBuf>,
    },

    /// Print the offsets of consecutive segments with the given sizes.
    Offsets {
        /// Segment sizes.
        #[arg(value_name = "SIZES", allow_negative_numbers = true)]
        sizes: Vec<i32>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pixel_tensor={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(args.command) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Convert {
            images,
            grayscale,
            width,
            height,
            preview,
        } => {
            let config = ConvertConfig {
                grayscale,
                resize: width.zip(height),
            };

            let tensor = config
                .load_and_convert(&images)
                .context("Failed to convert images")?;

            tracing::info!("Tensor shape (batch, height, width, channels): {:?}", tensor.shape());
            report_channels(&tensor);

            if let Some(path) = preview {
                save_tensor_image(&tensor, 0, &path)
                    .with_context(|| format!("Failed to write preview {}", path.display()))?;
                println!("Preview written to {}", path.display());
            }
        }
        Command::Offsets { sizes } => {
            let offsets = prefix_sum(&sizes);
            let line = offsets
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!("{line}");
        }
    }

    Ok(())
}

/// Print min/mean/max of every channel.
fn report_channels(tensor: &ObservationTensor) {
    for (channel, values) in tensor.axis_iter(Axis(3)).enumerate() {
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = values.mean().unwrap_or(0.0);
        println!("channel {channel}: min {min:.4} mean {mean:.4} max {max:.4}");
    }
}
