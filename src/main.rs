use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use extension_logo::{
    crop::{self, ClampPolicy, CropParams},
    icon_writer::{OutputOptions, DEFAULT_SIZES},
    logo::{self, Palette},
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "logo-gen",
    about = "Generate browser extension logo icons (16, 48 and 128 px PNG)"
)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Output directory.
    #[clap(short, long, global = true, value_name = "DIR", default_value = "icons")]
    output: PathBuf,

    /// Icon sizes to generate, written as icon{size}.png.
    #[clap(
        short,
        long,
        global = true,
        value_delimiter = ',',
        value_name = "SIZES",
        default_values_t = DEFAULT_SIZES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    sizes: Vec<u32>,

    /// Also write icons.json with the manifest "icons" entries.
    #[clap(long, global = true)]
    manifest: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Synthesize the built-in QR-style logo.
    Generate {
        /// Color of the inner square of each position marker (CSS color format)
        #[clap(long, default_value = "#0a58ca")]
        accent: String,

        /// Background behind the rounded corners (CSS color format)
        #[clap(long, default_value = "#ffffff")]
        matte: String,
    },

    /// Crop a source image by size and offset percentages, then resize.
    #[clap(allow_negative_numbers = true)]
    Process {
        /// Path to the source image.
        #[clap(value_name = "IMAGE")]
        image: PathBuf,

        /// Crop size as a percentage of the shorter side (suggested 50-150).
        #[clap(value_name = "CROP_PERCENT", default_value_t = 100.0)]
        crop_percent: f64,

        /// Horizontal offset as a percentage of the width (suggested -50..50).
        #[clap(value_name = "X_OFFSET", default_value_t = 0.0)]
        x_offset: f64,

        /// Vertical offset as a percentage of the height (suggested -50..50).
        #[clap(value_name = "Y_OFFSET", default_value_t = 0.0)]
        y_offset: f64,

        /// Shift the crop box back inside the image instead of clamping each edge.
        #[clap(long)]
        keep_square: bool,
    },

    /// Center-crop a source image to a square, then resize.
    Update {
        /// Path to the source image.
        #[clap(value_name = "IMAGE")]
        image: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let options = OutputOptions::new(args.output)
        .with_sizes(args.sizes)
        .with_manifest(args.manifest);

    let written = match args.command {
        Command::Generate { accent, matte } => {
            let palette = Palette::default()
                .with_overrides(Some(accent.as_str()), Some(matte.as_str()))
                .context("Invalid palette")?;
            logo::generate_icons(&palette, &options).context("Failed to generate logo")?
        }
        Command::Process {
            image,
            crop_percent,
            x_offset,
            y_offset,
            keep_square,
        } => {
            let params = CropParams::new(crop_percent, x_offset, y_offset);
            let policy = if keep_square {
                ClampPolicy::KeepSquare
            } else {
                ClampPolicy::Inherited
            };
            crop::process_logo(&image, &params, policy, &options)
                .context("Failed to process logo")?
        }
        Command::Update { image } => {
            crop::update_logo(&image, &options).context("Failed to update logo")?
        }
    };

    println!(
        "✓ Generated {} icons in {}",
        written.len(),
        options.out_dir.display()
    );
    Ok(())
}
