//! Shared sink for every logo operation: encode each requested size as a PNG
//! and write `icon{size}.png` files into the output directory.

use crate::error::{LogoError, Result};
use crate::manifest_json;
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, RgbImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Icon sizes a browser extension asks for.
pub const DEFAULT_SIZES: [u32; 3] = [16, 48, 128];

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "icons";

/// Where and what to write.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub out_dir: PathBuf,
    pub sizes: Vec<u32>,
    /// Also write `icons.json` next to the PNG files.
    pub manifest: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sizes: DEFAULT_SIZES.to_vec(),
            manifest: false,
        }
    }
}

impl OutputOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_sizes(mut self, sizes: Vec<u32>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_manifest(mut self, manifest: bool) -> Self {
        self.manifest = manifest;
        self
    }
}

/// A rendered icon, already PNG-encoded and waiting to hit the disk.
#[derive(Debug, Clone)]
pub struct EncodedIcon {
    pub size: u32,
    pub png: Vec<u8>,
}

pub fn icon_file_name(size: u32) -> String {
    format!("icon{size}.png")
}

/// Render and encode every size before touching the filesystem, so a failure
/// in any size leaves the output directory untouched.
pub fn render_icons<F>(sizes: &[u32], mut render: F) -> Result<Vec<EncodedIcon>>
where
    F: FnMut(u32) -> Result<RgbImage>,
{
    let mut icons = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let image = render(size)?;
        debug_assert_eq!(image.dimensions(), (size, size));
        let png = encode_png(&image)?;
        log::debug!("encoded {} ({} bytes)", icon_file_name(size), png.len());
        icons.push(EncodedIcon { size, png });
    }
    Ok(icons)
}

/// Encode an RGB image as PNG with the strongest compression.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilterType::Adaptive);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ColorType::Rgb8,
        )
        .map_err(LogoError::Encode)?;
    Ok(buf)
}

/// Write the encoded icons (and the manifest when requested).
/// Returns the paths of the PNG files in the order they were written.
pub fn write_icons(icons: &[EncodedIcon], options: &OutputOptions) -> Result<Vec<PathBuf>> {
    create_dir_all(&options.out_dir)?;

    let mut written = Vec::with_capacity(icons.len());
    for icon in icons {
        let filename = icon_file_name(icon.size);
        let path = options.out_dir.join(&filename);
        write_file(&path, &icon.png)?;
        println!("  ✓ Generated {filename} ({0}x{0})", icon.size);
        written.push(path);
    }

    if options.manifest {
        let sizes: Vec<u32> = icons.iter().map(|icon| icon.size).collect();
        manifest_json::write_manifest(&options.out_dir, &sizes)?;
    }

    Ok(written)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut out_file = BufWriter::new(File::create(path)?);
    out_file.write_all(bytes)?;
    out_file.flush()?;
    Ok(())
}
