//! Checks that an emitted icon is what the extension expects: square, of the
//! named size, RGB and fully opaque.

use crate::error::{LogoError, Result};
use crate::icon_writer::icon_file_name;
use image::{io::Reader as ImageReader, ColorType};
use std::{io, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconReport {
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
    /// No pixel has alpha below 255 (always true without an alpha channel)
    pub opaque: bool,
}

impl IconReport {
    /// True when the icon is a `size`x`size` opaque image without alpha.
    pub fn is_valid_icon(&self, size: u32) -> bool {
        self.width == size && self.height == size && !self.color.has_alpha() && self.opaque
    }
}

pub fn inspect_icon(path: &Path) -> Result<IconReport> {
    let reader = ImageReader::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LogoError::FileNotFound(path.to_path_buf()),
        _ => e.into(),
    })?;
    let img = reader.decode().map_err(|source| LogoError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let opaque = !img.color().has_alpha() || img.to_rgba8().pixels().all(|p| p[3] == 255);

    Ok(IconReport {
        width: img.width(),
        height: img.height(),
        color: img.color(),
        opaque,
    })
}

/// Parse a comma-separated size list such as `16,48,128`. Sizes must be
/// at least 1.
pub fn parse_sizes(list: &str) -> Result<Vec<u32>> {
    list.split(',')
        .map(|part| match part.trim().parse::<u32>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(LogoError::InvalidSizes(list.to_string())),
        })
        .collect()
}

/// Inspect `icon{size}.png` for each size inside `dir`.
pub fn inspect_icon_dir(dir: &Path, sizes: &[u32]) -> Vec<(u32, Result<IconReport>)> {
    sizes
        .iter()
        .map(|&size| (size, inspect_icon(&dir.join(icon_file_name(size)))))
        .collect()
}
