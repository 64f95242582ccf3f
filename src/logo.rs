//! Synthetic logo: a QR-code-like badge drawn from rectangles on a vertical
//! gradient, with rounded corners flattened onto an opaque matte.

use crate::error::{LogoError, Result};
use crate::icon_writer::{render_icons, write_icons, OutputOptions};
use image::{GrayImage, Luma, Rgb, RgbImage};
use std::{path::PathBuf, str::FromStr};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Cells per side of the decorative module grid.
pub const MODULES: u32 = 7;

/// (column, row) of every data module in the 7x7 grid.
pub const DATA_PATTERN: [(u32, u32); 16] = [
    (3, 0),
    (4, 0),
    (5, 0),
    (0, 3),
    (0, 4),
    (0, 5),
    (6, 3),
    (6, 4),
    (6, 5),
    (3, 6),
    (4, 6),
    (5, 6),
    (2, 2),
    (4, 2),
    (2, 4),
    (4, 4),
];

/// Colors that are not fixed by the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Fill of the inner square of each position marker
    pub accent: Rgb<u8>,
    /// Background the rounded corners are flattened onto
    pub matte: Rgb<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: Rgb([10, 88, 202]),
            matte: WHITE,
        }
    }
}

impl Palette {
    /// Override colors from CSS color strings (`#0a58ca`, `rgb(10, 88, 202)`).
    pub fn with_overrides(mut self, accent: Option<&str>, matte: Option<&str>) -> Result<Self> {
        if let Some(color) = accent {
            self.accent = parse_css_color(color)?;
        }
        if let Some(color) = matte {
            self.matte = parse_css_color(color)?;
        }
        Ok(self)
    }
}

pub fn parse_css_color(color: &str) -> Result<Rgb<u8>> {
    css_color::Srgb::from_str(color)
        .map(|color| {
            Rgb([
                (color.red * 255.).round() as u8,
                (color.green * 255.).round() as u8,
                (color.blue * 255.).round() as u8,
            ])
        })
        .map_err(|_| LogoError::InvalidColor(color.to_string()))
}

/// Pixel geometry of the pattern for one icon size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub padding: u32,
    pub qr_size: u32,
    pub module_size: u32,
    pub marker_size: u32,
    pub corner_radius: u32,
}

impl Layout {
    pub fn for_size(size: u32) -> Self {
        let padding = scale(size, 0.12);
        let qr_size = size - padding * 2;
        let module_size = qr_size / MODULES;

        Self {
            padding,
            qr_size,
            module_size,
            marker_size: scale(module_size, 2.5),
            corner_radius: scale(size, 0.2),
        }
    }

    /// Top-left, top-right and bottom-left marker origins.
    pub fn marker_origins(&self) -> [(u32, u32); 3] {
        let far = self.padding + self.qr_size - self.marker_size;
        [
            (self.padding, self.padding),
            (far, self.padding),
            (self.padding, far),
        ]
    }
}

// Truncating multiply, the way every pattern measurement is derived.
fn scale(value: u32, factor: f64) -> u32 {
    (value as f64 * factor) as u32
}

/// Synthesize the logo at `size` with the default palette.
pub fn generate_logo(size: u32) -> RgbImage {
    generate_logo_with(size, &Palette::default())
}

pub fn generate_logo_with(size: u32, palette: &Palette) -> RgbImage {
    let mut img = RgbImage::new(size, size);
    draw_gradient(&mut img);

    let layout = Layout::for_size(size);
    for (x, y) in layout.marker_origins() {
        draw_position_marker(&mut img, &layout, x, y, palette.accent);
    }
    draw_data_modules(&mut img, &layout);

    let mask = rounded_rect_mask(size, layout.corner_radius);
    flatten_onto(&img, &mask, palette.matte)
}

/// Generate every requested size and write the icon files.
pub fn generate_icons(palette: &Palette, options: &OutputOptions) -> Result<Vec<PathBuf>> {
    println!("Generating logo icons...");
    let icons = render_icons(&options.sizes, |size| Ok(generate_logo_with(size, palette)))?;
    write_icons(&icons, options)
}

/// Row color runs from (102, 16, 242) at the top toward (10, 88, 202) at the bottom.
fn gradient_color(row: u32, size: u32) -> Rgb<u8> {
    let ratio = row as f64 / size as f64;
    let inv = 1.0 - ratio;
    Rgb([
        (10.0 + 92.0 * inv) as u8,
        (88.0 + -72.0 * inv) as u8,
        (202.0 + 40.0 * inv) as u8,
    ])
}

fn draw_gradient(img: &mut RgbImage) {
    let (width, height) = img.dimensions();
    for y in 0..height {
        let color = gradient_color(y, height);
        for x in 0..width {
            img.put_pixel(x, y, color);
        }
    }
}

/// Fill the rectangle spanning `x0..=x1`, `y0..=y1`, clipped to the image.
fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    for y in y0..=y1.min(height - 1) {
        for x in x0..=x1.min(width - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

fn draw_position_marker(img: &mut RgbImage, layout: &Layout, x: u32, y: u32, accent: Rgb<u8>) {
    let module = layout.module_size;
    let marker = layout.marker_size;
    fill_rect(img, x, y, x + marker, y + marker, WHITE);

    let inner_pad = scale(module, 0.5);
    let inner_size = scale(module, 1.5);
    let (ix, iy) = (x + inner_pad, y + inner_pad);
    fill_rect(img, ix, iy, ix + inner_size, iy + inner_size, accent);

    let center_size = scale(module, 0.5);
    let (cx, cy) = (x + module, y + module);
    fill_rect(img, cx, cy, cx + center_size, cy + center_size, WHITE);
}

fn draw_data_modules(img: &mut RgbImage, layout: &Layout) {
    let module = layout.module_size;
    let inset = scale(module, 0.1);
    let extent = scale(module, 0.8);

    for (col, row) in DATA_PATTERN {
        let x = layout.padding + col * module + inset;
        let y = layout.padding + row * module + inset;
        fill_rect(img, x, y, x + extent, y + extent, WHITE);
    }
}

/// Opaque (255) inside a `size`x`size` rounded rectangle, 0 outside.
///
/// The rectangle covers exactly the visible pixels, so all four corners round
/// alike; a `[0, size]` inclusive box would round the right and bottom
/// corners one pixel less.
pub fn rounded_rect_mask(size: u32, radius: u32) -> GrayImage {
    let mut mask = GrayImage::new(size, size);
    if size == 0 {
        return mask;
    }

    let r = radius as i64;
    let last = size as i64 - 1;
    for (x, y, pixel) in mask.enumerate_pixels_mut() {
        let (x, y) = (x as i64, y as i64);
        // Distance past the straight edges into a corner square, per axis.
        let dx = (r - x).max(x - (last - r)).max(0);
        let dy = (r - y).max(y - (last - r)).max(0);
        let inside = dx * dx + dy * dy <= r * r;
        *pixel = Luma([if inside { 255 } else { 0 }]);
    }
    mask
}

/// Composite `img` over `matte` using `mask` as alpha; the result is opaque.
fn flatten_onto(img: &RgbImage, mask: &GrayImage, matte: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let alpha = mask.get_pixel(x, y)[0] as u32;
        let src = img.get_pixel(x, y);
        let mut out = [0u8; 3];
        for (c, value) in out.iter_mut().enumerate() {
            let blended = src[c] as u32 * alpha + matte[c] as u32 * (255 - alpha);
            *value = ((blended + 127) / 255) as u8;
        }
        Rgb(out)
    })
}
