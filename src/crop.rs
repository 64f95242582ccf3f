//! Turning a user-supplied image into extension icons: load, square crop,
//! Lanczos resize to every icon size.

use crate::error::{LogoError, Result};
use crate::icon_writer::{render_icons, write_icons, OutputOptions};
use image::{
    imageops::{self, FilterType},
    io::Reader as ImageReader,
    RgbImage,
};
use std::{
    fmt, io,
    path::{Path, PathBuf},
};

/// Largest crop (in pixels) we are willing to allocate. Only reachable with
/// crop percentages far above 100.
const MAX_CROP_PIXELS: u64 = 1 << 28;

const MAX_COORD: f64 = u32::MAX as f64;

/// Crop size and offsets, all in percent.
///
/// `crop_percent` is relative to the shorter image side; offsets are
/// relative to the image width (x) and height (y). Out-of-range values are
/// accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropParams {
    pub crop_percent: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl CropParams {
    pub const SUGGESTED_CROP_PERCENT: (f64, f64) = (50.0, 150.0);
    pub const SUGGESTED_OFFSET: (f64, f64) = (-50.0, 50.0);

    pub fn new(crop_percent: f64, x_offset: f64, y_offset: f64) -> Self {
        Self {
            crop_percent,
            x_offset,
            y_offset,
        }
    }

    pub fn is_within_suggested_range(&self) -> bool {
        let (crop_min, crop_max) = Self::SUGGESTED_CROP_PERCENT;
        let (off_min, off_max) = Self::SUGGESTED_OFFSET;
        (crop_min..=crop_max).contains(&self.crop_percent)
            && (off_min..=off_max).contains(&self.x_offset)
            && (off_min..=off_max).contains(&self.y_offset)
    }
}

impl Default for CropParams {
    fn default() -> Self {
        Self::new(100.0, 0.0, 0.0)
    }
}

/// How a crop box that leaves the image is pulled back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClampPolicy {
    /// Clamp each edge on its own. Left/top go to `[0, side]`, right/bottom
    /// to `[crop_size, side]`; the box may stop being square.
    #[default]
    Inherited,
    /// Slide the whole box back inside the image so it keeps its size.
    /// A box larger than the image is centered on that axis.
    KeepSquare,
}

/// Pixel rectangle, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl CropBox {
    pub fn width(&self) -> i64 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i64 {
        self.bottom.saturating_sub(self.top)
    }
}

impl fmt::Display for CropBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Compute the crop box for an image of `width`x`height`.
///
/// The box is a square of `min(width, height) * crop_percent / 100` centered
/// on the image and shifted by the offsets, then clamped per `policy`.
/// Coordinates are truncated toward zero at the end.
pub fn compute_crop_box(
    width: u32,
    height: u32,
    params: &CropParams,
    policy: ClampPolicy,
) -> CropBox {
    let (w, h) = (width as f64, height as f64);
    let crop_size = w.min(h) * (params.crop_percent / 100.0);

    let left = (w - crop_size) / 2.0 + params.x_offset * w / 100.0;
    let top = (h - crop_size) / 2.0 + params.y_offset * h / 100.0;

    let (left, right) = clamp_span(left, crop_size, w, policy);
    let (top, bottom) = clamp_span(top, crop_size, h, policy);

    CropBox {
        left: to_coord(left),
        top: to_coord(top),
        right: to_coord(right),
        bottom: to_coord(bottom),
    }
}

// Keeps huge and infinite percentages finite so box arithmetic cannot overflow.
fn to_coord(value: f64) -> i64 {
    value.clamp(-MAX_COORD, MAX_COORD) as i64
}

fn clamp_span(start: f64, crop_size: f64, side: f64, policy: ClampPolicy) -> (f64, f64) {
    match policy {
        ClampPolicy::Inherited => {
            let end = start + crop_size;
            (start.min(side).max(0.0), end.min(side).max(crop_size))
        }
        ClampPolicy::KeepSquare => {
            let start = if crop_size <= side {
                start.max(0.0).min(side - crop_size)
            } else {
                (side - crop_size) / 2.0
            };
            (start, start + crop_size)
        }
    }
}

/// Centered square of side `min(width, height)`, in integer arithmetic.
pub fn center_square_box(width: u32, height: u32) -> CropBox {
    let side = width.min(height);
    let left = ((width - side) / 2) as i64;
    let top = ((height - side) / 2) as i64;
    CropBox {
        left,
        top,
        right: left + side as i64,
        bottom: top + side as i64,
    }
}

/// Cut `crop` out of `img`. Parts of the box outside the image come out black.
pub fn crop_to_box(img: &RgbImage, crop: CropBox) -> Result<RgbImage> {
    let span_x = crop.right.checked_sub(crop.left);
    let span_y = crop.bottom.checked_sub(crop.top);
    let (span_x, span_y) = match (span_x, span_y) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(LogoError::CropTooLarge(crop)),
    };
    if span_x < 0 || span_y < 0 {
        return Err(LogoError::InvalidCropBox(crop));
    }
    let width = u32::try_from(span_x).map_err(|_| LogoError::CropTooLarge(crop))?;
    let height = u32::try_from(span_y).map_err(|_| LogoError::CropTooLarge(crop))?;
    if width as u64 * height as u64 > MAX_CROP_PIXELS {
        return Err(LogoError::CropTooLarge(crop));
    }

    let x0 = crop.left.max(0);
    let y0 = crop.top.max(0);
    let x1 = crop.right.min(img.width() as i64);
    let y1 = crop.bottom.min(img.height() as i64);

    // Fast path: box fully inside the source.
    if x0 == crop.left && y0 == crop.top && x1 == crop.right && y1 == crop.bottom {
        return Ok(imageops::crop_imm(img, x0 as u32, y0 as u32, width, height).to_image());
    }

    let mut out = RgbImage::new(width, height);
    if x0 < x1 && y0 < y1 {
        let region = imageops::crop_imm(
            img,
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        )
        .to_image();
        imageops::replace(&mut out, &region, x0 - crop.left, y0 - crop.top);
    }
    Ok(out)
}

/// Lanczos3 resize to exactly `size`x`size`.
pub fn resize_square(img: &RgbImage, size: u32) -> Result<RgbImage> {
    if img.width() == 0 || img.height() == 0 {
        return Err(LogoError::EmptyImage {
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(imageops::resize(img, size, size, FilterType::Lanczos3))
}

/// Open `path` and convert it to 8-bit RGB, dropping any alpha channel.
pub fn load_source(path: &Path) -> Result<RgbImage> {
    let reader = match ImageReader::open(path) {
        Ok(reader) => reader,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LogoError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let source = reader
        .with_guessed_format()?
        .decode()
        .map_err(|source| LogoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!("decoded {} as {:?}", path.display(), source.color());
    Ok(source.to_rgb8())
}

/// Crop `path` with `params`, resize to every size and write the icons.
pub fn process_logo(
    path: &Path,
    params: &CropParams,
    policy: ClampPolicy,
    options: &OutputOptions,
) -> Result<Vec<PathBuf>> {
    if !params.is_within_suggested_range() {
        log::warn!(
            "crop parameters {params:?} are outside the suggested range \
             (crop 50-150%, offsets -50..50%)"
        );
    }

    let source = load_source(path)?;
    let (width, height) = source.dimensions();
    let crop = compute_crop_box(width, height, params, policy);
    log::debug!("crop box {crop} with {policy:?} clamping");

    println!("Processing logo: {}", path.display());
    println!("  Original size: {width}x{height}");
    println!("  Crop size: {}%", params.crop_percent);
    println!("  Crop box: {crop}");

    let cropped = crop_to_box(&source, crop)?;
    let icons = render_icons(&options.sizes, |size| resize_square(&cropped, size))?;
    write_icons(&icons, options)
}

/// Center-crop `path` to a square, resize to every size and write the icons.
pub fn update_logo(path: &Path, options: &OutputOptions) -> Result<Vec<PathBuf>> {
    let source = load_source(path)?;
    let (width, height) = source.dimensions();
    let crop = center_square_box(width, height);

    println!("Updating logo: {}", path.display());
    println!("  Original size: {width}x{height}");
    println!("  Crop box: {crop}");

    let cropped = crop_to_box(&source, crop)?;
    let icons = render_icons(&options.sizes, |size| resize_square(&cropped, size))?;
    write_icons(&icons, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn boxed(left: i64, top: i64, right: i64, bottom: i64) -> CropBox {
        CropBox {
            left,
            top,
            right,
            bottom,
        }
    }

    #[test]
    fn test_half_crop_of_wide_image() {
        let params = CropParams::new(50.0, 0.0, 0.0);
        let crop = compute_crop_box(2000, 1000, &params, ClampPolicy::Inherited);
        assert_eq!(crop, boxed(750, 250, 1250, 750));
    }

    #[test]
    fn test_default_params_match_center_square() {
        for (w, h) in [(2000, 1000), (1000, 2000), (333, 200), (201, 200), (64, 64)] {
            let processed = compute_crop_box(w, h, &CropParams::default(), ClampPolicy::Inherited);
            let quick = center_square_box(w, h);
            for (a, b) in [
                (processed.left, quick.left),
                (processed.top, quick.top),
                (processed.right, quick.right),
                (processed.bottom, quick.bottom),
            ] {
                assert!((a - b).abs() <= 1, "{processed} vs {quick} for {w}x{h}");
            }
        }
    }

    #[test]
    fn test_center_square_box() {
        assert_eq!(center_square_box(301, 200), boxed(50, 0, 250, 200));
        assert_eq!(center_square_box(200, 301), boxed(0, 50, 200, 250));
    }

    #[test]
    fn test_large_negative_offset_clamps_to_zero() {
        let params = CropParams::new(50.0, -100.0, -100.0);
        let crop = compute_crop_box(1000, 1000, &params, ClampPolicy::Inherited);
        assert_eq!(crop.left, 0);
        assert_eq!(crop.top, 0);
        // right = max(500, -250)
        assert_eq!(crop, boxed(0, 0, 500, 500));
    }

    #[test]
    fn test_large_positive_offset_clamps_to_bounds() {
        let params = CropParams::new(50.0, 100.0, 40.0);
        let crop = compute_crop_box(1000, 800, &params, ClampPolicy::Inherited);
        assert_eq!(crop.left, 1000);
        assert_eq!(crop.right, 1000);
        // top = 200 + 320 = 520, bottom = min(920, 800)
        assert_eq!(crop.top, 520);
        assert_eq!(crop.bottom, 800);
    }

    #[test]
    fn test_inherited_clamp_can_break_square() {
        let params = CropParams::new(50.0, 40.0, 0.0);
        let crop = compute_crop_box(1000, 1000, &params, ClampPolicy::Inherited);
        assert_eq!(crop, boxed(650, 250, 1000, 750));
        assert_ne!(crop.width(), crop.height());
    }

    #[test]
    fn test_keep_square_slides_box_inside() {
        let params = CropParams::new(50.0, 40.0, -60.0);
        let crop = compute_crop_box(1000, 1000, &params, ClampPolicy::KeepSquare);
        assert_eq!(crop, boxed(500, 0, 1000, 500));
    }

    #[test]
    fn test_keep_square_centers_oversized_box() {
        let params = CropParams::new(150.0, 10.0, 0.0);
        let crop = compute_crop_box(100, 100, &params, ClampPolicy::KeepSquare);
        assert_eq!(crop, boxed(-25, -25, 125, 125));
    }

    #[test]
    fn test_extreme_percentages_stay_finite() {
        let cases = [
            (CropParams::new(-4e18, 0.0, 0.0), ClampPolicy::Inherited),
            (CropParams::new(f64::INFINITY, 0.0, 0.0), ClampPolicy::Inherited),
            (CropParams::new(f64::INFINITY, 0.0, 0.0), ClampPolicy::KeepSquare),
            (CropParams::new(1e300, 0.0, 0.0), ClampPolicy::KeepSquare),
            (CropParams::new(100.0, f64::NEG_INFINITY, 1e300), ClampPolicy::Inherited),
            (CropParams::new(f64::NAN, 0.0, 0.0), ClampPolicy::KeepSquare),
        ];
        let img = RgbImage::new(8, 8);

        for (params, policy) in cases {
            let crop = compute_crop_box(1000, 1000, &params, policy);
            for coord in [crop.left, crop.top, crop.right, crop.bottom] {
                assert!(coord.abs() <= u32::MAX as i64, "{params:?} {policy:?}: {crop}");
            }

            match crop_to_box(&img, crop) {
                Ok(_)
                | Err(LogoError::CropTooLarge(_))
                | Err(LogoError::InvalidCropBox(_)) => {}
                Err(e) => panic!("{params:?} {policy:?}: unexpected error {e}"),
            }
        }
    }

    #[test]
    fn test_huge_crop_is_too_large() {
        let params = CropParams::new(f64::INFINITY, 0.0, 0.0);
        for policy in [ClampPolicy::Inherited, ClampPolicy::KeepSquare] {
            let crop = compute_crop_box(1000, 1000, &params, policy);
            let err = crop_to_box(&RgbImage::new(8, 8), crop).unwrap_err();
            assert!(matches!(err, LogoError::CropTooLarge(_)), "{policy:?}: {err}");
        }
    }

    #[test]
    fn test_saturated_box_does_not_overflow() {
        let crop = boxed(i64::MAX, 0, i64::MIN, 4);
        assert_eq!(crop.width(), i64::MIN);
        let err = crop_to_box(&RgbImage::new(4, 4), crop).unwrap_err();
        assert!(matches!(err, LogoError::CropTooLarge(_)));
    }

    #[test]
    fn test_suggested_range() {
        assert!(CropParams::default().is_within_suggested_range());
        assert!(CropParams::new(150.0, -50.0, 50.0).is_within_suggested_range());
        assert!(!CropParams::new(20.0, 0.0, 0.0).is_within_suggested_range());
        assert!(!CropParams::new(100.0, 0.0, 75.0).is_within_suggested_range());
    }

    #[test]
    fn test_crop_inside_bounds() {
        let img = RgbImage::from_fn(10, 10, |x, y| Rgb([x as u8, y as u8, 0]));
        let cropped = crop_to_box(&img, boxed(2, 3, 6, 7)).unwrap();
        assert_eq!(cropped.dimensions(), (4, 4));
        assert_eq!(*cropped.get_pixel(0, 0), Rgb([2, 3, 0]));
        assert_eq!(*cropped.get_pixel(3, 3), Rgb([5, 6, 0]));
    }

    #[test]
    fn test_crop_past_bounds_pads_black() {
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 100, 50]));
        let cropped = crop_to_box(&img, boxed(0, 0, 6, 6)).unwrap();
        assert_eq!(cropped.dimensions(), (6, 6));
        assert_eq!(*cropped.get_pixel(3, 3), Rgb([200, 100, 50]));
        assert_eq!(*cropped.get_pixel(5, 5), Rgb([0, 0, 0]));
        assert_eq!(*cropped.get_pixel(4, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_crop_negative_origin() {
        let img = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        let cropped = crop_to_box(&img, boxed(-2, -2, 2, 2)).unwrap();
        assert_eq!(*cropped.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*cropped.get_pixel(3, 3), Rgb([9, 9, 9]));
    }

    #[test]
    fn test_inverted_box_is_rejected() {
        let img = RgbImage::new(4, 4);
        let err = crop_to_box(&img, boxed(3, 0, 1, 4)).unwrap_err();
        assert!(matches!(err, LogoError::InvalidCropBox(_)));
    }

    #[test]
    fn test_empty_crop_fails_at_resize() {
        let img = RgbImage::new(10, 10);
        let cropped = crop_to_box(&img, boxed(10, 0, 10, 10)).unwrap();
        assert_eq!(cropped.width(), 0);
        let err = resize_square(&cropped, 16).unwrap_err();
        assert!(matches!(err, LogoError::EmptyImage { .. }));
    }

    #[test]
    fn test_resize_square_dimensions() {
        let img = RgbImage::from_pixel(37, 91, Rgb([1, 2, 3]));
        for size in [16, 48, 128] {
            assert_eq!(resize_square(&img, size).unwrap().dimensions(), (size, size));
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_source(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(err.is_not_found());
    }
}
