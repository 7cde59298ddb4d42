//! Splitting composite images into tile groups.
//!
//! A composite stores several grayscale sub-images side by side as
//! equal-width vertical strips. Splitting cuts the strips back out and
//! recombines them into 3-plane RGB images, including the duplicated-plane
//! patterns the data format mandates. The tile arrangement must match the
//! files bit-for-bit; do not "clean up" the duplications.

use crate::error::DatasetError;
use anyhow::Result;
use image::{imageops, DynamicImage, GenericImageView, GrayImage, Rgb, RgbImage};

/// How many tiles the composite encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Nine tiles: input groups plus a target strip.
    Paired,
    /// Eight tiles: input groups only.
    Single,
}

impl SplitMode {
    pub fn tile_count(&self) -> u32 {
        match self {
            SplitMode::Paired => 9,
            SplitMode::Single => 8,
        }
    }
}

/// The recombined sub-images of one composite.
///
/// Groups A, C and D are the input-domain channel groups, concatenated in
/// that order downstream. `target` is the target-domain strip, present only
/// in paired mode.
#[derive(Debug)]
pub struct TileGroups {
    pub group_a: RgbImage,
    pub group_c: RgbImage,
    pub group_d: RgbImage,
    pub target: Option<RgbImage>,
}

/// Cuts a composite into tiles and recombines them into tile groups.
///
/// Tile width is `floor(W / N)`; the final tile absorbs the remainder
/// columns, so no pixel column is dropped. Plane assignments per mode:
///
/// - Paired (N = 9): A = (t0, t1, t2), C = (t3, t4, t5), D = (t6, t6, t7),
///   target = the remainder strip replicated into all three planes.
/// - Single (N = 8): A = (t0, t1, t2), C = (t3, t4, t5),
///   D = (last, last, t6) where `last` is the remainder-absorbing tile.
///
/// Fails with [`DatasetError::MalformedImage`] when the width cannot hold
/// the tile count, or (single mode) when the remainder widens the last tile
/// past `t6` so the planes of group D no longer line up.
pub fn split_composite(composite: &DynamicImage, mode: SplitMode) -> Result<TileGroups> {
    let (width, height) = composite.dimensions();
    let count = mode.tile_count();
    let tile_width = width / count;
    if tile_width == 0 {
        return Err(DatasetError::MalformedImage(format!(
            "width {} cannot hold {} tiles",
            width, count
        ))
        .into());
    }

    // Tiles are single-channel planes; decode the composite as luma once.
    let plane = composite.to_luma8();
    let tile = |i: u32| imageops::crop_imm(&plane, i * tile_width, 0, tile_width, height).to_image();
    let last_x = (count - 1) * tile_width;
    let last = imageops::crop_imm(&plane, last_x, 0, width - last_x, height).to_image();

    let group_a = merge_planes(&tile(0), &tile(1), &tile(2))?;
    let group_c = merge_planes(&tile(3), &tile(4), &tile(5))?;

    match mode {
        SplitMode::Paired => Ok(TileGroups {
            group_a,
            group_c,
            group_d: merge_planes(&tile(6), &tile(6), &tile(7))?,
            target: Some(merge_planes(&last, &last, &last)?),
        }),
        SplitMode::Single => Ok(TileGroups {
            group_a,
            group_c,
            group_d: merge_planes(&last, &last, &tile(6))?,
            target: None,
        }),
    }
}

/// Merges three grayscale planes into one RGB image.
fn merge_planes(r: &GrayImage, g: &GrayImage, b: &GrayImage) -> Result<RgbImage> {
    let dims = r.dimensions();
    if g.dimensions() != dims || b.dimensions() != dims {
        return Err(DatasetError::MalformedImage(format!(
            "cannot merge planes of differing sizes ({:?}, {:?}, {:?})",
            r.dimensions(),
            g.dimensions(),
            b.dimensions()
        ))
        .into());
    }

    Ok(RgbImage::from_fn(dims.0, dims.1, |x, y| {
        Rgb([
            r.get_pixel(x, y)[0],
            g.get_pixel(x, y)[0],
            b.get_pixel(x, y)[0],
        ])
    }))
}
