//! End-to-end properties of the single-domain (eight-tile) dataset.

mod common;
use common::{normalized, write_marker_composite, write_pattern_composite};

use anyhow::Result;
use composite_pairs::{
    CropPolicy, Dataset, DatasetConfig, DatasetError, FlipPolicy, SingleDataset,
};
use rand::{rngs::StdRng, SeedableRng};
use tempfile::tempdir;

const MARKERS: [u8; 8] = [15, 25, 35, 45, 55, 65, 75, 85];

fn config(root: &std::path::Path) -> DatasetConfig {
    DatasetConfig::builder()
        .dataroot(root)
        .phase("test")
        .load_size(100)
        .crop_size(100)
        .crop(CropPolicy::Random)
        .flip(FlipPolicy::None)
        .build()
}

#[test]
fn test_single_sample_shape_and_channel_layout() -> Result<()> {
    let root = tempdir()?;
    let dir = root.path().join("test");
    std::fs::create_dir(&dir)?;
    write_marker_composite(&dir.join("composite.png"), 100, 100, &MARKERS, 0)?;

    let dataset = SingleDataset::new(&config(root.path()))?;
    let mut rng = StdRng::seed_from_u64(0);
    let sample = dataset.fetch(0, &mut rng)?;

    assert_eq!(sample.input.size(), vec![9, 100, 100]);
    assert!(sample.target.is_none());
    assert!(sample.target_path.is_none());

    // Group D merges the remainder-absorbing last tile into R and G, and
    // tile 6 into B.
    let expected = [
        MARKERS[0], MARKERS[1], MARKERS[2], // A
        MARKERS[3], MARKERS[4], MARKERS[5], // C
        MARKERS[7], MARKERS[7], MARKERS[6], // D
    ];
    for (channel, marker) in expected.iter().enumerate() {
        let value = sample.input.double_value(&[channel as i64, 50, 50]);
        assert!(
            (value - normalized(*marker)).abs() < 1e-5,
            "channel {} expected marker {}",
            channel,
            marker
        );
    }
    Ok(())
}

#[test]
fn test_widened_last_tile_is_malformed_at_fetch() -> Result<()> {
    let root = tempdir()?;
    let dir = root.path().join("test");
    std::fs::create_dir(&dir)?;
    // 8 * 100 + 12 columns: the last tile outgrows tile 6, so group D's
    // planes cannot merge.
    write_marker_composite(&dir.join("skewed.png"), 100, 50, &MARKERS, 12)?;

    let dataset = SingleDataset::new(&config(root.path()))?;
    let mut rng = StdRng::seed_from_u64(0);

    let err = dataset.fetch(0, &mut rng).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DatasetError>(),
        Some(DatasetError::MalformedImage(_))
    ));
    Ok(())
}

#[test]
fn test_shared_params_keep_groups_aligned() -> Result<()> {
    // All strips carry the same pattern: under a shared parameter set the
    // first plane of each group stays identical after crop and flip.
    let root = tempdir()?;
    let dir = root.path().join("test");
    std::fs::create_dir(&dir)?;
    write_pattern_composite(&dir.join("pattern.png"), 8, 100, 100)?;

    let mut config = config(root.path());
    config.crop_size = 64;
    config.flip = FlipPolicy::Random;

    let dataset = SingleDataset::new(&config)?;

    for seed in 0..10 {
        let sample = dataset.fetch(0, &mut StdRng::seed_from_u64(seed))?;
        let group_a_plane = sample.input.select(0, 0);
        let group_c_plane = sample.input.select(0, 3);
        let group_d_plane = sample.input.select(0, 6);
        assert!(
            group_a_plane.equal(&group_c_plane) && group_a_plane.equal(&group_d_plane),
            "seed {} de-aligned the input groups",
            seed
        );
    }
    Ok(())
}

#[test]
fn test_grayscale_input_has_one_channel_per_group() -> Result<()> {
    let root = tempdir()?;
    let dir = root.path().join("test");
    std::fs::create_dir(&dir)?;
    write_marker_composite(&dir.join("composite.png"), 100, 100, &MARKERS, 0)?;

    let mut config = config(root.path());
    config.input_nc = 1;

    let dataset = SingleDataset::new(&config)?;
    let mut rng = StdRng::seed_from_u64(0);
    let sample = dataset.fetch(0, &mut rng)?;

    assert_eq!(sample.input.size(), vec![3, 100, 100]);
    Ok(())
}
