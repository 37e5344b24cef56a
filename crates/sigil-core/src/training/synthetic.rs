//! Simulated paired samples for smoke training runs.
//!
//! Each grid is all-white except for one randomly chosen row filled with
//! random colors. Pairs carry a side feature in [0, 1), a transaction value
//! in [10, 100) and a random binary label. Fully deterministic for a given
//! seed.

use candle_core::{Device, Tensor};

use crate::constants::{GRID_CHANNELS, GRID_HEIGHT, GRID_WIDTH};
use crate::training::dataset::PairSet;
use crate::training::error::TrainingError;
use crate::training::rng::Lcg;

/// Generates `num_pairs` simulated reference/query pairs on `device`.
pub fn generate_pairs(
    num_pairs: usize,
    seed: u64,
    device: &Device,
) -> Result<PairSet, TrainingError> {
    if num_pairs == 0 {
        return Err(TrainingError::EmptyDataset);
    }

    let mut rng = Lcg::new(seed);

    let references = grid_batch(num_pairs, &mut rng, device)?;
    let queries = grid_batch(num_pairs, &mut rng, device)?;

    let side: Vec<f32> = (0..num_pairs).map(|_| rng.next_f32()).collect();
    let values: Vec<f32> = (0..num_pairs).map(|_| rng.next_range(10.0, 100.0)).collect();
    let labels: Vec<f32> = (0..num_pairs)
        .map(|_| if rng.next_bool() { 1.0 } else { 0.0 })
        .collect();

    let side_features = Tensor::from_slice(&side, (num_pairs, 1), device)
        .map_err(TrainingError::Tensor)?;

    PairSet::new(references, queries, side_features, &labels, &values)
}

fn grid_batch(count: usize, rng: &mut Lcg, device: &Device) -> Result<Tensor, TrainingError> {
    let grid_elems = GRID_HEIGHT * GRID_WIDTH * GRID_CHANNELS;
    let mut data = vec![1.0f32; count * grid_elems];

    for image in 0..count {
        let row = rng.next_index(GRID_HEIGHT);
        let row_start = image * grid_elems + row * GRID_WIDTH * GRID_CHANNELS;
        for value in &mut data[row_start..row_start + GRID_WIDTH * GRID_CHANNELS] {
            *value = rng.next_f32();
        }
    }

    Tensor::from_vec(data, (count, GRID_HEIGHT, GRID_WIDTH, GRID_CHANNELS), device)
        .map_err(TrainingError::Tensor)
}
