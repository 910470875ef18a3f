use crate::domain::cooling::types::TrainingSample;
use crate::domain::errors::DatasetError;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub negative: usize,
    pub positive: usize,
}

impl ClassCounts {
    pub fn of(samples: &[TrainingSample]) -> Self {
        let positive = samples.iter().filter(|s| s.label()).count();
        Self {
            negative: samples.len() - positive,
            positive,
        }
    }

    pub fn total(&self) -> usize {
        self.negative + self.positive
    }

    pub fn positive_ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.positive as f64 / self.total() as f64
        }
    }
}

/// Upsamples the minority label with replacement until both labels have the
/// majority's count.
///
/// Output is the majority partition (original order) followed by the drawn
/// minority rows; duplicates are expected and kept. When both labels already
/// have the same count the rows are returned unchanged, negatives first.
pub fn balance_classes<R: Rng + ?Sized>(
    samples: Vec<TrainingSample>,
    rng: &mut R,
) -> Result<Vec<TrainingSample>, DatasetError> {
    if samples.is_empty() {
        return Err(DatasetError::Empty);
    }

    let (positives, negatives): (Vec<_>, Vec<_>) = samples.into_iter().partition(|s| s.label());
    let (majority, minority) = if positives.len() > negatives.len() {
        (positives, negatives)
    } else {
        (negatives, positives)
    };

    if minority.is_empty() {
        return Err(DatasetError::SingleClass {
            label: u8::from(majority[0].label()),
            count: majority.len(),
        });
    }

    if minority.len() == majority.len() {
        debug!("Classes already balanced ({} each)", majority.len());
        let mut balanced = majority;
        balanced.extend(minority);
        return Ok(balanced);
    }

    let target = majority.len();
    let upsampled: Vec<TrainingSample> = (0..target)
        .map(|_| minority[rng.random_range(0..minority.len())].clone())
        .collect();

    info!(
        "Balanced classes: majority {} (label {}), minority {} -> {}",
        target,
        u8::from(majority[0].label()),
        minority.len(),
        upsampled.len()
    );

    let mut balanced = majority;
    balanced.extend(upsampled);
    Ok(balanced)
}
