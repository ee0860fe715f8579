// ============================================================
// Layer 4 — FaceMeshDataset
// ============================================================

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One standardised feature vector with its encoded class index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceMeshSample {
    pub features: Vec<f32>,
    pub label:    usize,
}

pub struct FaceMeshDataset {
    samples: Vec<FaceMeshSample>,
}

impl FaceMeshDataset {
    pub fn new(samples: Vec<FaceMeshSample>) -> Self { Self { samples } }

    /// Zip feature rows with encoded labels.
    pub fn from_parts(features: Vec<Vec<f32>>, labels: Vec<usize>) -> Self {
        let samples = features
            .into_iter()
            .zip(labels)
            .map(|(features, label)| FaceMeshSample { features, label })
            .collect();
        Self { samples }
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// How many samples carry each class index.
    pub fn class_counts(&self, num_classes: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_classes];
        for s in &self.samples {
            if let Some(c) = counts.get_mut(s.label) {
                *c += 1;
            }
        }
        counts
    }
}

impl Dataset<FaceMeshSample> for FaceMeshDataset {
    fn get(&self, index: usize) -> Option<FaceMeshSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_and_counts() {
        let ds = FaceMeshDataset::from_parts(
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.5, 0.5]],
            vec![2, 0, 2],
        );
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.get(1).unwrap().label, 0);
        assert!(ds.get(3).is_none());
        assert_eq!(ds.class_counts(3), vec![1, 0, 2]);
    }
}
