// ============================================================
// Layer 4 — Face Mesh Batcher
// ============================================================
// Implements burn's Batcher trait to turn a Vec<FaceMeshSample>
// into tensors the model can consume.
//
//   Input:  N samples, each with D features and a class index
//   Output: features [N, D] (float), targets [N] (int)
//
// All rows come from the same CSV table, so every sample has
// the same D and the flat buffer can be reshaped directly.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::FaceMeshSample;

/// A mini-batch ready for the forward pass.
#[derive(Debug, Clone)]
pub struct FaceMeshBatch<B: Backend> {
    /// Feature rows — shape: [batch_size, num_features]
    pub features: Tensor<B, 2>,

    /// Class indices — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Holds the target device so tensors are created on the right
/// CPU/GPU.
#[derive(Clone, Debug)]
pub struct FaceMeshBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> FaceMeshBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<FaceMeshSample, FaceMeshBatch<B>> for FaceMeshBatcher<B> {
    fn batch(&self, items: Vec<FaceMeshSample>) -> FaceMeshBatch<B> {
        let batch_size   = items.len();
        let num_features = items.first().map(|s| s.features.len()).unwrap_or(0);

        // [s1_f1, ..., s1_fD, s2_f1, ..., sN_fD] → [N, D]
        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let targets: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let features = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([batch_size, num_features]);

        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        FaceMeshBatch { features, targets }
    }
}
