// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL burn-specific model code apart from
// the Dataset/Batcher glue in Layer 4.
//
//   backend.rs    — NdArray / Wgpu backend aliases
//   positional.rs — fixed sinusoidal position table
//   model.rs      — transformer emotion classifier:
//                   • linear embedding of the 1404 features
//                   • positional encoding
//                   • 4 post-norm self-attention blocks (ReLU FFN)
//                   • mean pooling
//                   • linear projection to 7 logits
//   scheduler.rs  — reduce-on-plateau learning rate
//   trainer.rs    — training loop with best-snapshot selection
//   inferencer.rs — loads a checkpoint, classifies one vector
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need

pub mod backend;

pub mod positional;

/// Transformer classifier architecture
pub mod model;

pub mod scheduler;

/// Full training loop with evaluation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and predicts emotions
pub mod inferencer;
