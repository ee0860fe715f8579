// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns shared by training and serving:
//
//   checkpoint.rs — model weights (burn CompactRecorder) plus the
//                   JSON artifacts serving needs: train config,
//                   label encoder, feature scaler, summary
//
//   metrics.rs    — per-epoch metrics CSV
//
//   paths.rs      — resolves configured paths against the
//                   deployment root
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint and artifact saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Deployment-root path resolution
pub mod paths;
