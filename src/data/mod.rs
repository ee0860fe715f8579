// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From landmark CSVs to tensor batches:
//
//   train/test CSV
//       │
//       ▼
//   loader         → rows of 1404 floats + a string label
//       │
//       ├──► preprocessor   → per-column standardisation (fit on train)
//       └──► label_encoder  → sorted class list, label ↔ index
//       │
//       ▼
//   FaceMeshDataset → burn Dataset of (features, class index)
//       │
//       ▼
//   FaceMeshBatcher → [batch, 1404] floats + [batch] int targets
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads labelled landmark CSVs
pub mod loader;

/// Zero-mean / unit-variance feature scaling
pub mod preprocessor;

pub mod label_encoder;

/// Implements Burn's Dataset trait for landmark samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
