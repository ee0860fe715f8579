// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (training, or answering a prediction).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing or HTTP types here (Layers 1 and 7)
//   - Only workflow coordination

// The training workflow
pub mod train_use_case;

// Landmark payload → emotion label, with the neutral fallback
pub mod predict_use_case;
