// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits describing the problem:
// what a landmark vector is, which labels exist, and what a
// prediction looks like.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O or network calls
//   - Only plain Rust types and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Emotion label vocabulary and the Prediction result type
pub mod emotion;

// The 1404-float landmark vector and its validation
pub mod landmarks;

// Core abstractions (traits) that other layers implement
pub mod traits;
