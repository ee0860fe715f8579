// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// One place decides which burn backend the crate runs on.
//
//   default build        → NdArray (pure CPU, runs anywhere)
//   --features wgpu      → Wgpu (GPU via WebGPU)
//
// Training wraps the backend in Autodiff for gradients;
// inference and evaluation use the plain inner backend, so
// no autodiff graph is ever built while serving.

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

pub type Device = <InferBackend as burn::tensor::backend::Backend>::Device;

pub fn default_device() -> Device {
    Device::default()
}
