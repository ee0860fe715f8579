// ============================================================
// Layer 5 — Sinusoidal Positional Encoding
// ============================================================
// Attention is permutation-invariant, so position has to be
// added to the embeddings explicitly. The table is fixed, not
// learned (Vaswani et al. 2017):
//
//   PE[pos, 2i]   = sin(pos / 10000^(2i / dim))
//   PE[pos, 2i+1] = cos(pos / 10000^(2i / dim))
//
// The classifier only ever feeds a length-1 sequence, so in
// practice this adds PE[0] = [0, 1, 0, 1, ...] to every token.
// The full table is still built so multi-frame input works
// without touching the model.

use burn::prelude::*;

/// Build the `[max_len, dim]` table as a flat row-major Vec.
pub fn sinusoidal_table(max_len: usize, dim: usize) -> Vec<f32> {
    let mut table = vec![0.0f32; max_len * dim];
    let log_base = -(10000.0f64).ln() / dim as f64;

    for pos in 0..max_len {
        let row = &mut table[pos * dim..(pos + 1) * dim];
        for i in (0..dim).step_by(2) {
            let angle = pos as f64 * (i as f64 * log_base).exp();
            row[i] = angle.sin() as f32;
            if i + 1 < dim {
                row[i + 1] = angle.cos() as f32;
            }
        }
    }
    table
}

#[derive(Config, Debug)]
pub struct PositionalEncodingConfig {
    pub dim: usize,
    #[config(default = 5000)]
    pub max_len: usize,
}

impl PositionalEncodingConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PositionalEncoding<B> {
        let table = sinusoidal_table(self.max_len, self.dim);
        let pe = Tensor::<B, 1>::from_floats(table.as_slice(), device)
            .reshape([self.max_len, self.dim]);
        PositionalEncoding { pe, max_len: self.max_len }
    }
}

/// Constant (non-trainable) additive position table.
#[derive(Module, Debug)]
pub struct PositionalEncoding<B: Backend> {
    /// [max_len, dim]; not a Param, so it is never updated or saved
    pub pe:      Tensor<B, 2>,
    pub max_len: usize,
}

impl<B: Backend> PositionalEncoding<B> {
    /// x: [batch, seq_len, dim] → x + PE[0..seq_len]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch_size, seq_len, dim] = x.dims();
        assert!(
            seq_len <= self.max_len,
            "sequence length {seq_len} exceeds positional table size {}",
            self.max_len
        );
        let pe = self
            .pe
            .clone()
            .slice([0..seq_len])
            .unsqueeze::<3>()
            .expand([batch_size, seq_len, dim]);
        x + pe
    }
}
