// ============================================================
// Layer 5 — Emotion Classifier Model
// ============================================================
// One landmark frame in, seven logits out:
//
//   [batch, 1404]
//       │ Linear embedding + dropout
//       ▼
//   [batch, 1, embed_dim] + positional table
//       │ N × TransformerBlock (post-norm)
//       ▼
//   mean over sequence → Linear → [batch, num_classes]
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
        Relu,
    },
    prelude::*,
};

use crate::ml::positional::{PositionalEncoding, PositionalEncodingConfig};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct EmotionClassifierConfig {
    pub input_size:  usize,
    #[config(default = 128)]
    pub embed_dim:   usize,
    #[config(default = 4)]
    pub num_heads:   usize,
    #[config(default = 256)]
    pub ff_dim:      usize,
    #[config(default = 7)]
    pub num_classes: usize,
    #[config(default = 4)]
    pub num_layers:  usize,
    #[config(default = 0.3)]
    pub embedding_dropout: f64,
    #[config(default = 0.2)]
    pub block_dropout: f64,
    #[config(default = 5000)]
    pub max_len:     usize,
}

impl EmotionClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> EmotionClassifier<B> {
        assert!(
            self.embed_dim % self.num_heads == 0,
            "embed_dim ({}) must be divisible by num_heads ({})",
            self.embed_dim,
            self.num_heads
        );
        let embedding   = LinearConfig::new(self.input_size, self.embed_dim).init(device);
        let pos_encoder = PositionalEncodingConfig::new(self.embed_dim)
            .with_max_len(self.max_len)
            .init(device);
        let blocks: Vec<TransformerBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_block(device))
            .collect();
        let classifier        = LinearConfig::new(self.embed_dim, self.num_classes).init(device);
        let embedding_dropout = DropoutConfig::new(self.embedding_dropout).init();
        EmotionClassifier {
            embedding, embedding_dropout, pos_encoder, blocks, classifier,
            input_size: self.input_size,
        }
    }

    fn build_block<B: Backend>(&self, device: &B::Device) -> TransformerBlock<B> {
        let attn = MultiHeadAttentionConfig::new(self.embed_dim, self.num_heads)
            .with_dropout(self.block_dropout)
            .init(device);
        let ff_linear1 = LinearConfig::new(self.embed_dim, self.ff_dim).init(device);
        let ff_linear2 = LinearConfig::new(self.ff_dim, self.embed_dim).init(device);
        let norm1   = LayerNormConfig::new(self.embed_dim).init(device);
        let norm2   = LayerNormConfig::new(self.embed_dim).init(device);
        let dropout = DropoutConfig::new(self.block_dropout).init();
        TransformerBlock { attn, ff_linear1, ff_linear2, norm1, norm2, dropout, activation: Relu::new() }
    }
}

/// Post-norm encoder block: attention → add & norm → FFN → add & norm.
#[derive(Module, Debug)]
pub struct TransformerBlock<B: Backend> {
    pub attn:       MultiHeadAttention<B>,
    pub ff_linear1: Linear<B>,
    pub ff_linear2: Linear<B>,
    pub norm1:      LayerNorm<B>,
    pub norm2:      LayerNorm<B>,
    pub dropout:    Dropout,
    pub activation: Relu,
}

impl<B: Backend> TransformerBlock<B> {
    /// [batch, seq_len, embed_dim] → same shape
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let attn_output = self.attn.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ff_output = self.ff_linear2.forward(
            self.activation.forward(self.ff_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ff_output))
    }
}

#[derive(Module, Debug)]
pub struct EmotionClassifier<B: Backend> {
    pub embedding:         Linear<B>,
    pub embedding_dropout: Dropout,
    pub pos_encoder:       PositionalEncoding<B>,
    pub blocks:            Vec<TransformerBlock<B>>,
    pub classifier:        Linear<B>,
    pub input_size:        usize,
}

pub struct ClassificationOutput<B: Backend> {
    pub loss:    Tensor<B, 1>,
    pub logits:  Tensor<B, 2>,
    pub targets: Tensor<B, 1, Int>,
}

impl<B: Backend> EmotionClassifier<B> {
    /// features: [batch, input_size] → logits: [batch, num_classes]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch_size, _] = features.dims();

        // A single landmark frame becomes a length-1 token sequence.
        let x = self.embedding.forward(features).unsqueeze_dim::<3>(1);
        let x = self.embedding_dropout.forward(x);
        let mut x = self.pos_encoder.forward(x);
        for block in &self.blocks {
            x = block.forward(x);
        }

        // Mean over the sequence axis: [batch, seq, dim] → [batch, dim]
        let [_, _, embed_dim] = x.dims();
        let pooled = x.mean_dim(1).reshape([batch_size, embed_dim]);

        // Raw logits; the caller picks argmax or softmax.
        self.classifier.forward(pooled)
    }

    pub fn forward_classification(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 1, Int>,
    ) -> ClassificationOutput<B> {
        let logits = self.forward(features);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets.clone());
        ClassificationOutput { loss, logits, targets }
    }

    /// Number of trainable scalars, for startup logging.
    pub fn parameter_count(&self) -> usize {
        self.num_params()
    }
}
