// ============================================================
// Layer 4 — Label Encoder
// ============================================================
// Maps emotion strings to contiguous class indices and back.
//
// Fitting collects the distinct labels and SORTS them, so the
// mapping only depends on which labels occur, never on row
// order:
//
//   {happy, sad, angry, ...}  →  angry=0, disgust=1, fear=2,
//                                happy=3, neutral=4, sad=5,
//                                surprise=6
//
// The fitted encoder is written next to the checkpoint and is
// the only index → label table the server uses.

use std::collections::BTreeSet;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Sorted distinct class names; position = class index
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the class vocabulary from a list of labels.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let classes: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        if classes.is_empty() {
            return Err(anyhow!("cannot fit a label encoder on zero labels"));
        }
        Ok(Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Class index of one label, if it was seen during fitting.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Encode every label; an unseen label is an error.
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels
            .iter()
            .map(|l| {
                let l = l.as_ref();
                self.encode(l).ok_or_else(|| {
                    anyhow!("label '{l}' was not seen when fitting (known: {:?})", self.classes)
                })
            })
            .collect()
    }

    /// Label for a class index, if the index is in range.
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}
