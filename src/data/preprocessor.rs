// ============================================================
// Layer 4 — Feature Standardisation
// ============================================================
// Z-score standardisation of landmark features:
//
//   x' = (x - mean) / std
//
// computed per column. The scaler is FIT on the training split
// only and then applied unchanged to the test split, so no
// statistics from the test data leak into training.
//
// Columns with zero variance (e.g. a landmark that never moves)
// would divide by zero. Their scale is set to 1.0 so the column
// is only centred.
//
// The fitted scaler is serialisable so it can be written next
// to the model checkpoint.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-column mean of the training features
    pub mean: Vec<f32>,

    /// Per-column population standard deviation (1.0 where it was 0)
    pub scale: Vec<f32>,
}

impl StandardScaler {
    /// Fit column statistics on a set of rows.
    pub fn fit(rows: &[Vec<f32>]) -> Result<Self> {
        ensure!(!rows.is_empty(), "cannot fit a scaler on zero rows");
        let width = rows[0].len();
        ensure!(
            rows.iter().all(|r| r.len() == width),
            "all rows must have {width} features"
        );

        // Accumulate in f64 — 1404 columns × thousands of rows in f32
        // loses noticeable precision in the variance
        let n = rows.len() as f64;
        let mut sum    = vec![0.0f64; width];
        let mut sum_sq = vec![0.0f64; width];
        for row in rows {
            for (j, &x) in row.iter().enumerate() {
                let x = x as f64;
                sum[j]    += x;
                sum_sq[j] += x * x;
            }
        }

        let mean: Vec<f64> = sum.iter().map(|s| s / n).collect();
        let scale: Vec<f32> = sum_sq
            .iter()
            .zip(&mean)
            .map(|(sq, m)| {
                let var = (sq / n - m * m).max(0.0);
                let std = var.sqrt();
                if std < 1e-12 { 1.0 } else { std as f32 }
            })
            .collect();

        Ok(Self {
            mean: mean.into_iter().map(|m| m as f32).collect(),
            scale,
        })
    }

    pub fn num_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardise one row in place.
    pub fn transform_row(&self, row: &mut [f32]) {
        for ((x, m), s) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
            *x = (*x - m) / s;
        }
    }

    /// Standardise every row, returning new rows.
    pub fn transform(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        rows.iter()
            .map(|r| {
                ensure!(
                    r.len() == self.num_features(),
                    "row has {} features, scaler was fit on {}",
                    r.len(),
                    self.num_features()
                );
                let mut out = r.clone();
                self.transform_row(&mut out);
                Ok(out)
            })
            .collect()
    }

    /// Convenience: fit on `rows` and return the transformed rows.
    pub fn fit_transform(rows: &[Vec<f32>]) -> Result<(Self, Vec<Vec<f32>>)> {
        let scaler = Self::fit(rows)?;
        let out    = scaler.transform(rows)?;
        Ok((scaler, out))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_computes_mean_and_population_std() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let s = StandardScaler::fit(&rows).unwrap();
        assert_eq!(s.mean, vec![2.0, 10.0]);
        // Population std of [1, 3] is 1; constant column gets 1.0
        assert!((s.scale[0] - 1.0).abs() < 1e-6);
        assert_eq!(s.scale[1], 1.0);
    }

    #[test]
    fn test_train_columns_have_zero_mean_unit_variance() {
        let rows = vec![
            vec![1.0, -2.0, 5.0],
            vec![2.0,  0.0, 5.5],
            vec![4.0,  7.0, 4.0],
            vec![9.0,  1.0, 6.5],
        ];
        let (_, out) = StandardScaler::fit_transform(&rows).unwrap();
        for j in 0..3 {
            let col: Vec<f32> = out.iter().map(|r| r[j]).collect();
            let mean: f32 = col.iter().sum::<f32>() / col.len() as f32;
            let var:  f32 = col.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / col.len() as f32;
            assert!(mean.abs() < 1e-5);
            assert!((var - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_test_split_uses_train_statistics() {
        let train = vec![vec![0.0], vec![2.0]];
        let s = StandardScaler::fit(&train).unwrap();
        // Mean 1, std 1: a test value of 5 maps to 4 regardless of test stats
        let out = s.transform(&[vec![5.0]]).unwrap();
        assert_eq!(out, vec![vec![4.0]]);
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let s = StandardScaler::fit(&[vec![0.0, 1.0]]).unwrap();
        assert!(s.transform(&[vec![1.0]]).is_err());
    }

    #[test]
    fn test_fit_on_empty_is_an_error() {
        assert!(StandardScaler::fit(&[]).is_err());
    }
}
