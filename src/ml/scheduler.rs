// ============================================================
// Layer 5 — Reduce-on-Plateau Learning Rate Schedule
// ============================================================
// Watches the average training loss once per epoch. Once the
// loss has failed to improve for MORE than `patience` epochs in
// a row, the learning rate is multiplied by `factor` and the
// counter starts over.
//
// "Improved" is relative: the loss must beat the best value
// seen so far by more than `threshold × best`, so tiny float
// wobbles don't reset the patience counter.
//
//   epoch  loss   best   bad  lr
//   1      1.90   1.90   0    1e-3
//   2      1.95   1.90   1    1e-3
//   3      1.92   1.90   2    1e-3
//   4      1.93   1.90   3    5e-4   ← halved, counter reset
//   5      1.80   1.80   0    5e-4

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReduceOnPlateau {
    lr:         f64,
    factor:     f64,
    patience:   usize,
    threshold:  f64,
    best:       f64,
    bad_epochs: usize,
}

impl ReduceOnPlateau {
    pub fn new(initial_lr: f64, factor: f64, patience: usize) -> Self {
        assert!(factor > 0.0 && factor < 1.0, "factor must be in (0, 1)");
        Self {
            lr:         initial_lr,
            factor,
            patience,
            threshold:  1e-4,
            best:       f64::INFINITY,
            bad_epochs: 0,
        }
    }

    /// Current learning rate
    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Feed the epoch's monitored loss. Returns true if the
    /// learning rate was reduced by this call.
    pub fn step(&mut self, loss: f64) -> bool {
        // NaN never counts as an improvement
        if loss < self.best * (1.0 - self.threshold) {
            self.best       = loss;
            self.bad_epochs = 0;
            return false;
        }

        self.bad_epochs += 1;
        if self.bad_epochs <= self.patience {
            return false;
        }

        self.bad_epochs = 0;
        let new_lr = self.lr * self.factor;
        tracing::info!("Loss plateaued, reducing learning rate {:.2e} → {:.2e}", self.lr, new_lr);
        self.lr = new_lr;
        true
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_flat_epochs_keep_the_rate() {
        let mut s = ReduceOnPlateau::new(1e-3, 0.5, 2);
        assert!(!s.step(1.90));
        assert!(!s.step(1.95));
        assert!(!s.step(1.92));
        assert_eq!(s.lr(), 1e-3);
    }

    #[test]
    fn test_halves_on_third_flat_epoch() {
        let mut s = ReduceOnPlateau::new(1e-3, 0.5, 2);
        s.step(1.90);
        s.step(1.95);
        s.step(1.92);
        assert!(s.step(1.93));
        assert!((s.lr() - 5e-4).abs() < 1e-12);

        // counter restarted: two more flat epochs are tolerated again
        assert!(!s.step(1.94));
        assert!(!s.step(1.94));
        assert!(s.step(1.94));
        assert!((s.lr() - 2.5e-4).abs() < 1e-12);
    }

    #[test]
    fn test_earliest_reduction_in_five_epochs_is_epoch_four() {
        let mut s = ReduceOnPlateau::new(1e-3, 0.5, 2);
        let reduced: Vec<bool> = [1.0, 1.0, 1.0, 1.0, 1.0].iter().map(|&l| s.step(l)).collect();
        assert_eq!(reduced, vec![false, false, false, true, false]);
    }

    #[test]
    fn test_improvement_resets_counter() {
        let mut s = ReduceOnPlateau::new(1e-3, 0.5, 2);
        s.step(2.0);
        s.step(2.1);        // bad 1
        s.step(2.2);        // bad 2
        s.step(1.5);        // improvement, reset
        assert!(!s.step(1.6)); // bad 1 again
        assert!(!s.step(1.6)); // bad 2
        assert_eq!(s.lr(), 1e-3);
    }

    #[test]
    fn test_steadily_decreasing_loss_never_reduces() {
        let mut s = ReduceOnPlateau::new(1e-3, 0.5, 2);
        for loss in [2.0, 1.8, 1.5, 1.2, 1.0] {
            assert!(!s.step(loss));
        }
        assert_eq!(s.lr(), 1e-3);
    }

    #[test]
    fn test_sub_threshold_change_is_not_improvement() {
        let mut s = ReduceOnPlateau::new(1e-3, 0.5, 2);
        s.step(1.0);
        s.step(0.99999);
        s.step(0.99998);
        assert!(s.step(0.99997));
    }

    #[test]
    fn test_zero_patience_reduces_on_first_bad_epoch() {
        let mut s = ReduceOnPlateau::new(1e-3, 0.5, 0);
        s.step(1.0);
        assert!(s.step(1.0));
    }

    #[test]
    fn test_nan_loss_counts_as_bad_epoch() {
        let mut s = ReduceOnPlateau::new(1e-3, 0.5, 1);
        s.step(1.0);
        assert!(!s.step(f64::NAN));
        assert!(s.step(f64::NAN));
    }
}
