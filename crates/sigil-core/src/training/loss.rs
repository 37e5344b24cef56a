//! Cost-weighted binary cross-entropy.

use candle_core::Tensor;

use crate::constants::LOG_EPSILON;

/// Mean cost-weighted loss over a batch.
///
/// For each sample with prediction `p`, label `y` and transaction value `v`:
///
/// ```text
/// loss = -(y * alpha*v * ln(p + eps)) - ((1-y) * v * ln(1-p + eps))
/// ```
///
/// `alpha` discounts the reward for correctly accepting a genuine sample,
/// while a missed fraud costs the full transaction value. A sample with
/// `v == 0` contributes nothing regardless of correctness, and the `eps`
/// floor keeps the loss finite even when `p` saturates at 0 or 1.
///
/// `predictions` is `(N, 1)` or `(N,)`; `targets` is `(N, 2)` with column 0
/// the label and column 1 the transaction value. Returns a scalar tensor
/// connected to the prediction graph.
pub fn cost_weighted_loss(
    predictions: &Tensor,
    targets: &Tensor,
    alpha: f64,
) -> candle_core::Result<Tensor> {
    let predictions = predictions.flatten_all()?;

    let (n, cols) = targets.dims2()?;
    if cols != 2 {
        candle_core::bail!("targets must be (N, 2), got {:?}", targets.dims());
    }
    if predictions.dims()[0] != n {
        candle_core::bail!(
            "{} predictions for {} targets",
            predictions.dims()[0],
            n
        );
    }

    let labels = targets.narrow(1, 0, 1)?.squeeze(1)?;
    let values = targets.narrow(1, 1, 1)?.squeeze(1)?;

    let gain = values.affine(alpha, 0.0)?;
    let log_p = predictions.affine(1.0, LOG_EPSILON)?.log()?;
    let log_not_p = predictions.affine(-1.0, 1.0 + LOG_EPSILON)?.log()?;

    let genuine_term = labels.mul(&gain)?.mul(&log_p)?;
    let fraud_term = labels.affine(-1.0, 1.0)?.mul(&values)?.mul(&log_not_p)?;

    genuine_term.add(&fraud_term)?.neg()?.mean_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_ALPHA;
    use candle_core::{Device, Tensor};

    fn device() -> Device {
        Device::Cpu
    }

    fn loss_value(preds: &[f32], labels: &[f32], values: &[f32], alpha: f64) -> f32 {
        let n = preds.len();
        let predictions = Tensor::from_slice(preds, n, &device()).expect("preds");
        let label_col = Tensor::from_slice(labels, n, &device()).expect("labels");
        let value_col = Tensor::from_slice(values, n, &device()).expect("values");
        let targets = Tensor::stack(&[&label_col, &value_col], 1).expect("targets");

        cost_weighted_loss(&predictions, &targets, alpha)
            .expect("loss")
            .to_scalar::<f32>()
            .expect("scalar")
    }

    #[test]
    fn test_loss_is_finite_and_non_negative() {
        let loss = loss_value(
            &[0.1, 0.5, 0.9, 0.3],
            &[1.0, 0.0, 1.0, 0.0],
            &[10.0, 25.0, 80.0, 100.0],
            DEFAULT_ALPHA,
        );
        assert!(loss.is_finite());
        assert!(loss >= 0.0, "got {loss}");
    }

    #[test]
    fn test_zero_value_sample_contributes_nothing() {
        // A no-stakes sample must not move the loss no matter how wrong the
        // prediction is.
        let with_zero = loss_value(
            &[0.5, 0.999],
            &[1.0, 0.0],
            &[40.0, 0.0],
            DEFAULT_ALPHA,
        );
        let alone = loss_value(&[0.5], &[1.0], &[40.0], DEFAULT_ALPHA);

        // Mean over 2 samples where one term is zero = half the lone term.
        assert!(
            (with_zero - alone / 2.0).abs() < 1e-5,
            "zero-value sample leaked into the loss: {with_zero} vs {}",
            alone / 2.0
        );
    }

    #[test]
    fn test_boundary_predictions_stay_finite() {
        for p in [0.0f32, 1.0] {
            for y in [0.0f32, 1.0] {
                let loss = loss_value(&[p], &[y], &[100.0], DEFAULT_ALPHA);
                assert!(loss.is_finite(), "loss not finite for p={p}, y={y}");
                assert!(loss >= 0.0);
            }
        }
    }

    #[test]
    fn test_equal_values_reduce_to_scaled_weighted_bce() {
        // With every transaction value equal to c, the loss must be c times
        // the alpha-weighted cross-entropy of the same batch.
        let preds = [0.2f32, 0.7, 0.4, 0.95];
        let labels = [1.0f32, 0.0, 1.0, 1.0];
        let c = 50.0f32;

        let loss_at_c = loss_value(&preds, &labels, &[c; 4], DEFAULT_ALPHA);
        let loss_at_one = loss_value(&preds, &labels, &[1.0; 4], DEFAULT_ALPHA);

        assert!(
            (loss_at_c - c * loss_at_one).abs() < 1e-2,
            "expected proportional scaling: {loss_at_c} vs {}",
            c * loss_at_one
        );
    }

    #[test]
    fn test_alpha_discounts_only_the_genuine_branch() {
        // For a fraudulent sample (y = 0) alpha must have no effect.
        let fraud_low = loss_value(&[0.3], &[0.0], &[60.0], 0.1);
        let fraud_high = loss_value(&[0.3], &[0.0], &[60.0], 0.9);
        assert!((fraud_low - fraud_high).abs() < 1e-6);

        // For a genuine sample the loss scales with alpha.
        let genuine_low = loss_value(&[0.3], &[1.0], &[60.0], 0.1);
        let genuine_high = loss_value(&[0.3], &[1.0], &[60.0], 0.9);
        assert!(genuine_high > genuine_low);
    }

    #[test]
    fn test_matches_hand_computed_value() {
        // Single genuine sample: loss = -(1 * 0.25*v * ln(p + eps)).
        let p = 0.5f64;
        let v = 80.0f64;
        let expected = -(0.25 * v * (p + crate::constants::LOG_EPSILON).ln());

        let actual = loss_value(&[p as f32], &[1.0], &[v as f32], 0.25);
        assert!(
            (actual as f64 - expected).abs() < 1e-2,
            "got {actual}, expected {expected}"
        );
    }

    #[test]
    fn test_wrong_target_width_rejected() {
        let predictions = Tensor::from_slice(&[0.5f32], 1, &device()).expect("preds");
        let targets = Tensor::from_slice(&[1.0f32, 2.0, 3.0], (1, 3), &device()).expect("targets");
        assert!(cost_weighted_loss(&predictions, &targets, 0.25).is_err());
    }

    #[test]
    fn test_prediction_count_must_match_targets() {
        let predictions = Tensor::from_slice(&[0.5f32, 0.6], 2, &device()).expect("preds");
        let targets = Tensor::from_slice(&[1.0f32, 10.0], (1, 2), &device()).expect("targets");
        assert!(cost_weighted_loss(&predictions, &targets, 0.25).is_err());
    }
}
