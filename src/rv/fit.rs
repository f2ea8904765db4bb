//! Exponential depreciation fit: price ≈ a·e^(b·age).
//!
//! Fit by ordinary least squares on (age, ln price) in mean-centered form:
//! the slope comes from centered cross sums, so the solve stays
//! well-conditioned when ages cluster far from zero. The raw 2×2 normal
//! equations are never formed.

/// Minimum number of valid (age, price) pairs required to attempt a fit.
pub const MIN_SAMPLES: usize = 8;

/// A fitted curve. `scale` is the predicted price at age zero; `decay` is
/// the exponential rate, negative for depreciating models. The sign of
/// `decay` is deliberately unconstrained: a group whose prices rise with age
/// yields an appreciating curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepreciationCurve {
    pub scale: f64,
    pub decay: f64,
}

impl DepreciationCurve {
    /// Predicted price at `age_years`. Valid for any non-negative age,
    /// including fractional values.
    pub fn predict(&self, age_years: f64) -> f64 {
        self.scale * (self.decay * age_years).exp()
    }
}

/// Fits the curve for one group of (age, price) observations.
///
/// Pairs with a non-finite age or price, or a non-positive price, are
/// discarded first. Returns `None` when fewer than [`MIN_SAMPLES`] valid
/// pairs remain, when every valid pair has the same age, or when the
/// solution is non-finite.
pub fn fit_depreciation(pairs: &[(f64, f64)]) -> Option<DepreciationCurve> {
    let valid: Vec<(f64, f64)> = pairs
        .iter()
        .copied()
        .filter(|&(age, price)| age.is_finite() && price.is_finite() && price > 0.0)
        .collect();
    if valid.len() < MIN_SAMPLES {
        return None;
    }

    let n = valid.len() as f64;
    let age_mean = valid.iter().map(|(age, _)| age).sum::<f64>() / n;
    let log_mean = valid.iter().map(|(_, price)| price.ln()).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxz = 0.0;
    for &(age, price) in &valid {
        let dx = age - age_mean;
        sxx += dx * dx;
        sxz += dx * (price.ln() - log_mean);
    }

    if sxx == 0.0 {
        // every observation at the same age
        return None;
    }

    let decay = sxz / sxx;
    let scale = (log_mean - decay * age_mean).exp();
    if !decay.is_finite() || !scale.is_finite() || scale <= 0.0 {
        return None;
    }

    Some(DepreciationCurve { scale, decay })
}
