//! Descriptive statistics used by the analyzer.
//!
//! Estimators follow the conventions of common dataframe libraries so that
//! thresholds tuned against them carry over: quantiles interpolate linearly,
//! skewness is the adjusted Fisher-Pearson coefficient and kurtosis is the
//! bias-corrected excess kurtosis.

use std::cmp::Ordering;

/// Central moments of a sample.
#[derive(Debug, Clone, Copy)]
pub struct Moments {
    pub count: usize,
    pub mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
}

impl Moments {
    pub fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: 0.0,
                m2: 0.0,
                m3: 0.0,
                m4: 0.0,
            };
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for &v in values {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        Self {
            count,
            mean,
            m2,
            m3,
            m4,
        }
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn std(&self) -> Option<f64> {
        (self.count >= 2).then(|| (self.m2 / (self.count - 1) as f64).sqrt())
    }

    fn is_degenerate(&self) -> bool {
        // Rounding noise on constant input must not blow up the ratios below.
        self.m2 <= f64::EPSILON * self.mean.abs().max(1.0) * self.count as f64
    }

    /// Adjusted Fisher-Pearson skewness. Undefined below three values.
    pub fn skewness(&self) -> Option<f64> {
        if self.count < 3 {
            return None;
        }
        if self.is_degenerate() {
            return Some(0.0);
        }
        let n = self.count as f64;
        let g1 = (self.m3 / n) / (self.m2 / n).powf(1.5);
        Some((n * (n - 1.0)).sqrt() / (n - 2.0) * g1)
    }

    /// Bias-corrected excess kurtosis. Undefined below four values.
    pub fn kurtosis(&self) -> Option<f64> {
        if self.count < 4 {
            return None;
        }
        if self.is_degenerate() {
            return Some(0.0);
        }
        let n = self.count as f64;
        let numer = n * (n + 1.0) * (n - 1.0) * self.m4;
        let denom = (n - 2.0) * (n - 3.0) * self.m2 * self.m2;
        let adj = 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
        Some(numer / denom - adj)
    }
}

/// Sort a copy of the values ascending.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

/// Quantile of already-sorted values with linear interpolation.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

/// Pearson coefficient over rows where both sides are present.
///
/// `None` when fewer than two complete pairs exist or either side is constant.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}
