//! Running means and univariate sample statistics.

use crate::error::CcrError;
use serde::Serialize;

/// Folds `sample` into the running element-wise `mean` of `count` samples.
///
/// `count` includes `sample`. Uses `mean += (x - mean) / count`, so a run of
/// identical samples leaves the mean bit-for-bit equal to the sample.
pub(crate) fn update_mean(mean: &mut [f64], sample: &[f64], count: usize) {
    let k = count as f64;
    for (m, &x) in mean.iter_mut().zip(sample) {
        *m += (x - *m) / k;
    }
}

/// Welford accumulator for count, mean, variance and extrema.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunningStatistics {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStatistics {
    pub(crate) fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub(crate) fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Sample variance; zero for fewer than two samples.
    pub(crate) fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }
}

/// Summary statistics of one sample, e.g. one exposure flavour at one vertex
/// across the scenario ensemble.
///
/// `quantile` is the nearest-rank value at `quantile_level`; for a positive
/// exposure flavour this is the potential future exposure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnivariateStatistics {
    count: usize,
    mean: f64,
    variance: f64,
    std_dev: f64,
    min: f64,
    max: f64,
    quantile_level: f64,
    quantile: f64,
}

impl UnivariateStatistics {
    /// Computes statistics of `samples` with the upper quantile at
    /// `quantile_level` (clamped to [0, 1]).
    ///
    /// # Errors
    ///
    /// [`CcrError::Empty`] if `samples` is empty.
    pub fn from_samples(samples: &[f64], quantile_level: f64) -> Result<Self, CcrError> {
        if samples.is_empty() {
            return Err(CcrError::Empty("samples"));
        }

        let mut running = RunningStatistics::new();
        for &x in samples {
            running.push(x);
        }

        let quantile_level = quantile_level.clamp(0.0, 1.0);
        let n = samples.len();
        let idx = (((n as f64 - 1.0) * quantile_level).round() as usize).min(n - 1);
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let variance = running.variance();
        Ok(Self {
            count: n,
            mean: running.mean,
            variance,
            std_dev: variance.sqrt(),
            min: running.min,
            max: running.max,
            quantile_level,
            quantile: sorted[idx],
        })
    }

    /// Number of samples.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n − 1 denominator); zero for a single sample.
    #[inline]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Sample standard deviation.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Smallest sample.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest sample.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Level of [`UnivariateStatistics::quantile`].
    #[inline]
    pub fn quantile_level(&self) -> f64 {
        self.quantile_level
    }

    /// Nearest-rank quantile at [`UnivariateStatistics::quantile_level`].
    #[inline]
    pub fn quantile(&self) -> f64 {
        self.quantile
    }
}
