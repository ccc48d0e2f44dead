//! Band and linear scales.
//!
//! Both scales are rebuilt for every render from the aggregates being drawn.

use std::collections::HashMap;
use std::hash::Hash;

/// Maps distinct keys to equal-width slots along a pixel range.
///
/// Padding is applied both between bands and at the two ends, and the bands
/// are centred within the range.
#[derive(Debug, Clone)]
pub struct BandScale<K> {
    domain: Vec<K>,
    index: HashMap<K, usize>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl<K: Clone + Eq + Hash> BandScale<K> {
    /// Build a scale over `keys` (duplicates dropped, first position kept).
    pub fn new(keys: impl IntoIterator<Item = K>, range: (f64, f64), padding: f64) -> Self {
        let mut domain = Vec::new();
        let mut index = HashMap::new();
        for key in keys {
            if !index.contains_key(&key) {
                index.insert(key.clone(), domain.len());
                domain.push(key);
            }
        }

        let (lo, hi) = if range.1 < range.0 {
            (range.1, range.0)
        } else {
            range
        };
        #[allow(clippy::cast_precision_loss)]
        let n = domain.len() as f64;
        let step = (hi - lo) / (n - padding + padding * 2.0).max(1.0);
        let start = lo + (hi - lo - step * (n - padding)) * 0.5;

        Self {
            domain,
            index,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of the band for `key`, if it is in the domain.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn map(&self, key: &K) -> Option<f64> {
        self.index
            .get(key)
            .map(|&i| self.start + self.step * i as f64)
    }

    /// Centre of the band for `key`.
    #[must_use]
    pub fn center(&self, key: &K) -> Option<f64> {
        self.map(key).map(|x| x + self.bandwidth / 2.0)
    }

    /// Width of each band.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Distance between the starts of adjacent bands.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Keys in band order.
    #[must_use]
    pub fn domain(&self) -> &[K] {
        &self.domain
    }
}

/// Maps a numeric domain linearly onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a scale from `domain` to `range`.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Value scale for bar heights: `[0, max]` onto `[height, 0]`.
    #[must_use]
    pub fn for_values(max: f64, height: f64) -> Self {
        Self::new((0.0, max.max(0.0)), (height, 0.0))
    }

    /// Map a domain value into the range.
    ///
    /// An empty domain (both ends equal) maps everything to the range start.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() < f64::EPSILON {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// The scale's domain.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Roughly `count` round tick values spanning the domain.
    ///
    /// Steps are 1, 2 or 5 times a power of ten.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if (hi - lo).abs() < f64::EPSILON {
            return vec![lo];
        }

        let increment = tick_increment(lo, hi, count);
        let first = (lo / increment).ceil();
        let last = (hi / increment).floor();
        let mut ticks = Vec::new();
        let mut i = first;
        while i <= last {
            // Multiply from the integer index to avoid accumulating error
            ticks.push(round_to_increment(i * increment, increment));
            i += 1.0;
        }
        ticks
    }
}

fn tick_increment(lo: f64, hi: f64, count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let raw = (hi - lo) / count as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

fn round_to_increment(value: f64, increment: f64) -> f64 {
    if increment >= 1.0 {
        value.round()
    } else {
        let digits = -increment.log10().floor();
        let scale = 10f64.powf(digits);
        (value * scale).round() / scale
    }
}
