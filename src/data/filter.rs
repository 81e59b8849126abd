use serde::Serialize;

use super::model::Appearance;
use crate::error::InvalidArgument;

/// Plausible actor heights in meters, used to validate query bounds only.
pub const MIN_PLAUSIBLE_HEIGHT: f64 = 1.0;
pub const MAX_PLAUSIBLE_HEIGHT: f64 = 2.5;

/// Bin count of the height distribution chart.
pub const HISTOGRAM_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Gender selection. `"All"` disables the filter; any other value must match
/// [`Appearance::gender_label`] exactly, so `"Unknown"` selects rows without
/// a recorded gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderFilter<'a> {
    All,
    Only(&'a str),
}

impl<'a> GenderFilter<'a> {
    pub fn from_param(gender: &'a str) -> Self {
        if gender == "All" {
            GenderFilter::All
        } else {
            GenderFilter::Only(gender)
        }
    }

    fn accepts(&self, row: &Appearance) -> bool {
        match self {
            GenderFilter::All => true,
            GenderFilter::Only(g) => row.gender_label() == *g,
        }
    }
}

/// A validated, inclusive height range inside the plausible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightWindow {
    min: f64,
    max: f64,
}

impl HeightWindow {
    pub fn new(min: f64, max: f64) -> Result<Self, InvalidArgument> {
        if !min.is_finite() {
            return Err(InvalidArgument::NonFiniteHeight {
                name: "min_height",
                value: min,
            });
        }
        if !max.is_finite() {
            return Err(InvalidArgument::NonFiniteHeight {
                name: "max_height",
                value: max,
            });
        }
        if min < MIN_PLAUSIBLE_HEIGHT || max > MAX_PLAUSIBLE_HEIGHT {
            return Err(InvalidArgument::HeightOutOfRange { min, max });
        }
        if min >= max {
            return Err(InvalidArgument::InvertedHeightWindow { min, max });
        }
        Ok(HeightWindow { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, height: f64) -> bool {
        height >= self.min && height <= self.max
    }
}

/// Rows passing both filters. Rows without a height never pass.
pub fn filter_appearances<'a>(
    rows: &'a [Appearance],
    gender: GenderFilter<'_>,
    window: HeightWindow,
) -> Vec<&'a Appearance> {
    rows.iter()
        .filter(|row| gender.accepts(row))
        .filter(|row| row.height.is_some_and(|h| window.contains(h)))
        .collect()
}

// ---------------------------------------------------------------------------
// Height histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Chart data for the height distribution. Empty means "No Data".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeightHistogram {
    pub bins: Vec<HistogramBin>,
}

impl HeightHistogram {
    /// Equal-width bins over the observed range; the last bin is closed.
    /// A degenerate range is widened to ±0.5 around the single value.
    pub fn from_heights(heights: &[f64], bins: usize) -> Self {
        if heights.is_empty() || bins == 0 {
            return HeightHistogram::default();
        }

        let mut lo = heights.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = heights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for &h in heights {
            let idx = (((h - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: lo + width * i as f64,
                upper: lo + width * (i + 1) as f64,
                count,
            })
            .collect();
        HeightHistogram { bins }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
