use serde::{Deserialize, Serialize};

/// Uniform binning between `lo` and `hi`
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Axis {
    pub n_bins: usize,
    pub lo: f64,
    pub hi: f64,
}

impl Axis {
    pub const fn new(n_bins: usize, lo: f64, hi: f64) -> Self {
        Self { n_bins, lo, hi }
    }

    /// Index into the bin contents
    ///
    /// Index 0 is the underflow, `n_bins + 1` the overflow bin. NaN goes
    /// to the overflow.
    pub fn index(&self, x: f64) -> usize {
        if x < self.lo {
            return 0;
        }
        if x >= self.hi || x.is_nan() {
            return self.n_bins + 1;
        }
        let pos = (x - self.lo) / (self.hi - self.lo) * self.n_bins as f64;
        // guard against rounding up to the upper edge
        (pos as usize).min(self.n_bins - 1) + 1
    }

    /// Number of bins including underflow and overflow
    fn len(&self) -> usize {
        self.n_bins + 2
    }
}

/// Weighted one-dimensional histogram
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Hist1 {
    pub title: String,
    pub axis: Axis,
    pub entries: u64,
    pub sum_w: Vec<f64>,
    pub sum_w2: Vec<f64>,
}

impl Hist1 {
    pub fn new(title: impl Into<String>, axis: Axis) -> Self {
        Self {
            title: title.into(),
            axis,
            entries: 0,
            sum_w: vec![0.; axis.len()],
            sum_w2: vec![0.; axis.len()],
        }
    }

    pub fn fill(&mut self, x: f64, w: f64) {
        let idx = self.axis.index(x);
        self.sum_w[idx] += w;
        self.sum_w2[idx] += w * w;
        self.entries += 1;
    }

    /// Sum of weights in bins between the under- and overflow
    pub fn integral(&self) -> f64 {
        self.sum_w[1..=self.axis.n_bins].iter().sum()
    }
}

/// Weighted two-dimensional histogram, contents stored row-major in `x`
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Hist2 {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub entries: u64,
    pub sum_w: Vec<f64>,
    pub sum_w2: Vec<f64>,
}

impl Hist2 {
    pub fn new(title: impl Into<String>, x_axis: Axis, y_axis: Axis) -> Self {
        let len = x_axis.len() * y_axis.len();
        Self {
            title: title.into(),
            x_axis,
            y_axis,
            entries: 0,
            sum_w: vec![0.; len],
            sum_w2: vec![0.; len],
        }
    }

    pub fn fill(&mut self, x: f64, y: f64, w: f64) {
        let idx = self.idx(self.x_axis.index(x), self.y_axis.index(y));
        self.sum_w[idx] += w;
        self.sum_w2[idx] += w * w;
        self.entries += 1;
    }

    /// Content of the bin containing `(x, y)`
    pub fn get(&self, x: f64, y: f64) -> f64 {
        self.sum_w[self.idx(self.x_axis.index(x), self.y_axis.index(y))]
    }

    fn idx(&self, ix: usize, iy: usize) -> usize {
        ix * self.y_axis.len() + iy
    }
}
