use std::fmt::Write as _;
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct HistogramBin {
    /// Half-open except for the last bin, which includes its upper edge.
    pub range: Range<f64>,
    pub count: u64,
}

/// Equal-width histogram over the finite values of a null distribution.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Builds `num_bins` equal-width bins spanning the finite values. A
    /// constant sample gets a unit-wide range centred on its value.
    #[must_use]
    pub fn new(values: &[f64], num_bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || num_bins == 0 {
            return None;
        }
        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / num_bins as f64;

        let mut bins: Vec<HistogramBin> = (0..num_bins)
            .map(|i| {
                let start = lo + width * i as f64;
                let end = if i + 1 == num_bins { hi } else { start + width };
                HistogramBin {
                    range: start..end,
                    count: 0,
                }
            })
            .collect();

        for v in finite {
            bins[bin_index(v, lo, width, num_bins)].count += 1;
        }

        Some(Self { bins })
    }

    /// Index of the bin holding `value`, if it falls inside the histogram.
    #[must_use]
    pub fn locate(&self, value: f64) -> Option<usize> {
        let first = self.bins.first()?;
        let last = self.bins.last()?;
        if !value.is_finite() || value < first.range.start || value > last.range.end {
            return None;
        }
        let width = first.range.end - first.range.start;
        Some(bin_index(value, first.range.start, width, self.bins.len()))
    }

    /// Renders one row per bin with a bar scaled to `bar_width` characters.
    /// The bin containing `marker` is flagged, mirroring the dashed line of a
    /// plotted histogram.
    #[must_use]
    pub fn render(&self, marker: Option<f64>, bar_width: usize) -> String {
        let peak = self.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        let marked = marker.and_then(|m| self.locate(m));
        let mut out = String::new();

        for (i, bin) in self.bins.iter().enumerate() {
            let len = (bin.count as f64 / peak as f64 * bar_width as f64).round() as usize;
            let flag = if marked == Some(i) { " <- observed" } else { "" };
            let _ = writeln!(
                out,
                "{:>9.3} .. {:<9.3} | {:<bar$} {:>5}{}",
                bin.range.start,
                bin.range.end,
                "#".repeat(len),
                bin.count,
                flag,
                bar = bar_width
            );
        }
        if let Some(m) = marker {
            if marked.is_none() {
                let _ = writeln!(out, "observed {m:.3} lies outside the null range");
            }
        }
        out
    }
}

fn bin_index(value: f64, lo: f64, width: f64, num_bins: usize) -> usize {
    if width <= 0.0 {
        return 0;
    }
    let idx = ((value - lo) / width).floor();
    if idx < 0.0 {
        0
    } else {
        (idx as usize).min(num_bins - 1)
    }
}
