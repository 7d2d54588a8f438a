use std::fmt;

/// Summary of an `f32` sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Upper median for even-sized samples.
    pub median: f32,
    /// Population standard deviation.
    pub std_dev: f32,
    /// `std_dev / (max - min)`, or 0 when every value is the same.
    pub normalized_std_dev: f32,
}

impl DescriptiveStats {
    /// Summarizes `values`, or returns `None` for an empty sample.
    ///
    /// NaN values sort after every number and therefore show up in `max`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use oxello_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([4.0, -2.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.count, 4);
    /// assert_eq!(stats.min, -2.0);
    /// assert_eq!(stats.max, 4.0);
    /// assert_eq!(stats.mean, 1.5);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let count = values.len();
        let n = count as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        let std_dev = variance.sqrt();
        let range = max - min;
        let normalized_std_dev = if range > 0.0 { std_dev / range } else { 0.0 };

        Some(Self {
            count,
            min,
            max,
            mean,
            median: values[count / 2],
            std_dev,
            normalized_std_dev,
        })
    }
}

impl fmt::Display for DescriptiveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(3);
        write!(
            f,
            "min={:.p$} mean={:.p$} max={:.p$} sd={:.p$}",
            self.min,
            self.mean,
            self.max,
            self.std_dev,
            p = precision
        )
    }
}
