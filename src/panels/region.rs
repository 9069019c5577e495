/// A named area of the page whose content a panel owns.
pub trait Region: Send + Sync {
    /// Replaces the region's entire content.
    fn set_html(&self, markup: &str);
}

/// Bar chart handed to the host's charting library.
#[derive(Clone, Debug, PartialEq)]
pub struct BarChart {
    pub dataset_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub color: String,
}

/// Draws charts; the charting library itself lives outside this crate.
pub trait ChartSink: Send + Sync {
    fn draw_bar_chart(&self, chart: &BarChart);
}
