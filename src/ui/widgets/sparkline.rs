//! Response-time sparkline widget for inline visualization

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use uptime_checker::data::ResponseTime;

/// Block characters for different response times (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline widget showing response times, oldest sample on the left
pub struct ResponseSparkline {
    /// Sample values in chronological order
    values: Vec<f64>,
    /// Largest sample, used for normalization
    max_value: f64,
    /// Style for the sparkline
    style: Style,
    /// Style for the latest sample
    latest_style: Style,
}

impl ResponseSparkline {
    /// Builds a sparkline from API samples (which arrive newest first)
    pub fn new(samples: &[ResponseTime]) -> Self {
        let mut ordered: Vec<&ResponseTime> = samples.iter().collect();
        ordered.sort_by_key(|sample| sample.datetime);
        let values: Vec<f64> = ordered.iter().map(|sample| sample.value).collect();
        let max_value = values.iter().copied().fold(0.0, f64::max);

        Self {
            values,
            max_value,
            style: Style::default().fg(Color::Cyan),
            latest_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn value_to_block(&self, value: f64) -> char {
        if self.max_value <= 0.0 {
            return BLOCKS[0];
        }
        let normalized = (value / self.max_value).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl Widget for ResponseSparkline {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Keep the most recent samples when the area is narrow
        let width = area.width as usize;
        let skip = self.values.len().saturating_sub(width);
        let last = self.values.len().saturating_sub(1);

        for (i, value) in self.values.iter().enumerate().skip(skip) {
            let block = self.value_to_block(*value);
            let x = area.x + (i - skip) as u16;
            let y = area.y;

            let style = if i == last {
                self.latest_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}
