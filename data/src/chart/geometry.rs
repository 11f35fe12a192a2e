use serde::{Deserialize, Serialize};

/// Square neighbourhood, in pixels, within which a click targets a point.
pub const HIT_TOLERANCE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Outer margin on every side.
    pub padding: f32,
    /// Extra room left of the plot for value labels.
    pub label_padding: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            padding: 40.0,
            label_padding: 40.0,
        }
    }
}

/// Layout metrics of one render pass.
///
/// Hit-testing must resolve against the snapshot of the pass that produced
/// what is on screen, never against a freshly computed one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub min: f64,
    pub max: f64,
    /// Always positive; flat series get a synthetic range.
    pub range: f64,
    pub origin_x: f32,
    pub origin_y: f32,
    pub plot_width: f32,
    pub plot_height: f32,
    /// Number of points the snapshot was laid out for.
    pub len: usize,
}

impl Geometry {
    /// `None` when no value is usable, callers draw a "no data" state instead.
    pub fn compute(values: &[f64], width: f32, height: f32, margins: Margins) -> Option<Self> {
        let (min, max) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        let mut range = max - min;
        if range == 0.0 {
            range = max * 0.1 + 1.0;
        }

        Some(Self {
            min,
            max,
            range,
            origin_x: margins.padding + margins.label_padding,
            origin_y: margins.padding,
            plot_width: width - 2.0 * margins.padding - margins.label_padding,
            plot_height: height - 2.0 * margins.padding,
            len: values.len(),
        })
    }

    pub fn x(&self, index: usize) -> f32 {
        let denom = self.len.saturating_sub(1).max(1) as f64;
        let offset = (index as f64 / denom * f64::from(self.plot_width)).round();

        self.origin_x + offset as f32
    }

    pub fn y(&self, value: f64) -> f32 {
        let offset = ((self.max - value) / self.range * f64::from(self.plot_height)).round();

        self.origin_y + offset as f32
    }

    /// Right edge of the plot area.
    pub fn right(&self) -> f32 {
        self.origin_x + self.plot_width
    }

    /// Bottom edge of the plot area, where the time axis sits.
    pub fn bottom(&self) -> f32 {
        self.origin_y + self.plot_height
    }

    /// First index, left to right, whose point lies within [`HIT_TOLERANCE`] of
    /// `(x, y)` on both axes.
    pub fn hit_test(&self, values: &[f64], x: f32, y: f32) -> Option<usize> {
        values
            .iter()
            .take(self.len)
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .find(|(i, v)| {
                (x - self.x(*i)).abs() <= HIT_TOLERANCE && (y - self.y(**v)).abs() <= HIT_TOLERANCE
            })
            .map(|(i, _)| i)
    }

    /// Evenly spaced values from `max` down to `max - range`, both ends included.
    pub fn value_ticks(&self, divisions: usize) -> Vec<f64> {
        let divisions = divisions.max(1);

        (0..=divisions)
            .map(|k| self.max - self.range * k as f64 / divisions as f64)
            .collect()
    }
}
