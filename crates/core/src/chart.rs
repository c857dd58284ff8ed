use crate::domain::summary::SeriesPoint;

/// Fixed virtual canvas that sparklines are drawn into (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 60.0,
            margin: 4.0,
        }
    }
}

/// Maps ordered samples to plot coordinates.
///
/// x is spaced by index, not by date gaps. y is inverted so larger values sit higher on the
/// canvas. A flat series lands on the vertical center and a single point on the left margin.
pub fn normalize(points: &[SeriesPoint], width: f64, height: f64, margin: f64) -> Vec<(f64, f64)> {
    if points.is_empty() {
        return Vec::new();
    }

    let n = points.len();
    let step = if n <= 1 {
        width
    } else {
        (width - 2.0 * margin) / (n - 1) as f64
    };

    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        });
    let flat = max == min;
    let span = if flat { 1.0 } else { max - min };
    let drawable = height - 2.0 * margin;

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = margin + i as f64 * step;
            let y = if flat {
                height / 2.0
            } else {
                height - margin - ((p.value - min) / span) * drawable
            };
            (x, y)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline {
    pub title: String,
    pub points: Vec<(f64, f64)>,
}

impl Sparkline {
    pub fn new(title: impl Into<String>, series: &[SeriesPoint], canvas: Canvas) -> Self {
        Self {
            title: title.into(),
            points: normalize(series, canvas.width, canvas.height, canvas.margin),
        }
    }

    /// `x,y x,y ...`, ready for a polyline `points` attribute.
    pub fn polyline(&self) -> String {
        self.points
            .iter()
            .map(|(x, y)| format!("{},{}", round2(*x), round2(*y)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> Vec<SeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint {
                date: start + chrono::Duration::days(i as i64),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn empty_input_gives_no_points() {
        assert!(normalize(&[], 240.0, 60.0, 4.0).is_empty());
    }

    #[test]
    fn single_point_sits_on_left_margin() {
        let pts = normalize(&series(&[42.0]), 240.0, 60.0, 4.0);
        assert_eq!(pts.len(), 1);
        assert_eq!(pts[0].0, 4.0);
        assert!(pts[0].1.is_finite());
    }

    #[test]
    fn flat_series_is_vertically_centered() {
        let pts = normalize(&series(&[7.0, 7.0, 7.0, 7.0]), 240.0, 60.0, 4.0);
        assert_eq!(pts.len(), 4);
        assert!(pts.iter().all(|(_, y)| *y == 30.0));
    }

    #[test]
    fn extremes_hit_the_margins_and_y_is_inverted() {
        let pts = normalize(&series(&[0.0, 5.0, 10.0]), 240.0, 60.0, 4.0);
        assert_eq!(pts[0], (4.0, 56.0));
        assert_eq!(pts[1], (120.0, 30.0));
        assert_eq!(pts[2], (236.0, 4.0));
    }

    #[test]
    fn y_stays_within_margins_and_length_is_preserved() {
        let values = [3.0, -8.5, 100.0, 42.0, 0.0, 99.9, -8.5, 17.25];
        let pts = normalize(&series(&values), 240.0, 60.0, 4.0);
        assert_eq!(pts.len(), values.len());
        for (_, y) in &pts {
            assert!((4.0..=56.0).contains(y), "y={y} out of range");
        }
        assert!(pts.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn polyline_renders_point_list() {
        let line = Sparkline::new("Daily Revenue", &series(&[0.0, 10.0]), Canvas::default());
        assert_eq!(line.polyline(), "4,56 236,4");
    }
}
