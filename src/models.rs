use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SHAFT_LENGTH: u32 = 200;
pub const DEFAULT_HEAD_RADIUS: f64 = 50.0;
pub const DEFAULT_BALL_RADIUS: f64 = 30.0;
pub const DEFAULT_BALL_OFFSET: f64 = 40.0;
pub const DEFAULT_BALL_RISE: f64 = 20.0;
pub const DEFAULT_STEP_SECS: f64 = 0.02;
pub const DEFAULT_APPROACH_SECS: f64 = 0.5;
pub const DEFAULT_SETTLE_SECS: f64 = 0.5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest whole pixel.
    pub fn to_pixel(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as f64, (self.height / 2) as f64)
    }

    pub fn is_corner(&self, (x, y): (i32, i32)) -> bool {
        let right = self.width as i32 - 1;
        let bottom = self.height as i32 - 1;
        (x <= 0 || x >= right) && (y <= 0 || y >= bottom)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    Approach,
    Shaft,
    Head,
    LeftBall,
    RightBall,
    Return,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub kind: StrokeKind,
    /// How long each move within the stroke takes.
    pub step: Duration,
    /// Pause after the last point.
    pub pause: Duration,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    pub strokes: Vec<Stroke>,
}

impl Pattern {
    #[cfg(test)]
    pub fn stroke(&self, kind: StrokeKind) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.kind == kind)
    }

    #[cfg(test)]
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.strokes.iter().flat_map(|s| s.points.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }

    /// Total time the pattern blocks for when played.
    pub fn duration(&self) -> Duration {
        self.strokes
            .iter()
            .map(|s| {
                s.step
                    .saturating_mul(s.points.len() as u32)
                    .saturating_add(s.pause)
            })
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PatternParams {
    pub shaft_length: u32,
    pub head_radius: f64,
    pub ball_radius: f64,
    pub ball_offset: f64,
    pub ball_rise: f64,
    pub step_secs: f64,
    pub approach_secs: f64,
    pub settle_secs: f64,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            shaft_length: DEFAULT_SHAFT_LENGTH,
            head_radius: DEFAULT_HEAD_RADIUS,
            ball_radius: DEFAULT_BALL_RADIUS,
            ball_offset: DEFAULT_BALL_OFFSET,
            ball_rise: DEFAULT_BALL_RISE,
            step_secs: DEFAULT_STEP_SECS,
            approach_secs: DEFAULT_APPROACH_SECS,
            settle_secs: DEFAULT_SETTLE_SECS,
        }
    }
}

impl PatternParams {
    /// Parameters that play instantly.
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            step_secs: 0.0,
            approach_secs: 0.0,
            settle_secs: 0.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_uses_integer_division() {
        let screen = ScreenSize {
            width: 1921,
            height: 1081,
        };
        assert_eq!(screen.center(), Point::new(960.0, 540.0));
    }

    #[test]
    fn test_is_corner() {
        let screen = ScreenSize {
            width: 1920,
            height: 1080,
        };
        assert!(screen.is_corner((0, 0)));
        assert!(screen.is_corner((1919, 0)));
        assert!(screen.is_corner((0, 1079)));
        assert!(screen.is_corner((1919, 1079)));
        assert!(screen.is_corner((-5, 2000)));
        assert!(!screen.is_corner((0, 500)));
        assert!(!screen.is_corner((960, 540)));
    }

    #[test]
    fn test_pattern_duration() {
        let pattern = Pattern {
            strokes: vec![
                Stroke {
                    kind: StrokeKind::Approach,
                    step: Duration::from_millis(500),
                    pause: Duration::from_millis(500),
                    points: vec![Point::new(1.0, 1.0)],
                },
                Stroke {
                    kind: StrokeKind::Shaft,
                    step: Duration::from_millis(20),
                    pause: Duration::ZERO,
                    points: vec![Point::new(1.0, 1.0); 10],
                },
            ],
        };
        assert_eq!(pattern.len(), 11);
        assert_eq!(pattern.duration(), Duration::from_millis(1200));
    }
}
