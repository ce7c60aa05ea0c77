use crate::models::{Pattern, PatternParams, Point, ScreenSize, Stroke, StrokeKind};
use std::time::Duration;

pub const HEAD_STEP_DEG: usize = 5;
pub const BALL_STEP_DEG: usize = 10;

/// Builds the full pattern for one cycle, centred on the screen midpoint.
pub fn generate(screen: ScreenSize, params: &PatternParams) -> Pattern {
    let center = screen.center();
    let step = secs(params.step_secs);
    let approach = secs(params.approach_secs);

    let shaft = (0..params.shaft_length)
        .map(|i| Point::new(center.x, center.y + i as f64))
        .collect();

    let head_center = Point::new(center.x, center.y + params.shaft_length as f64);
    let left_center = Point::new(center.x - params.ball_offset, center.y - params.ball_rise);
    let right_center = Point::new(center.x + params.ball_offset, center.y - params.ball_rise);

    let strokes = vec![
        Stroke {
            kind: StrokeKind::Approach,
            step: approach,
            pause: secs(params.settle_secs),
            points: vec![center],
        },
        Stroke {
            kind: StrokeKind::Shaft,
            step,
            pause: Duration::ZERO,
            points: shaft,
        },
        Stroke {
            kind: StrokeKind::Head,
            step,
            pause: Duration::ZERO,
            points: arc(head_center, params.head_radius, 180, HEAD_STEP_DEG),
        },
        Stroke {
            kind: StrokeKind::LeftBall,
            step,
            pause: Duration::ZERO,
            points: arc(left_center, params.ball_radius, 360, BALL_STEP_DEG),
        },
        Stroke {
            kind: StrokeKind::RightBall,
            step,
            pause: Duration::ZERO,
            points: arc(right_center, params.ball_radius, 360, BALL_STEP_DEG),
        },
        Stroke {
            kind: StrokeKind::Return,
            step: approach,
            pause: Duration::ZERO,
            points: vec![center],
        },
    ];

    Pattern { strokes }
}

/// Samples from 0° up to and including `sweep` degrees.
fn arc(center: Point, radius: f64, sweep: usize, step: usize) -> Vec<Point> {
    (0..=sweep)
        .step_by(step)
        .map(|deg| {
            let rad = (deg as f64).to_radians();
            Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
        })
        .collect()
}

/// Out-of-range values saturate. Config loading rejects them before they get here.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or(Duration::MAX)
}
