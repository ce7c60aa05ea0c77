use crate::activity::{Session, StopReason};
use crate::models::{Pattern, Point, ScreenSize, StrokeKind};
use crate::utils::format_duration;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

pub fn write_system_info(
    out: &mut impl Write,
    screen: ScreenSize,
    (x, y): (i32, i32),
) -> Result<()> {
    writeln!(out, "=== nudge ===")?;
    writeln!(out, "Screen size: {}x{}", screen.width, screen.height)?;
    writeln!(out, "Current mouse position: ({}, {})", x, y)?;
    writeln!(out, "=============")?;
    Ok(())
}

pub fn print_banner(interval: Duration) {
    println!("Starting mouse activity simulation...");
    println!("Mouse will move every {}", format_duration(interval));
    println!("Press Ctrl+C to stop");
}

pub fn print_summary(session: &Session) {
    match session.reason {
        StopReason::Interrupted => println!("\nStopping mouse movement script"),
        StopReason::TimedOut => println!("\nTimeout reached, stopping mouse movement script"),
        StopReason::SingleRun => {}
    }
    println!(
        "Ran {} cycle(s) over {}",
        session.cycles,
        format_duration(session.elapsed)
    );
    if session.skipped > 0 {
        println!("Skipped {} cycle(s) outside active hours", session.skipped);
    }
}

#[derive(Serialize)]
struct StrokeDump<'a> {
    kind: StrokeKind,
    step_secs: f64,
    points: &'a [Point],
}

/// Writes the coordinate sequence of `pattern`, one stroke per block, or as JSON.
pub fn write_pattern(out: &mut impl Write, pattern: &Pattern, json: bool) -> Result<()> {
    if json {
        let dump: Vec<_> = pattern
            .strokes
            .iter()
            .map(|s| StrokeDump {
                kind: s.kind,
                step_secs: s.step.as_secs_f64(),
                points: &s.points,
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &dump)?;
        writeln!(out)?;
        return Ok(());
    }

    for stroke in &pattern.strokes {
        writeln!(out, "{:?} ({} points)", stroke.kind, stroke.points.len())?;
        for point in &stroke.points {
            let (x, y) = point.to_pixel();
            writeln!(out, "  {} {}", x, y)?;
        }
    }
    writeln!(
        out,
        "Total: {} points, {:.2}s per cycle",
        pattern.len(),
        pattern.duration().as_secs_f64()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatternParams;
    use crate::pattern::generate;

    fn pattern() -> Pattern {
        generate(
            ScreenSize {
                width: 800,
                height: 600,
            },
            &PatternParams::default(),
        )
    }

    #[test]
    fn test_write_system_info() -> Result<()> {
        let mut out = Vec::new();
        let screen = ScreenSize {
            width: 2560,
            height: 1440,
        };
        write_system_info(&mut out, screen, (12, 34))?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Screen size: 2560x1440\n"));
        assert!(text.contains("Current mouse position: (12, 34)\n"));
        Ok(())
    }

    #[test]
    fn test_write_pattern_text() -> Result<()> {
        let mut out = Vec::new();
        write_pattern(&mut out, &pattern(), false)?;
        let text = String::from_utf8(out)?;

        assert!(text.starts_with("Approach (1 points)\n  400 300\n"));
        assert!(text.contains("Shaft (200 points)"));
        assert!(text.contains("Head (37 points)"));
        assert!(text.contains("Total: 313 points"));
        Ok(())
    }

    #[test]
    fn test_write_pattern_json() -> Result<()> {
        let mut out = Vec::new();
        write_pattern(&mut out, &pattern(), true)?;
        let value: serde_json::Value = serde_json::from_slice(&out)?;

        let strokes = value.as_array().unwrap();
        assert_eq!(strokes.len(), 6);
        assert_eq!(strokes[1]["kind"], "Shaft");
        assert_eq!(strokes[1]["points"].as_array().unwrap().len(), 200);
        assert_eq!(strokes[0]["points"][0]["x"], 400.0);
        Ok(())
    }
}
