use crate::models::{Point, ScreenSize};
use enigo::{Coordinate, Enigo, Mouse, Settings};
use log::{debug, trace};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Moves shorter than this are a single jump.
pub const MIN_GLIDE: Duration = Duration::from_millis(100);
/// Interval between intermediate positions of a glide.
pub const GLIDE_TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("could not connect to the input backend: {0}")]
    Connect(#[from] enigo::NewConError),
    #[error("input backend failed: {0}")]
    Input(#[from] enigo::InputError),
    #[error("fail-safe triggered: pointer moved to a screen corner at ({x}, {y})")]
    FailSafe { x: i32, y: i32 },
    #[error("screen reported an invalid size {width}x{height}")]
    InvalidScreen { width: i32, height: i32 },
}

pub type CursorResult<T> = Result<T, CursorError>;

/// The host pointer.
pub trait Pointer {
    fn screen_size(&self) -> CursorResult<ScreenSize>;
    fn location(&self) -> CursorResult<(i32, i32)>;
    fn move_to(&mut self, x: i32, y: i32) -> CursorResult<()>;
}

pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> CursorResult<Self> {
        let enigo = Enigo::new(&Settings::default())?;
        Ok(Self { enigo })
    }
}

impl Pointer for EnigoPointer {
    fn screen_size(&self) -> CursorResult<ScreenSize> {
        let (width, height) = self.enigo.main_display()?;
        if width <= 0 || height <= 0 {
            return Err(CursorError::InvalidScreen { width, height });
        }
        Ok(ScreenSize {
            width: width as u32,
            height: height as u32,
        })
    }

    fn location(&self) -> CursorResult<(i32, i32)> {
        Ok(self.enigo.location()?)
    }

    fn move_to(&mut self, x: i32, y: i32) -> CursorResult<()> {
        self.enigo.move_mouse(x, y, Coordinate::Abs)?;
        Ok(())
    }
}

/// Wraps a pointer with the corner guard and timed moves.
pub struct Cursor<P: Pointer> {
    pointer: P,
    screen: ScreenSize,
    fail_safe: bool,
    /// Where this cursor last put the pointer.
    last_target: Option<(i32, i32)>,
}

impl<P: Pointer> Cursor<P> {
    pub fn new(pointer: P, fail_safe: bool) -> CursorResult<Self> {
        let screen = pointer.screen_size()?;
        Ok(Self {
            pointer,
            screen,
            fail_safe,
            last_target: None,
        })
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Re-reads the screen size, in case the display changed between cycles.
    pub fn refresh_screen(&mut self) -> CursorResult<ScreenSize> {
        self.screen = self.pointer.screen_size()?;
        Ok(self.screen)
    }

    pub fn location(&self) -> CursorResult<(i32, i32)> {
        self.pointer.location()
    }

    #[cfg(test)]
    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    fn check_fail_safe(&self) -> CursorResult<()> {
        if !self.fail_safe {
            return Ok(());
        }
        let (x, y) = self.pointer.location()?;
        // A corner the pattern itself reached is not the user's doing.
        if self.last_target == Some((x, y)) {
            return Ok(());
        }
        if self.screen.is_corner((x, y)) {
            return Err(CursorError::FailSafe { x, y });
        }
        Ok(())
    }

    /// Moves to `target` over `duration`, blocking until done.
    pub fn glide(&mut self, target: Point, duration: Duration) -> CursorResult<()> {
        self.check_fail_safe()?;
        let (x, y) = self.clamp(target.to_pixel());

        if duration < MIN_GLIDE {
            trace!("jump to ({x}, {y})");
            self.move_to(x, y)?;
            if !duration.is_zero() {
                thread::sleep(duration);
            }
            return Ok(());
        }

        let (from_x, from_y) = self.pointer.location()?;
        let steps = glide_steps(duration);
        let tick = duration / steps;
        debug!("glide from ({from_x}, {from_y}) to ({x}, {y}) in {steps} steps");

        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let step_x = from_x as f64 + (x - from_x) as f64 * t;
            let step_y = from_y as f64 + (y - from_y) as f64 * t;
            self.check_fail_safe()?;
            self.move_to(step_x.round() as i32, step_y.round() as i32)?;
            thread::sleep(tick);
        }
        Ok(())
    }

    /// Keeps a target on screen, the way the OS would clamp it.
    fn clamp(&self, (x, y): (i32, i32)) -> (i32, i32) {
        let right = self.screen.width as i32 - 1;
        let bottom = self.screen.height as i32 - 1;
        (x.clamp(0, right), y.clamp(0, bottom))
    }

    fn move_to(&mut self, x: i32, y: i32) -> CursorResult<()> {
        self.pointer.move_to(x, y)?;
        self.last_target = Some((x, y));
        Ok(())
    }
}

/// Number of ticks a glide over `duration` takes.
fn glide_steps(duration: Duration) -> u32 {
    let steps = duration.as_nanos().div_ceil(GLIDE_TICK.as_nanos()).max(1);
    u32::try_from(steps).unwrap_or(u32::MAX)
}
