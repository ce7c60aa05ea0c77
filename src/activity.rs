use crate::models::PatternParams;
use crate::pattern::generate;
use crate::system::{Cursor, Pointer};
use anyhow::Result;
use chrono::{Local, NaiveTime};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Stop signal shared with the interrupt and terminate handler.
#[derive(Clone, Default)]
pub struct Shutdown {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleeps for `timeout` unless triggered first. Returns whether it was triggered.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Time-of-day window in which cycles run. An end before the start wraps past midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActiveHours {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl ActiveHours {
    pub fn contains(&self, t: NaiveTime) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => t >= start || t < end,
            (start, end) => start.map_or(true, |s| t >= s) && end.map_or(true, |e| t < e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub interval: Duration,
    pub once: bool,
    pub timeout: Option<Duration>,
    pub active_hours: ActiveHours,
    pub params: PatternParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Interrupted,
    TimedOut,
    SingleRun,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub cycles: u32,
    pub skipped: u32,
    pub elapsed: Duration,
    pub reason: StopReason,
}

enum Cycle {
    Completed,
    Interrupted,
}

pub struct ActivityLoop<P: Pointer> {
    pub cursor: Cursor<P>,
    pub options: RunOptions,
    shutdown: Shutdown,
}

impl<P: Pointer> ActivityLoop<P> {
    pub fn new(cursor: Cursor<P>, options: RunOptions, shutdown: Shutdown) -> Self {
        Self {
            cursor,
            options,
            shutdown,
        }
    }

    /// Runs cycles until interrupted, timed out, or after one cycle in single-run mode.
    /// Cursor failures end the run with an error.
    pub fn run(&mut self) -> Result<Session> {
        let started = Instant::now();
        let mut cycles = 0;
        let mut skipped = 0;

        let reason = loop {
            if self.shutdown.is_triggered() {
                break StopReason::Interrupted;
            }
            if self.options.timeout.is_some_and(|t| started.elapsed() >= t) {
                break StopReason::TimedOut;
            }

            let now = Local::now();
            if self.options.active_hours.contains(now.time()) {
                println!("Moving mouse at {}", now.format("%H:%M:%S"));
                match self.play_cycle()? {
                    Cycle::Completed => cycles += 1,
                    Cycle::Interrupted => break StopReason::Interrupted,
                }
            } else {
                println!("Outside active hours at {}, skipping", now.format("%H:%M:%S"));
                skipped += 1;
            }

            if self.options.once {
                break StopReason::SingleRun;
            }

            if let Some(timeout) = self.options.timeout {
                let remaining = timeout.saturating_sub(started.elapsed());
                if remaining < self.options.interval {
                    if self.shutdown.wait_timeout(remaining) {
                        break StopReason::Interrupted;
                    }
                    break StopReason::TimedOut;
                }
            }
            if self.shutdown.wait_timeout(self.options.interval) {
                break StopReason::Interrupted;
            }
        };

        Ok(Session {
            cycles,
            skipped,
            elapsed: started.elapsed(),
            reason,
        })
    }

    fn play_cycle(&mut self) -> Result<Cycle> {
        let screen = self.cursor.refresh_screen()?;
        let pattern = generate(screen, &self.options.params);
        log::debug!(
            "playing {} points on {}x{} screen",
            pattern.len(),
            screen.width,
            screen.height
        );

        for stroke in &pattern.strokes {
            for point in &stroke.points {
                if self.shutdown.is_triggered() {
                    return Ok(Cycle::Interrupted);
                }
                self.cursor.glide(*point, stroke.step)?;
            }
            if !stroke.pause.is_zero() && self.shutdown.wait_timeout(stroke.pause) {
                return Ok(Cycle::Interrupted);
            }
        }
        Ok(Cycle::Completed)
    }
}
