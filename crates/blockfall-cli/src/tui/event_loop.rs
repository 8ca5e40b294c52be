use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state management.
///
/// Produces ticks at a fixed interval, each reporting the wall time measured
/// since the previous one, and renders after state changes no more often than
/// the render interval allows.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_interval: Duration,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl EventLoop {
    /// Creates an event loop with ticks disabled and unthrottled rendering.
    fn new(now: Instant) -> Self {
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            tick_interval: None,
            render_interval: Duration::ZERO,
            last_tick: now,
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    /// Sets the tick interval.
    ///
    /// Pass `None` to disable tick events. The elapsed time reported by the
    /// next tick is measured from now.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.last_tick = Instant::now();
    }

    /// Sets the minimum interval between two renders.
    pub(super) fn set_render_interval(&mut self, interval: Duration) {
        self.render_interval = interval;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event occurs.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(elapsed) = self.take_tick(now) {
                return Ok(TuiEvent::Tick(elapsed));
            }
            if self.take_render(now) {
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn take_tick(&mut self, now: Instant) -> Option<Duration> {
        let interval = self.tick_interval?;
        let elapsed = now.saturating_duration_since(self.last_tick);
        if elapsed < interval {
            return None;
        }
        self.last_tick = now;
        self.dirty = true;
        Some(elapsed)
    }

    fn take_render(&mut self, now: Instant) -> bool {
        if !self.dirty || now.saturating_duration_since(self.last_render) < self.render_interval {
            return false;
        }
        self.last_render = now;
        self.dirty = false;
        true
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = self.dirty.then(|| self.last_render + self.render_interval);
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
