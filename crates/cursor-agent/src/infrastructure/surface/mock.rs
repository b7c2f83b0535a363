//! Mock overlay surface for unit and integration testing.
//!
//! Records every mutation together with the name of the thread it ran on, so
//! tests can assert both *what* was rendered and *where* it was rendered.
//! Faults and delays can be queued for upcoming calls.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use cursor_core::Point;

use super::OverlaySurface;
use crate::infrastructure::ui_executor::UiFault;

/// One recorded mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceCall {
    Show(Point),
    Move(Point),
    Hide,
}

/// A mock implementation of [`OverlaySurface`].
#[derive(Default)]
pub struct MockOverlaySurface {
    calls: Mutex<Vec<(SurfaceCall, Option<String>)>>,
    faults: Mutex<VecDeque<String>>,
    delays: Mutex<VecDeque<Duration>>,
}

impl MockOverlaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call fail with [`UiFault::Refused`] carrying `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.faults
            .lock()
            .expect("lock poisoned")
            .push_back(reason.into());
    }

    /// Makes the next call block the UI thread for `delay` before completing.
    pub fn delay_next(&self, delay: Duration) {
        self.delays.lock().expect("lock poisoned").push_back(delay);
    }

    /// Returns all successful calls in the order they were rendered.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(|(call, _)| *call)
            .collect()
    }

    /// Returns the thread names the successful calls ran on.
    pub fn call_threads(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Returns the last successfully rendered call, if any.
    pub fn last_call(&self) -> Option<SurfaceCall> {
        self.calls.lock().expect("lock poisoned").last().map(|(c, _)| *c)
    }

    fn record(&self, call: SurfaceCall) -> Result<(), UiFault> {
        let delay = self.delays.lock().expect("lock poisoned").pop_front();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        let fault = self.faults.lock().expect("lock poisoned").pop_front();
        if let Some(reason) = fault {
            return Err(UiFault::Refused(reason));
        }

        let thread_name = thread::current().name().map(str::to_string);
        self.calls
            .lock()
            .expect("lock poisoned")
            .push((call, thread_name));
        Ok(())
    }
}

impl OverlaySurface for MockOverlaySurface {
    fn show(&self, at: Point) -> Result<(), UiFault> {
        self.record(SurfaceCall::Show(at))
    }

    fn move_to(&self, at: Point) -> Result<(), UiFault> {
        self.record(SurfaceCall::Move(at))
    }

    fn hide(&self) -> Result<(), UiFault> {
        self.record(SurfaceCall::Hide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_in_order() {
        // Arrange
        let surface = MockOverlaySurface::new();

        // Act
        surface.show(Point::ORIGIN).unwrap();
        surface.move_to(Point::new(3.0, 4.0)).unwrap();
        surface.hide().unwrap();

        // Assert
        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::Show(Point::ORIGIN),
                SurfaceCall::Move(Point::new(3.0, 4.0)),
                SurfaceCall::Hide,
            ]
        );
    }

    #[test]
    fn test_mock_fault_applies_to_next_call_only() {
        let surface = MockOverlaySurface::new();
        surface.fail_next("compositor busy");

        let first = surface.show(Point::ORIGIN);
        let second = surface.show(Point::ORIGIN);

        assert_eq!(first, Err(UiFault::Refused("compositor busy".into())));
        assert!(second.is_ok());
        assert_eq!(surface.calls().len(), 1, "failed call must not be recorded");
    }

    #[test]
    fn test_mock_records_thread_name() {
        let surface = MockOverlaySurface::new();
        thread::scope(|s| {
            thread::Builder::new()
                .name("named-caller".into())
                .spawn_scoped(s, || surface.hide().unwrap())
                .unwrap();
        });
        assert_eq!(surface.call_threads(), vec![Some("named-caller".to_string())]);
    }
}
