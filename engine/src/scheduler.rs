//! Debounced redraw scheduling.
//!
//! At most one redraw is ever pending. Each request pushes that single
//! deadline out to `now + window`, so a burst of mutations collapses into one
//! frame drawn `window` after the last of them.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    window: Duration,
    deadline: Option<Instant>,
}

impl RedrawScheduler {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn request(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending redraw if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::RedrawScheduler;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn idle_scheduler_never_fires() {
        let mut scheduler = RedrawScheduler::new(WINDOW);
        assert!(!scheduler.poll(Instant::now() + WINDOW * 10));
        assert_eq!(scheduler.deadline(), None);
    }

    #[test]
    fn burst_collapses_into_one_redraw() {
        let mut scheduler = RedrawScheduler::new(WINDOW);
        let start = Instant::now();
        let mut fired = 0;
        for ms in 0..10 {
            let now = start + Duration::from_millis(ms);
            scheduler.request(now);
            if scheduler.poll(now) {
                fired += 1;
            }
        }
        let last = start + Duration::from_millis(9);
        assert_eq!(scheduler.deadline(), Some(last + WINDOW));

        let mut now = last;
        while now < last + WINDOW * 3 {
            if scheduler.poll(now) {
                fired += 1;
            }
            now += Duration::from_millis(5);
        }
        assert_eq!(fired, 1);
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn request_pushes_deadline_out() {
        let mut scheduler = RedrawScheduler::new(WINDOW);
        let start = Instant::now();
        scheduler.request(start);
        scheduler.request(start + Duration::from_millis(60));
        assert!(!scheduler.poll(start + WINDOW));
        assert!(scheduler.poll(start + Duration::from_millis(160)));
    }
}
