//! Coalesced render scheduling.
//!
//! Any number of state mutations between two pumps collapse into a single
//! render: mutators call [`RenderScheduler::request`], the embedding loop
//! calls [`RenderScheduler::take`] once per tick and renders when it
//! returns true.

/// Dirty-flag render scheduler
#[derive(Debug, Default)]
pub struct RenderScheduler {
    dirty: bool,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the state dirty; duplicate requests are absorbed.
    pub fn request(&mut self) {
        self.dirty = true;
    }

    /// Whether a render is currently due.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the dirty flag. Returns true at most once per batch of
    /// requests.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_many_requests_one_render() {
        let mut scheduler = RenderScheduler::new();
        assert!(!scheduler.take());
        for _ in 0..10 {
            scheduler.request();
        }
        assert!(scheduler.take());
        assert!(!scheduler.take());
    }

    #[test]
    fn test_request_after_take_is_due_again() {
        let mut scheduler = RenderScheduler::new();
        scheduler.request();
        assert!(scheduler.take());
        scheduler.request();
        assert!(scheduler.is_dirty());
        assert!(scheduler.take());
    }
}
