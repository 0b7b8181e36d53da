//! Edit request queue
//!
//! Ignition clicks and terrain painting arrive from the outside as
//! [`EditAction`]s. The paint surface travels inside the request
//! ([`EditMode::Paint`]), so there is no ambient "current brush" state.
//! Pending requests are applied in submission order at the start of the next
//! scheduler step; executed requests are kept in a bounded history so a run can
//! be reproduced from the same seed and the same edits.

use crate::core_types::SurfaceType;

/// What an edit does to its target cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Overwrite the surface type (danger level follows, fire state untouched)
    Paint(SurfaceType),
    /// Set the cell burning and queue it for propagation
    Ignite,
}

impl EditMode {
    /// Convert from an FFI code: 0-5 paint the matching [`SurfaceType`], 255 ignites
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            255 => Some(EditMode::Ignite),
            code => SurfaceType::from_u8(code).map(EditMode::Paint),
        }
    }

    /// Convert to an FFI code
    pub fn as_u8(&self) -> u8 {
        match self {
            EditMode::Paint(surface) => surface.as_u8(),
            EditMode::Ignite => 255,
        }
    }
}

/// One edit request against a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditAction {
    /// Row-major target cell
    pub index: usize,
    pub mode: EditMode,
}

impl EditAction {
    pub fn new(index: usize, mode: EditMode) -> Self {
        Self { index, mode }
    }

    /// Create an ignition request
    pub fn ignite(index: usize) -> Self {
        Self::new(index, EditMode::Ignite)
    }

    /// Create a paint request
    pub fn paint(index: usize, surface: SurfaceType) -> Self {
        Self::new(index, EditMode::Paint(surface))
    }
}

/// Pending edits plus a bounded history of executed ones
#[derive(Debug)]
pub struct EditQueue {
    /// Edits waiting for the next step
    pending: Vec<EditAction>,
    /// Every executed edit, oldest first
    history: Vec<EditAction>,
    /// Maximum history size (oldest edits are removed)
    max_history: usize,
}

impl Default for EditQueue {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl EditQueue {
    /// Create a new queue with specified history limit
    pub fn new(max_history: usize) -> Self {
        Self {
            pending: Vec::with_capacity(32),
            history: Vec::with_capacity(max_history.min(1024)),
            max_history,
        }
    }

    /// Submit an edit for processing in the next step
    pub fn submit(&mut self, action: EditAction) {
        self.pending.push(action);
    }

    /// Edits not yet executed
    pub fn pending(&self) -> &[EditAction] {
        &self.pending
    }

    /// Executed edits, oldest first
    pub fn history(&self) -> &[EditAction] {
        &self.history
    }

    /// Take all pending edits for processing
    pub fn take_pending(&mut self) -> Vec<EditAction> {
        std::mem::take(&mut self.pending)
    }

    /// Record an edit as executed
    pub fn mark_executed(&mut self, action: EditAction) {
        self.history.push(action);

        if self.history.len() > self.max_history {
            self.history.remove(0);
        }
    }

    /// Clear all state (for simulation reset)
    pub fn clear(&mut self) {
        self.pending.clear();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_mode_conversion() {
        assert_eq!(EditMode::from_u8(255), Some(EditMode::Ignite));
        assert_eq!(
            EditMode::from_u8(2),
            Some(EditMode::Paint(SurfaceType::Forest))
        );
        assert_eq!(EditMode::from_u8(6), None);
        for surface in SurfaceType::ALL {
            let mode = EditMode::Paint(surface);
            assert_eq!(EditMode::from_u8(mode.as_u8()), Some(mode));
        }
    }

    #[test]
    fn test_queue_submit_and_take() {
        let mut queue = EditQueue::new(100);
        queue.submit(EditAction::ignite(3));
        queue.submit(EditAction::paint(4, SurfaceType::Water));

        assert_eq!(queue.pending().len(), 2);
        let pending = queue.take_pending();
        assert_eq!(pending[0], EditAction::ignite(3));
        assert_eq!(pending[1].mode, EditMode::Paint(SurfaceType::Water));
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn test_queue_history_is_bounded() {
        let mut queue = EditQueue::new(5);
        for i in 0..7 {
            queue.mark_executed(EditAction::ignite(i));
        }
        assert_eq!(queue.history().len(), 5);
        // Oldest edits are removed
        assert_eq!(queue.history()[0].index, 2);
    }

    #[test]
    fn test_clear() {
        let mut queue = EditQueue::default();
        queue.submit(EditAction::ignite(0));
        queue.mark_executed(EditAction::ignite(1));
        queue.clear();
        assert!(queue.pending().is_empty());
        assert!(queue.history().is_empty());
    }
}
