//! Prompt boundary: the offset separating frozen output from the live
//! command line.

/// Char offset into the display before which nothing may be edited.
///
/// The boundary only moves forward. [`PromptBoundary::reset`] is the single
/// exception and is reserved for clearing the whole console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptBoundary {
    offset: usize,
}

impl PromptBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the boundary to `max(current, new_offset)`.
    pub fn advance_to(&mut self, new_offset: usize) {
        if new_offset > self.offset {
            self.offset = new_offset;
        }
    }

    /// True iff `position` lies in the editable region.
    pub fn is_editable(&self, position: usize) -> bool {
        position >= self.offset
    }

    /// Clamp a cursor placement forward so it never lands in the frozen region.
    pub fn clamp(&self, position: usize) -> usize {
        position.max(self.offset)
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_is_monotonic() {
        let mut boundary = PromptBoundary::new();
        boundary.advance_to(10);
        assert_eq!(boundary.offset(), 10);
        boundary.advance_to(4);
        assert_eq!(boundary.offset(), 10);
        boundary.advance_to(12);
        assert_eq!(boundary.offset(), 12);
    }

    #[test]
    fn test_is_editable() {
        let mut boundary = PromptBoundary::new();
        boundary.advance_to(5);
        assert!(!boundary.is_editable(0));
        assert!(!boundary.is_editable(4));
        assert!(boundary.is_editable(5));
        assert!(boundary.is_editable(100));
    }

    #[test]
    fn test_clamp_moves_forward_only() {
        let mut boundary = PromptBoundary::new();
        boundary.advance_to(20);
        assert_eq!(boundary.clamp(15), 20);
        assert_eq!(boundary.clamp(20), 20);
        assert_eq!(boundary.clamp(25), 25);
    }

    #[test]
    fn test_reset() {
        let mut boundary = PromptBoundary::new();
        boundary.advance_to(42);
        boundary.reset();
        assert_eq!(boundary.offset(), 0);
        assert!(boundary.is_editable(0));
    }
}
