/// Count watermark over an ordered sub-stream of polled items.
///
/// Tracks how many items of a given sub-class were present at the last poll,
/// so newly arrived items can be detected without full list-to-list diffing.
#[derive(Debug, Clone, Default)]
pub struct Watermark {
    seen: Option<usize>,
}

impl Watermark {
    pub fn new() -> Self {
        Self { seen: None }
    }

    /// Advance against a freshly fetched list and return the slice of items
    /// beyond the previously recorded count.
    ///
    /// The first call of a session records the current count and reports
    /// nothing as new, so pre-existing history never floods the user with
    /// synthesized alerts. The recorded count never decreases: a shorter list
    /// reports zero new items.
    pub fn advance<'a, T>(&mut self, items: &'a [T]) -> &'a [T] {
        let total = items.len();
        match self.seen {
            None => {
                self.seen = Some(total);
                &[]
            }
            Some(prev) if total > prev => {
                self.seen = Some(total);
                &items[prev..]
            }
            Some(_) => &[],
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.seen.is_some()
    }

    pub fn count(&self) -> usize {
        self.seen.unwrap_or(0)
    }

    /// Return to the uninitialized state so a later session starts clean
    pub fn reset(&mut self) {
        self.seen = None;
    }
}
