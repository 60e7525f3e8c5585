/// Classification of a single pass through the scheduling flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The openings widget rendered without the no-openings marker.
    SlotAvailable,
    /// The no-openings marker was located within its wait ceiling.
    NoSlot,
    /// Neither the marker nor the openings widget appeared in time.
    Indeterminate,
}

impl AttemptOutcome {
    /// An attempt that failed to prove "no slot" counts as a possible
    /// opening, including the case where the marker check itself timed out.
    pub fn may_be_bookable(self) -> bool {
        !matches!(self, AttemptOutcome::NoSlot)
    }
}
