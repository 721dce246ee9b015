/// Aggregated view of reading progress, useful for UI.
///
/// Decoys are invisible here: they count toward neither `read_count` nor
/// `total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// Real cards consumed so far, including the one currently selected.
    pub read_count: usize,
    /// Real cards in the round — the progress denominator.
    pub total: usize,
    /// True once the final card is actually playing.
    pub is_complete: bool,
}
