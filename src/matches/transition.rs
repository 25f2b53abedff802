//! Match save transitions

/// How a save moves a match between draft and finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Unfinished before and after; the ledger is not touched
    DraftToDraft,
    /// First time finished; apply the result once
    Finish,
    /// Finished with the same scores; nothing to do
    Unchanged,
    /// Finished with different scores; revert the old result, apply the new
    Correction { previous: (u32, u32) },
    /// Finished match saved as unfinished
    Unfinish { previous: (u32, u32) },
}

impl Transition {
    /// Classify a save. A match saved for the first time counts as a draft
    /// before the save.
    pub fn classify(
        previous: Option<(bool, (u32, u32))>,
        finished: bool,
        scores: (u32, u32),
    ) -> Self {
        match (previous, finished) {
            (None, false) | (Some((false, _)), false) => Transition::DraftToDraft,
            (None, true) | (Some((false, _)), true) => Transition::Finish,
            (Some((true, old)), true) if old == scores => Transition::Unchanged,
            (Some((true, old)), true) => Transition::Correction { previous: old },
            (Some((true, old)), false) => Transition::Unfinish { previous: old },
        }
    }

    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            Transition::DraftToDraft => "draft",
            Transition::Finish => "finish",
            Transition::Unchanged => "unchanged",
            Transition::Correction { .. } => "correction",
            Transition::Unfinish { .. } => "unfinish",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matches() {
        assert_eq!(Transition::classify(None, false, (0, 0)), Transition::DraftToDraft);
        assert_eq!(Transition::classify(None, true, (3, 1)), Transition::Finish);
    }

    #[test]
    fn test_existing_drafts() {
        assert_eq!(
            Transition::classify(Some((false, (1, 0))), false, (2, 0)),
            Transition::DraftToDraft
        );
        assert_eq!(
            Transition::classify(Some((false, (1, 0))), true, (1, 0)),
            Transition::Finish
        );
    }

    #[test]
    fn test_finished_matches() {
        assert_eq!(
            Transition::classify(Some((true, (3, 1))), true, (3, 1)),
            Transition::Unchanged
        );
        assert_eq!(
            Transition::classify(Some((true, (3, 1))), true, (2, 2)),
            Transition::Correction { previous: (3, 1) }
        );
        assert_eq!(
            Transition::classify(Some((true, (3, 1))), false, (3, 1)),
            Transition::Unfinish { previous: (3, 1) }
        );
    }
}
