//! Progress counters.

/// Counters carried through the split.
///
/// `total_*` never decrease. `part_*` describe the open segment and are
/// reseeded (not zeroed) when a record starts a new segment, so
/// `part_lines <= total_lines` and `part_size <= total_size` always hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Records consumed across the whole run.
    pub total_lines: u64,
    /// Records placed in the open segment.
    pub part_lines: u64,
    /// Attachment bytes across the whole run.
    pub total_size: u64,
    /// Attachment bytes placed in the open segment.
    pub part_size: u64,
}

impl Progress {
    /// State after placing one more record carrying `size` attachment bytes
    /// into the open segment.
    #[must_use]
    pub const fn advance(self, size: u64) -> Self {
        Self {
            total_lines: self.total_lines + 1,
            part_lines: self.part_lines + 1,
            total_size: self.total_size + size,
            part_size: self.part_size + size,
        }
    }

    /// Makes the record that was just counted the first member of a fresh
    /// segment.
    #[must_use]
    pub const fn reseed(self, size: u64) -> Self {
        Self {
            part_lines: 1,
            part_size: size,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn advance_counts_both_scopes() {
        let state = Progress::default().advance(10).advance(5);
        assert_eq!(
            state,
            Progress {
                total_lines: 2,
                part_lines: 2,
                total_size: 15,
                part_size: 15,
            }
        );
    }

    #[test]
    fn reseed_keeps_totals() {
        let state = Progress::default().advance(10).advance(5).reseed(5);
        assert_eq!(state.total_lines, 2);
        assert_eq!(state.total_size, 15);
        assert_eq!(state.part_lines, 1);
        assert_eq!(state.part_size, 5);
    }

    proptest! {
        #[test]
        fn part_never_exceeds_total(steps in prop::collection::vec((0u64..1_000, any::<bool>()), 0..100)) {
            let mut state = Progress::default();
            for (size, split) in steps {
                state = state.advance(size);
                if split {
                    state = state.reseed(size);
                }
                prop_assert!(state.part_lines <= state.total_lines);
                prop_assert!(state.part_size <= state.total_size);
            }
        }
    }
}
