//! Direct-mapped transposition cache keyed by position fingerprint.

/// Alpha-beta classification of a stored score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// The true value is at least `score`.
    Lower,
    /// The true value is at most `score`.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub key: u64,
    pub score: i32,
    pub depth: u32,
    pub bound: Bound,
    pub best_move: Option<u8>,
}

/// Result of a cache probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Probe {
    /// A score the caller may return without searching.
    pub score: Option<i32>,
    /// Best move from a matching entry, usable for move ordering even when
    /// the score is not.
    pub best_move: Option<usize>,
}

/// Decides whether an incoming entry evicts the one occupying its slot.
pub trait ReplacementPolicy: Send {
    fn should_replace(&self, stored: &TtEntry, incoming: &TtEntry) -> bool;
}

/// Keep the deeper result; on equal depth let an exact score replace a bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthPreferred;

impl ReplacementPolicy for DepthPreferred {
    fn should_replace(&self, stored: &TtEntry, incoming: &TtEntry) -> bool {
        incoming.depth > stored.depth
            || (incoming.depth == stored.depth
                && incoming.bound == Bound::Exact
                && stored.bound != Bound::Exact)
    }
}

/// Always overwrite. Useful as a baseline when tuning.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysReplace;

impl ReplacementPolicy for AlwaysReplace {
    fn should_replace(&self, _stored: &TtEntry, _incoming: &TtEntry) -> bool {
        true
    }
}

pub struct TranspositionTable<P: ReplacementPolicy = DepthPreferred> {
    slots: Vec<Option<TtEntry>>,
    policy: P,
}

impl TranspositionTable<DepthPreferred> {
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, DepthPreferred)
    }
}

impl<P: ReplacementPolicy> TranspositionTable<P> {
    pub fn with_policy(capacity: usize, policy: P) -> Self {
        TranspositionTable {
            slots: vec![None; capacity.max(1)],
            policy,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    /// Raw slot contents for `key`, if the stored fingerprint matches.
    pub fn entry(&self, key: u64) -> Option<&TtEntry> {
        self.slots[self.index(key)].as_ref().filter(|e| e.key == key)
    }

    /// Look up `key` for a search of `depth` plies within `(alpha, beta)`.
    pub fn lookup(&self, key: u64, depth: u32, alpha: i32, beta: i32) -> Probe {
        let Some(entry) = self.entry(key) else {
            return Probe::default();
        };

        let best_move = entry.best_move.map(usize::from);
        if entry.depth < depth {
            return Probe { score: None, best_move };
        }

        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => entry.score >= beta,
            Bound::Upper => entry.score <= alpha,
        };

        Probe {
            score: usable.then_some(entry.score),
            best_move,
        }
    }

    /// Store a search result, subject to the replacement policy.
    /// Returns whether the slot was written.
    pub fn store(&mut self, key: u64, depth: u32, score: i32, bound: Bound, best_move: Option<usize>) -> bool {
        let incoming = TtEntry {
            key,
            score,
            depth,
            bound,
            best_move: best_move.map(|col| col as u8),
        };

        let idx = self.index(key);
        let replace = match &self.slots[idx] {
            None => true,
            Some(stored) => self.policy.should_replace(stored, &incoming),
        };
        if replace {
            self.slots[idx] = Some(incoming);
        }
        replace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_empty_table() {
        let tt = TranspositionTable::new(64);
        assert_eq!(tt.lookup(42, 0, -100, 100), Probe::default());
        assert_eq!(tt.occupied(), 0);
    }

    #[test]
    fn exact_entry_serves_shallower_lookups() {
        let mut tt = TranspositionTable::new(64);
        assert!(tt.store(7, 5, 123, Bound::Exact, Some(3)));

        for depth in 0..=5 {
            let probe = tt.lookup(7, depth, -1_000, 1_000);
            assert_eq!(probe.score, Some(123), "depth {depth}");
            assert_eq!(probe.best_move, Some(3));
        }

        let deeper = tt.lookup(7, 6, -1_000, 1_000);
        assert_eq!(deeper.score, None);
        assert_eq!(deeper.best_move, Some(3));
    }

    #[test]
    fn bounds_only_serve_when_they_prove_a_cutoff() {
        let mut tt = TranspositionTable::new(64);
        tt.store(1, 4, 50, Bound::Lower, Some(2));
        assert_eq!(tt.lookup(1, 4, 0, 40).score, Some(50));
        assert_eq!(tt.lookup(1, 4, 0, 60).score, None);
        assert_eq!(tt.lookup(1, 4, 0, 60).best_move, Some(2));

        tt.store(2, 4, -50, Bound::Upper, Some(4));
        assert_eq!(tt.lookup(2, 4, -40, 40).score, Some(-50));
        assert_eq!(tt.lookup(2, 4, -60, 40).score, None);
    }

    #[test]
    fn fingerprint_mismatch_is_a_miss() {
        let mut tt = TranspositionTable::new(16);
        tt.store(3, 2, 10, Bound::Exact, Some(1));
        // 19 maps to the same slot as 3 but is a different position.
        assert_eq!(tt.lookup(19, 0, -100, 100), Probe::default());
    }

    #[test]
    fn depth_preferred_replacement() {
        let mut tt = TranspositionTable::new(16);
        tt.store(3, 6, 10, Bound::Exact, Some(1));

        // Shallower colliding entry must not evict the deep one.
        assert!(!tt.store(19, 2, 99, Bound::Exact, Some(5)));
        assert_eq!(tt.entry(3).map(|e| e.score), Some(10));

        // Deeper entry does.
        assert!(tt.store(19, 7, 99, Bound::Lower, Some(5)));
        assert!(tt.entry(3).is_none());

        // Equal depth: exact replaces a bound, a bound does not replace exact.
        assert!(tt.store(35, 7, 1, Bound::Exact, None));
        assert!(!tt.store(51, 7, 2, Bound::Upper, None));
        assert_eq!(tt.entry(35).map(|e| e.score), Some(1));
    }

    #[test]
    fn custom_policy_and_clear() {
        let mut tt = TranspositionTable::with_policy(16, AlwaysReplace);
        tt.store(3, 9, 10, Bound::Exact, None);
        assert!(tt.store(19, 0, 20, Bound::Upper, None));
        assert_eq!(tt.entry(19).map(|e| e.score), Some(20));
        assert_eq!(tt.occupied(), 1);

        tt.clear();
        assert_eq!(tt.occupied(), 0);
        assert_eq!(tt.capacity(), 16);
    }
}
