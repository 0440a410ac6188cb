//! The cyclic ring that doubles as prefetch queue and navigation history.
//!
//! Pure data structure, no synchronization: the owning [`super::Prefetcher`]
//! is responsible for guarding every access with its mutex. Kept separate so
//! the index arithmetic (`SPEC_FULL.md` §3, invariants I1-I5) can be unit
//! tested without spinning up a thread.

/// Outcome of a worker write attempt.
pub enum StoreOutcome<T> {
    /// The image was stored at slot `W`, which may have evicted a previous
    /// occupant (returned so the caller can drop it outside the lock).
    Stored(Option<T>),
    /// Writing would advance `W` into `R`'s slot; the ring is already at its
    /// maximum of `cache_size - 1` available entries (I3), so the write was
    /// refused.
    Full,
}

/// Fixed-capacity cyclic buffer of `Option<T>` slots with a read cursor `R`
/// and write cursor `W`.
pub struct Ring<T> {
    slots: Vec<Option<T>>,
    read: usize,
    write: usize,
}

impl<T: Clone> Ring<T> {
    /// Allocates a ring of `capacity` empty slots with `R = W = 0`.
    ///
    /// # Panics
    /// Panics if `capacity` is zero; `Prefetcher::start` is responsible for
    /// rejecting that before a `Ring` is ever constructed.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be positive");
        Self {
            slots: vec![None; capacity],
            read: 0,
            write: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// `(W - R) mod cache_size` — the number of slots available for forward
    /// movement (I3).
    pub fn count_available(&self) -> usize {
        (self.write + self.capacity() - self.read) % self.capacity()
    }

    /// Writes `image` into slot `W` and advances `W`, unless doing so would
    /// make `W` collide with `R` (I3) — in which case the write is refused
    /// and slot `R` is left untouched.
    pub fn store(&mut self, image: T) -> StoreOutcome<T> {
        let cap = self.capacity();
        let next_write = (self.write + 1) % cap;
        if next_write == self.read {
            return StoreOutcome::Full;
        }

        let evicted = self.slots[self.write].take();
        self.slots[self.write] = Some(image);
        self.write = next_write;
        StoreOutcome::Stored(evicted)
    }

    /// Reader-side forward step. See `SPEC_FULL.md` §4.2 for the three
    /// transitions (empty / at-head / normal).
    pub fn jump_next(&mut self) -> Option<T> {
        if self.write == self.read {
            return None;
        }

        let next = (self.read + 1) % self.capacity();
        if next == self.write {
            // At head: nothing new yet, keep showing the current image.
            return self.slots[self.read].clone();
        }

        self.read = next;
        self.slots[self.read].clone()
    }

    /// Reader-side backward step. See `SPEC_FULL.md` §4.2.
    pub fn jump_prev(&mut self) -> Option<T> {
        let cap = self.capacity();
        let prev = (self.read + cap - 1) % cap;
        if prev == self.write || self.slots[prev].is_none() {
            return None;
        }

        self.read = prev;
        self.slots[prev].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_ok<T: Clone>(ring: &mut Ring<T>, value: T) -> Option<T> {
        match ring.store(value) {
            StoreOutcome::Stored(evicted) => evicted,
            StoreOutcome::Full => panic!("expected store to succeed"),
        }
    }

    #[test]
    fn starts_empty() {
        let mut ring: Ring<u32> = Ring::new(4);
        assert_eq!(ring.count_available(), 0);
        assert_eq!(ring.jump_next(), None);
        assert_eq!(ring.jump_prev(), None);
    }

    #[test]
    fn fills_and_reads_in_order() {
        // A store landing while the reader is exactly at the write cursor's
        // predecessor is always delivered via the "at head" branch first;
        // reading between stores is what keeps the first image from being
        // skipped over (see corrected_scenario_2 and scenario_1 in
        // tests/prefetcher_properties.rs for the case where two stores land
        // before the reader's first call).
        let mut ring = Ring::new(4);
        store_ok(&mut ring, 1);
        assert_eq!(ring.jump_next(), Some(1));
        store_ok(&mut ring, 2);
        assert_eq!(ring.jump_next(), Some(2));
        assert_eq!(ring.count_available(), 0);
    }

    #[test]
    fn a_second_store_before_any_read_skips_the_first_slot() {
        // If the worker races ahead of the reader's first call, slot 0 is
        // never handed out by jump_next directly - only jump_prev can
        // recover it once R has moved past it. wait_for_first exists
        // specifically to call jump_next right at the 0->1 transition and
        // avoid this.
        let mut ring = Ring::new(4);
        store_ok(&mut ring, 1);
        store_ok(&mut ring, 2);
        assert_eq!(ring.jump_next(), Some(2));
        assert_eq!(ring.jump_prev(), Some(1));
    }

    #[test]
    fn at_head_replays_current_without_advancing() {
        let mut ring = Ring::new(4);
        store_ok(&mut ring, 1);
        assert_eq!(ring.jump_next(), Some(1));
        // No more unseen entries: stay put, replay slot R.
        assert_eq!(ring.jump_next(), Some(1));
        assert_eq!(ring.count_available(), 0);
    }

    #[test]
    fn jump_prev_respects_history_bound() {
        let mut ring = Ring::new(4);
        for v in 1..=3 {
            store_ok(&mut ring, v);
        }
        ring.jump_next();
        ring.jump_next();
        ring.jump_next();
        assert_eq!(ring.jump_prev(), Some(2));
        assert_eq!(ring.jump_prev(), Some(1));
        assert_eq!(ring.jump_prev(), None);
    }

    #[test]
    fn eviction_drops_oldest_slot_on_overwrite() {
        // Capacity 2 can only ever hold one entry past R (I3's ceiling is
        // cache_size - 1), so eviction needs at least capacity 3 to show a
        // write landing on a slot the reader has already passed.
        let mut ring = Ring::new(3);
        store_ok(&mut ring, 1); // slot 0
        store_ok(&mut ring, 2); // slot 1
        assert_eq!(ring.jump_next(), Some(2)); // R -> 1, frees slot 0 for reuse
        store_ok(&mut ring, 3); // slot 2
        assert_eq!(ring.jump_next(), Some(3)); // R -> 2, frees slot 1
        // W has wrapped back to slot 0, the one R already passed over.
        match ring.store(4) {
            StoreOutcome::Stored(evicted) => assert_eq!(evicted, Some(1)),
            StoreOutcome::Full => panic!("expected a stored write"),
        }
    }

    #[test]
    fn refuses_to_write_past_read_cursor() {
        // Capacity 3: R never moves, so only 2 writes can ever land before
        // the ring reports Full rather than clobbering slot R.
        let mut ring: Ring<u32> = Ring::new(3);
        store_ok(&mut ring, 1);
        store_ok(&mut ring, 2);
        assert_eq!(ring.count_available(), 2);
        assert!(matches!(ring.store(3), StoreOutcome::Full));
        assert_eq!(ring.count_available(), 2);
    }

    #[test]
    fn never_fills_completely() {
        let mut ring: Ring<u32> = Ring::new(3);
        for v in 1..10 {
            let _ = ring.store(v);
        }
        assert!(ring.count_available() <= 2);
    }
}
