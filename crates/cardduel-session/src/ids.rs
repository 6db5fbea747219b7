//! The match-wide card id counter.

use cardduel_protocol::CardId;

use crate::SessionError;

/// Hands out card ids in strictly increasing order.
///
/// One allocator serves the whole match, so an id is never reused across
/// hands, decks or sideboards of either player. The counter never wraps:
/// once the id space is spent, every request fails.
#[derive(Debug, Default)]
pub struct CardIdAllocator {
    next: u32,
}

impl CardIdAllocator {
    /// Creates an allocator whose first id is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator whose first id is `first`.
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// Returns a fresh id and advances the counter.
    ///
    /// # Errors
    /// Returns [`SessionError::IdsExhausted`] if the counter would wrap.
    pub fn next_id(&mut self) -> Result<CardId, SessionError> {
        let id = CardId(self.next);
        self.next = self.next.checked_add(1).ok_or(SessionError::IdsExhausted)?;
        Ok(id)
    }

    /// Takes `count` consecutive ids in one step.
    ///
    /// Either all of them are handed out or none are: on error the
    /// counter is left where it was.
    ///
    /// # Errors
    /// Returns [`SessionError::IdsExhausted`] if the counter would wrap.
    pub fn reserve(
        &mut self,
        count: u32,
    ) -> Result<impl Iterator<Item = CardId> + use<>, SessionError> {
        let end = self.next.checked_add(count).ok_or(SessionError::IdsExhausted)?;
        let start = std::mem::replace(&mut self.next, end);
        Ok((start..end).map(CardId))
    }

    /// Returns the id the next call to [`next_id`](Self::next_id) will
    /// hand out, without consuming it.
    pub fn peek(&self) -> CardId {
        CardId(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_strictly_increasing() {
        let mut ids = CardIdAllocator::new();
        let a = ids.next_id().unwrap();
        let b = ids.next_id().unwrap();
        let c = ids.next_id().unwrap();
        assert!(a < b && b < c);
        assert_eq!(a, CardId(0));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut ids = CardIdAllocator::new();
        assert_eq!(ids.peek(), CardId(0));
        assert_eq!(ids.peek(), CardId(0));
        ids.next_id().unwrap();
        assert_eq!(ids.peek(), CardId(1));
    }

    #[test]
    fn test_next_id_at_end_of_range_returns_error() {
        let mut ids = CardIdAllocator::starting_at(u32::MAX - 1);
        assert_eq!(ids.next_id().unwrap(), CardId(u32::MAX - 1));

        assert!(matches!(ids.next_id(), Err(SessionError::IdsExhausted)));
        assert!(matches!(ids.next_id(), Err(SessionError::IdsExhausted)));
        assert_eq!(ids.peek(), CardId(u32::MAX));
    }

    #[test]
    fn test_reserve_hands_out_consecutive_ids() {
        let mut ids = CardIdAllocator::starting_at(5);
        let taken: Vec<CardId> = ids.reserve(3).unwrap().collect();

        assert_eq!(taken, [CardId(5), CardId(6), CardId(7)]);
        assert_eq!(ids.peek(), CardId(8));
    }

    #[test]
    fn test_reserve_overflow_leaves_counter_unchanged() {
        let mut ids = CardIdAllocator::starting_at(u32::MAX - 2);

        assert!(matches!(ids.reserve(3), Err(SessionError::IdsExhausted)));
        assert_eq!(ids.peek(), CardId(u32::MAX - 2));
        assert_eq!(ids.reserve(2).unwrap().count(), 2);
    }
}
