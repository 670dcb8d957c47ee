//! Bounded, wrapping correlation id allocation.

use chemhover_protocols::{ChannelError, MessageId};

/// Hands out ids in `0..max_id`, wrapping, never one that is still in flight.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    last: MessageId,
    max_id: MessageId,
}

impl IdAllocator {
    pub(crate) fn new(max_id: MessageId) -> Self {
        Self {
            last: 0,
            max_id: max_id.max(1),
        }
    }

    /// Next free id after the last one handed out.
    ///
    /// Fails with [`ChannelError::IdSpaceExhausted`] rather than reuse an id
    /// whose reply is still outstanding.
    pub(crate) fn allocate(
        &mut self,
        in_flight: impl Fn(MessageId) -> bool,
    ) -> Result<MessageId, ChannelError> {
        for _ in 0..self.max_id {
            self.last = (self.last + 1) % self.max_id;
            if !in_flight(self.last) {
                return Ok(self.last);
            }
        }
        Err(ChannelError::IdSpaceExhausted {
            max_id: self.max_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_id_is_one() {
        let mut ids = IdAllocator::new(1024);
        assert_eq!(ids.allocate(|_| false).unwrap(), 1);
        assert_eq!(ids.allocate(|_| false).unwrap(), 2);
    }

    #[test]
    fn test_wraps_after_full_cycle() {
        let mut ids = IdAllocator::new(4);
        let seen: Vec<_> = (0..6).map(|_| ids.allocate(|_| false).unwrap()).collect();
        assert_eq!(seen, vec![1, 2, 3, 0, 1, 2]);
    }

    #[test]
    fn test_skips_ids_in_flight() {
        let mut ids = IdAllocator::new(4);
        let busy: HashSet<MessageId> = [1, 2].into_iter().collect();
        assert_eq!(ids.allocate(|id| busy.contains(&id)).unwrap(), 3);
    }

    #[test]
    fn test_exhausted_when_all_in_flight() {
        let mut ids = IdAllocator::new(4);
        let err = ids.allocate(|_| true).unwrap_err();
        assert!(matches!(err, ChannelError::IdSpaceExhausted { max_id: 4 }));
    }
}
