//! Queue shape classification and pure reorder functions
//!
//! Every reorder the engine performs is computed here over the ordered list
//! of member ids (index 0 is position 1), then written back as one batch via
//! [`positions`]. Nothing in this module touches storage.

use crate::errors::{QueueError, Result};

/// Queue size classes that drive `next` and `defer` dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueShape {
    Empty,
    Single,
    Pair,
    Triple,
    QuadPlus,
}

impl QueueShape {
    /// Map a member count onto its shape
    pub fn classify(count: usize) -> Self {
        match count {
            0 => QueueShape::Empty,
            1 => QueueShape::Single,
            2 => QueueShape::Pair,
            3 => QueueShape::Triple,
            _ => QueueShape::QuadPlus,
        }
    }
}

/// How a deferral reordered the front of the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferOutcome {
    /// Two members: holder and successor swapped
    Swapped,
    /// Three members: holder moved to the end
    MovedToEnd,
    /// Four or more: holder moved back exactly one slot, to position 3
    MovedBackOne,
}

/// Remove the element at `index`, keeping the rest in order.
///
/// Out-of-range indices return the input unchanged.
pub fn close_gap<T: Clone>(ids: &[T], index: usize) -> Vec<T> {
    ids.iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, id)| id.clone())
        .collect()
}

/// Move the head to the end; everyone else shifts up one slot.
pub fn rotate_to_back<T: Clone>(ids: &[T]) -> Vec<T> {
    let mut out = ids.to_vec();
    if !out.is_empty() {
        out.rotate_left(1);
    }
    out
}

/// Swap positions 1 and 2.
pub fn swap_front<T: Clone>(ids: &[T]) -> Vec<T> {
    let mut out = ids.to_vec();
    if out.len() >= 2 {
        out.swap(0, 1);
    }
    out
}

/// `[a, b, c, rest..] -> [b, c, a, rest..]`
///
/// Members beyond position 3 keep their slots.
pub fn defer_one_slot<T: Clone>(ids: &[T]) -> Vec<T> {
    let mut out = ids.to_vec();
    if out.len() >= 3 {
        out[..3].rotate_left(1);
    }
    out
}

/// Reorder for a deferral, dispatched on queue shape.
///
/// # Errors
///
/// `EmptyQueue` for zero members, `CannotDefer` (with an empty name, the
/// engine fills in the holder) for one.
pub fn defer_order<T: Clone>(ids: &[T]) -> Result<(Vec<T>, DeferOutcome)> {
    match QueueShape::classify(ids.len()) {
        QueueShape::Empty => Err(QueueError::EmptyQueue),
        QueueShape::Single => Err(QueueError::CannotDefer {
            name: String::new(),
        }),
        QueueShape::Pair => Ok((swap_front(ids), DeferOutcome::Swapped)),
        QueueShape::Triple => Ok((rotate_to_back(ids), DeferOutcome::MovedToEnd)),
        QueueShape::QuadPlus => Ok((defer_one_slot(ids), DeferOutcome::MovedBackOne)),
    }
}

/// Pair each id with its 1-based position.
pub fn positions<T: Clone>(ids: &[T]) -> Vec<(T, u32)> {
    ids.iter().cloned().zip(1u32..).collect()
}

/// Verify that `positions`, in list order, are exactly `1..=N`.
///
/// # Errors
///
/// `CorruptQueue` naming the first slot that breaks the sequence.
pub fn check_dense(positions: &[u32]) -> Result<()> {
    for (expected, actual) in (1u32..).zip(positions.iter().copied()) {
        if expected != actual {
            return Err(QueueError::CorruptQueue {
                reason: format!("expected position {} but found {}", expected, actual),
            });
        }
    }
    Ok(())
}
