use crate::errors::{QueueError, Result};

/// Number of history entries to return, always within `[MIN, MAX]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimit(u32);

impl HistoryLimit {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 50;
    pub const DEFAULT: u32 = 10;

    /// Clamp any requested value into range; `None` means the default.
    pub fn clamped(requested: Option<i64>) -> Self {
        match requested {
            None => Self(Self::DEFAULT),
            Some(n) => Self(n.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u32),
        }
    }

    /// Strict constructor for callers that want out-of-range values rejected.
    ///
    /// # Errors
    ///
    /// `InvalidLimit` when `requested` is outside `[1, 50]`.
    pub fn try_new(requested: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&requested) {
            Ok(Self(requested as u32))
        } else {
            Err(QueueError::InvalidLimit { limit: requested })
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for HistoryLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        assert_eq!(HistoryLimit::clamped(None).get(), 10);
        assert_eq!(HistoryLimit::clamped(Some(0)).get(), 1);
        assert_eq!(HistoryLimit::clamped(Some(-5)).get(), 1);
        assert_eq!(HistoryLimit::clamped(Some(1000)).get(), 50);
        assert_eq!(HistoryLimit::clamped(Some(20)).get(), 20);
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert_eq!(
            HistoryLimit::try_new(0),
            Err(QueueError::InvalidLimit { limit: 0 })
        );
        assert!(HistoryLimit::try_new(51).is_err());
        assert_eq!(HistoryLimit::try_new(50).unwrap().get(), 50);
    }
}
