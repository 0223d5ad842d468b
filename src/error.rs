//! Error type shared by every set in the crate

/// Failures that can surface from constructing or growing a set
///
/// Duplicate inserts and lookup misses are not errors. Displacement stalls
/// and full buckets are resolved internally by growing or splitting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Growth would take a table or directory past its configured maximum
    #[error("table would grow to {requested} slots, past the configured maximum of {max}")]
    CapacityExceeded { requested: usize, max: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Double `size`, failing if the result passes `max`
pub(crate) fn doubled(size: usize, max: usize) -> Result<usize> {
    match size.checked_mul(2) {
        Some(requested) if requested <= max => Ok(requested),
        requested => {
            let requested = requested.unwrap_or(usize::MAX);
            tracing::warn!(size, requested, max, "capacity exhausted");
            Err(Error::CapacityExceeded { requested, max })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubled_within_limit() {
        assert_eq!(doubled(4, 8), Ok(8));
        assert_eq!(doubled(1, 1 << 10), Ok(2));
    }

    #[test]
    fn test_doubled_past_limit() {
        assert_eq!(
            doubled(8, 8),
            Err(Error::CapacityExceeded {
                requested: 16,
                max: 8
            })
        );
    }

    #[test]
    fn test_doubled_overflow() {
        let err = doubled(usize::MAX, usize::MAX).unwrap_err();
        assert_eq!(
            err,
            Error::CapacityExceeded {
                requested: usize::MAX,
                max: usize::MAX
            }
        );
    }

    #[test]
    fn test_display() {
        let err = Error::CapacityExceeded {
            requested: 32,
            max: 16,
        };
        assert_eq!(
            err.to_string(),
            "table would grow to 32 slots, past the configured maximum of 16"
        );
    }
}
