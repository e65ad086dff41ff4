//! Index resolution shared by the model tree and the containers.
//!
//! Two rules apply everywhere an index crosses the public API:
//!
//! - Inserting never fails. Negative indices count from the end and anything
//!   outside `0..=len` is clamped into it.
//! - Lookups are strict. Negative indices count from the end and anything
//!   outside `0..len` is an [`OutOfBounds`](ModelError::OutOfBounds) error.

use horizon_qtypes_core::{ModelError, Result};

/// Resolve an insertion index against a sequence of length `len`.
///
/// The result is always in `0..=len`.
pub fn clamp_insert_index(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        index.unsigned_abs().min(len)
    }
}

/// Resolve a lookup index against a sequence of length `len`.
pub fn resolve_index(index: isize, len: usize) -> Result<usize> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        Some(index.unsigned_abs())
    };
    resolved
        .filter(|&i| i < len)
        .ok_or(ModelError::OutOfBounds { index, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_insert_index() {
        assert_eq!(clamp_insert_index(0, 0), 0);
        assert_eq!(clamp_insert_index(-1, 0), 0);
        assert_eq!(clamp_insert_index(5, 0), 0);
        assert_eq!(clamp_insert_index(1, 3), 1);
        assert_eq!(clamp_insert_index(3, 3), 3);
        assert_eq!(clamp_insert_index(10, 3), 3);
        assert_eq!(clamp_insert_index(-1, 3), 2);
        assert_eq!(clamp_insert_index(-3, 3), 0);
        assert_eq!(clamp_insert_index(-10, 3), 0);
        assert_eq!(clamp_insert_index(isize::MIN, 3), 0);
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(0, 3), Ok(0));
        assert_eq!(resolve_index(2, 3), Ok(2));
        assert_eq!(resolve_index(-1, 3), Ok(2));
        assert_eq!(resolve_index(-3, 3), Ok(0));
        assert_eq!(resolve_index(3, 3), Err(ModelError::OutOfBounds { index: 3, len: 3 }));
        assert_eq!(resolve_index(-4, 3), Err(ModelError::OutOfBounds { index: -4, len: 3 }));
        assert_eq!(resolve_index(0, 0), Err(ModelError::OutOfBounds { index: 0, len: 0 }));
    }
}
