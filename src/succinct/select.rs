//! Select queries by binary search over rank
//!
//! Holds no tables of its own: the position of the i-th set bit is found
//! by binary-searching positions and comparing their inclusive rank
//! against `i`. O(log n) rank probes, each O(1).

use crate::error::{JacobsonError, Result};
use crate::succinct::RankSupport;
use std::path::Path;

/// Select over a borrowed [`RankSupport`]
///
/// # Examples
///
/// ```rust
/// use jacobson::{BitVector, RankSupport, SelectSupport};
///
/// let bv = BitVector::from_binary_str("0100010001")?;
/// let rank = RankSupport::new(&bv);
/// let select = SelectSupport::new(&rank);
///
/// assert_eq!(select.select1(1)?, 1);
/// assert_eq!(select.select1(3)?, 9);
/// # Ok::<(), jacobson::JacobsonError>(())
/// ```
#[derive(Debug)]
pub struct SelectSupport<'a, 'b> {
    rank: &'a RankSupport<'b>,
}

impl<'a, 'b> SelectSupport<'a, 'b> {
    /// Create select support over existing rank support
    pub fn new(rank: &'a RankSupport<'b>) -> Self {
        Self { rank }
    }

    /// The position of the `i`-th set bit, with `i` 1-indexed
    ///
    /// Fails with [`JacobsonError::InvalidArgument`] if `i == 0` or
    /// `i > total_ones()` (check elided without the `bounds-checks`
    /// feature), and [`JacobsonError::Internal`] should the search
    /// exhaust its window, possible only if the rank tables are stale.
    pub fn select1(&self, i: usize) -> Result<usize> {
        #[cfg(feature = "bounds-checks")]
        if i == 0 || i > self.rank.total_ones() {
            return Err(JacobsonError::invalid_argument(format!(
                "cannot select the {}-th set bit of a vector with {} set bits",
                i,
                self.rank.total_ones()
            )));
        }

        let bitvector = self.rank.bit_vector();
        let mut lower = 0usize;
        let mut upper = self.rank.len().saturating_sub(1);
        while lower <= upper {
            let mid = lower + (upper - lower) / 2;
            let rank_at_mid = self.rank.rank1(mid)?;

            if rank_at_mid < i {
                lower = mid + 1;
            } else if rank_at_mid > i || !bitvector.get(mid) {
                // the i-th set bit lies strictly left of mid
                if mid == 0 {
                    break;
                }
                upper = mid - 1;
            } else {
                return Ok(mid);
            }
        }

        Err(JacobsonError::internal(format!(
            "select1 window exhausted looking for the {}-th set bit",
            i
        )))
    }

    /// Alias for [`select1`](SelectSupport::select1), matching the
    /// `select(i)` notation of the literature
    #[inline]
    pub fn select(&self, i: usize) -> Result<usize> {
        self.select1(i)
    }

    /// Bits of metadata beyond the rank directory: none
    pub fn overhead(&self) -> usize {
        0
    }

    /// Persist select state to `path`: a no-op, select is stateless
    pub fn save<P: AsRef<Path>>(&self, _path: P) -> Result<()> {
        Ok(())
    }

    /// Load select state from `path`: a no-op, select is stateless
    pub fn load<P: AsRef<Path>>(&mut self, _path: P) -> Result<()> {
        Ok(())
    }
}
