//! # Jacobson: Succinct Rank/Select Data Structures
//!
//! This crate provides a compact bit vector with constant-time rank
//! support, select by binary search, and a sparse array built on top of
//! them, together with a small binary serialization layer for persisting
//! the index structures.
//!
//! ## Key Features
//!
//! - **Packed bit vector**: byte-backed storage with bounded-range
//!   popcount primitives
//! - **Two-level rank directory**: superblock/block prefix sums sized
//!   from the vector length, o(n) extra bits, O(1) `rank1`
//! - **Select**: position of the i-th set bit in O(log n) rank probes
//! - **Sparse array**: values at a sparse subset of a logical array's
//!   positions with O(1) index-to-rank translation
//! - **Persistence**: length-prefixed recursive binary encoding with
//!   typed file magics
//!
//! ## Quick Start
//!
//! ```rust
//! use jacobson::{BitVector, RankSupport, SelectSupport, SparseArray};
//!
//! let bv = BitVector::from_binary_str("1001011101001010")?;
//! let rank = RankSupport::new(&bv);
//! assert_eq!(rank.rank1(7)?, 5);
//!
//! let select = SelectSupport::new(&rank);
//! assert_eq!(select.select1(4)?, 6);
//!
//! let mut array: SparseArray<String> = SparseArray::new();
//! array.create(10);
//! array.append("foo".to_string(), 1)?;
//! assert_eq!(array.get_at_index(1)?, Some(&"foo".to_string()));
//! # Ok::<(), jacobson::JacobsonError>(())
//! ```
//!
//! ## Bounds checking
//!
//! Index and argument validation on the query paths is controlled by the
//! `bounds-checks` cargo feature (enabled by default). Building with
//! `--no-default-features` removes those checks; every operation is then
//! defined only for valid inputs and the caller owns the contract.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod io;
pub mod sparse;
pub mod succinct;
pub mod util;

// Re-export core types
pub use error::{JacobsonError, Result};
pub use sparse::{SparseArray, SPARSE_MAGIC};
pub use succinct::{
    BitVector, PackedVector, RankDirectory, RankSupport, SelectSupport, RANK_MAGIC,
};

// Re-export the serialization surface
pub use io::{DataInput, DataOutput, FileDataOutput, Serializable, SliceDataInput, VecDataOutput};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_re_exports() {
        let bv = BitVector::new(16);
        let rank = RankSupport::new(&bv);
        let _select = SelectSupport::new(&rank);
        let _array = SparseArray::<u64>::default();

        let err = JacobsonError::out_of_range(1, 0);
        assert_eq!(err.category(), "range");
        assert_ne!(RANK_MAGIC, SPARSE_MAGIC);
    }
}
