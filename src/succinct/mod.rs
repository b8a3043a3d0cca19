//! Succinct bit-indexed primitives
//!
//! This module provides the packed [`BitVector`], the two-level
//! [`RankDirectory`]/[`RankSupport`] index answering rank queries in
//! constant time, the stateless [`SelectSupport`] answering select by
//! binary search over rank, and the [`PackedVector`] fixed-width
//! integer array.

pub mod bit_vector;
pub mod packed;
pub mod rank;
pub mod select;

pub use bit_vector::BitVector;
pub use packed::PackedVector;
pub use rank::{RankDirectory, RankSupport, RANK_MAGIC};
pub use select::SelectSupport;
