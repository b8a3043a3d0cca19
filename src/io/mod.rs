//! Binary input/output for persisted index structures
//!
//! The file formats in this crate are built from two layers: the
//! [`DataInput`]/[`DataOutput`] byte-level abstractions, and the
//! [`Serializable`] trait providing the recursive, length-prefixed
//! encoding used for index tables and sparse-array values.

pub mod data_input;
pub mod data_output;
pub mod serialize;

pub use data_input::{DataInput, SliceDataInput};
pub use data_output::{DataOutput, FileDataOutput, VecDataOutput};
pub use serialize::Serializable;
