//! Packed fixed-width integer array
//!
//! Stores `len` unsigned integers of `bits_per_element` bits each,
//! back-to-back in 64-bit words. An element may straddle a word boundary;
//! the bit-range helpers in [`crate::util`] splice the two halves.

use crate::error::{check_bounds, JacobsonError, Result};
use crate::util::{ceil_div, get_bit_range, set_bit_range};

/// A fixed-length array of fixed-width unsigned integers
///
/// # Examples
///
/// ```rust
/// use jacobson::PackedVector;
///
/// let mut pv = PackedVector::new(100, 12)?;
/// pv.set(0, 0xABC)?;
/// pv.set(99, 7)?;
///
/// assert_eq!(pv.at(0)?, 0xABC);
/// assert_eq!(pv.at(99)?, 7);
/// assert_eq!(pv.at(50)?, 0);
/// # Ok::<(), jacobson::JacobsonError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedVector {
    len: usize,
    bits_per_element: usize,
    words: Vec<u64>,
}

impl PackedVector {
    /// Create a zero-filled packed vector holding `len` elements of
    /// `bits_per_element` bits each
    ///
    /// Fails with [`JacobsonError::InvalidArgument`] unless
    /// `1 <= bits_per_element <= 64`.
    pub fn new(len: usize, bits_per_element: usize) -> Result<Self> {
        if bits_per_element == 0 || bits_per_element > 64 {
            return Err(JacobsonError::invalid_argument(format!(
                "element width must be 1..=64 bits, got {}",
                bits_per_element
            )));
        }
        Ok(Self {
            len,
            bits_per_element,
            words: vec![0u64; ceil_div(len * bits_per_element, 64)],
        })
    }

    /// Get element `index` without bounds checking
    pub fn get(&self, index: usize) -> u64 {
        let bit = index * self.bits_per_element;
        let word = bit / 64;
        let offset = (bit % 64) as u32;
        let in_word = (64 - offset as usize).min(self.bits_per_element) as u32;

        let mut value = get_bit_range(self.words[word], offset, in_word);
        let spill = self.bits_per_element as u32 - in_word;
        if spill > 0 {
            value |= get_bit_range(self.words[word + 1], 0, spill) << in_word;
        }
        value
    }

    /// Get element `index`, failing with [`JacobsonError::OutOfRange`]
    /// when `index >= len()`
    pub fn at(&self, index: usize) -> Result<u64> {
        check_bounds(index, self.len)?;
        Ok(self.get(index))
    }

    /// Store the low `bits_per_element` bits of `value` at `index`
    ///
    /// Fails with [`JacobsonError::InvalidArgument`] if `value` does not
    /// fit the element width.
    pub fn set(&mut self, index: usize, value: u64) -> Result<()> {
        check_bounds(index, self.len)?;
        if self.bits_per_element < 64 && value >> self.bits_per_element != 0 {
            return Err(JacobsonError::invalid_argument(format!(
                "value {:#x} does not fit in {} bits",
                value, self.bits_per_element
            )));
        }

        let bit = index * self.bits_per_element;
        let word = bit / 64;
        let offset = (bit % 64) as u32;
        let in_word = (64 - offset as usize).min(self.bits_per_element) as u32;

        self.words[word] = set_bit_range(self.words[word], offset, in_word, value);
        let spill = self.bits_per_element as u32 - in_word;
        if spill > 0 {
            self.words[word + 1] = set_bit_range(self.words[word + 1], 0, spill, value >> in_word);
        }
        Ok(())
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the vector holds zero elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Width of each element in bits
    pub fn bits_per_element(&self) -> usize {
        self.bits_per_element
    }
}
