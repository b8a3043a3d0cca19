//! Two-level rank directory with constant-time rank queries
//!
//! The directory splits the bit vector into superblocks of `s` bits and
//! blocks of `b` bits, where for `lg = log2(next_pow2(n))`:
//!
//! ```text
//! s = lg * lg / 2        (truncating, clamped to >= 1)
//! b = lg / 2             (truncating, clamped to >= 1)
//! ```
//!
//! `superblocks[k]` holds the absolute popcount before superblock `k`;
//! `blocks[j]` holds the popcount from the start of the enclosing
//! superblock to the start of block `j`. A rank query is two table reads
//! plus one bounded in-word popcount. These exact sizing formulas are
//! load-bearing: persisted directories are only interoperable with
//! builders that match them.

use crate::error::{check_bounds, JacobsonError, Result};
use crate::io::serialize::serialize_seq;
use crate::io::{DataInput, DataOutput, FileDataOutput, Serializable, SliceDataInput};
use crate::succinct::BitVector;
use crate::util::{ceil_div, round_up_pow2};
use std::path::Path;

/// File magic for persisted rank directories
pub const RANK_MAGIC: u32 = 0xFEED_BEEF;

/// Owned rank index tables over some bit vector
///
/// The directory holds no reference to the bits it indexes; every query
/// takes the backing [`BitVector`] as a parameter, and the caller is
/// responsible for passing the same vector the tables were built from
/// (or calling [`rebuild_from`](RankDirectory::rebuild_from) after
/// mutating it). [`RankSupport`] packages a directory with a borrow of
/// its bit vector for the common case; [`crate::SparseArray`] embeds a
/// directory next to the vector it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankDirectory {
    superblock_size: usize,
    block_size: usize,
    superblocks: Vec<u32>,
    blocks: Vec<u32>,
    total_ones: usize,
}

impl RankDirectory {
    /// Build a directory for `bitvector`, walking its bits once
    pub fn build(bitvector: &BitVector) -> Self {
        let (superblock_size, block_size) = Self::derive_params(bitvector.len());
        log::debug!(
            "building rank directory: n={} superblock={} block={}",
            bitvector.len(),
            superblock_size,
            block_size
        );
        let mut directory = Self {
            superblock_size,
            block_size,
            superblocks: vec![0u32; ceil_div(bitvector.len(), superblock_size)],
            blocks: vec![0u32; ceil_div(bitvector.len(), block_size)],
            total_ones: 0,
        };
        directory.rebuild_from(bitvector, 0);
        directory
    }

    /// Reassemble a directory from persisted tables
    ///
    /// Table lengths are validated against `bitvector` and the given
    /// sizes; `total_ones` is refreshed from the bits.
    pub(crate) fn from_saved(
        bitvector: &BitVector,
        superblock_size: usize,
        block_size: usize,
        superblocks: Vec<u32>,
        blocks: Vec<u32>,
    ) -> Result<Self> {
        if superblock_size == 0 || block_size == 0 || block_size > superblock_size {
            return Err(JacobsonError::corrupt(format!(
                "implausible rank directory sizing: superblock={} block={}",
                superblock_size, block_size
            )));
        }
        let n = bitvector.len();
        if superblocks.len() != ceil_div(n, superblock_size)
            || blocks.len() != ceil_div(n, block_size)
        {
            return Err(JacobsonError::corrupt(format!(
                "rank table lengths {}/{} do not match a {}-bit vector",
                superblocks.len(),
                blocks.len(),
                n
            )));
        }
        Ok(Self {
            superblock_size,
            block_size,
            superblocks,
            blocks,
            total_ones: bitvector.popcount(),
        })
    }

    /// Reassemble a directory from persisted tables whose sizing was not
    /// stored, deriving superblock/block widths from the vector length
    pub(crate) fn from_tables(
        bitvector: &BitVector,
        superblocks: Vec<u32>,
        blocks: Vec<u32>,
    ) -> Result<Self> {
        let (superblock_size, block_size) = Self::derive_params(bitvector.len());
        Self::from_saved(bitvector, superblock_size, block_size, superblocks, blocks)
    }

    /// Superblock and block widths in bits for an `n`-bit vector
    fn derive_params(n: usize) -> (usize, usize) {
        let pow2 = round_up_pow2(u32::try_from(n).unwrap_or(u32::MAX));
        let lg = pow2.trailing_zeros() as usize;
        ((lg * lg / 2).max(1), (lg / 2).max(1))
    }

    /// The number of 1 bits in `bitvector[0..=i]`, inclusive of `i`
    ///
    /// Fails with [`JacobsonError::OutOfRange`] when `i >= bitvector.len()`.
    #[inline]
    pub fn rank1(&self, bitvector: &BitVector, i: usize) -> Result<usize> {
        check_bounds(i, bitvector.len())?;
        let block_start = (i / self.block_size) * self.block_size;
        let tail = bitvector.popcount_range(block_start, i % self.block_size + 1)?;
        Ok(self.superblocks[i / self.superblock_size] as usize
            + self.blocks[i / self.block_size] as usize
            + tail)
    }

    /// Refresh the tables from the superblock containing `start_index`
    /// to the end of the vector
    ///
    /// Entries below that superblock are trusted as-is. After a single
    /// bit flip at position `p` with every earlier entry still valid
    /// (the mutation pattern of [`crate::SparseArray::append`]), calling
    /// this with `start_index = p` restores the whole directory in
    /// O(n - s * (p / s)) instead of O(n).
    pub fn rebuild_from(&mut self, bitvector: &BitVector, start_index: usize) {
        let n = bitvector.len();
        if n == 0 {
            self.total_ones = 0;
            return;
        }
        let start = (start_index.min(n - 1) / self.superblock_size) * self.superblock_size;
        let mut superblock_sum = self.superblocks[start / self.superblock_size] as usize;
        let mut block_sum = 0usize;
        for i in start..n {
            if i % self.superblock_size == 0 {
                self.superblocks[i / self.superblock_size] = superblock_sum as u32;
                block_sum = 0;
            }
            if i % self.block_size == 0 {
                self.blocks[i / self.block_size] = block_sum as u32;
            }
            let bit = bitvector.get(i) as usize;
            block_sum += bit;
            superblock_sum += bit;
        }
        self.total_ones = superblock_sum;
    }

    /// Total number of 1 bits in the indexed vector, O(1)
    #[inline]
    pub fn total_ones(&self) -> usize {
        self.total_ones
    }

    /// Superblock width in bits
    pub fn superblock_size(&self) -> usize {
        self.superblock_size
    }

    /// Block width in bits
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Bits occupied by the two index tables
    pub fn overhead_bits(&self) -> usize {
        32 * (self.superblocks.len() + self.blocks.len())
    }

    /// Raw superblock table, for serialization
    pub(crate) fn superblocks(&self) -> &[u32] {
        &self.superblocks
    }

    /// Raw block table, for serialization
    pub(crate) fn blocks(&self) -> &[u32] {
        &self.blocks
    }
}

/// Constant-time rank over a borrowed bit vector
///
/// Owns a [`RankDirectory`] and the borrow tying it to the vector it was
/// built from, so the compiler enforces that the bits cannot be mutated
/// or dropped while rank queries are possible.
///
/// # Examples
///
/// ```rust
/// use jacobson::{BitVector, RankSupport};
///
/// let bv = BitVector::from_binary_str("1001011101001010")?;
/// let rank = RankSupport::new(&bv);
///
/// assert_eq!(rank.rank1(0)?, 1);
/// assert_eq!(rank.rank1(7)?, 5);
/// assert_eq!(rank.rank1(15)?, 8);
/// assert_eq!(rank.total_ones(), 8);
/// # Ok::<(), jacobson::JacobsonError>(())
/// ```
#[derive(Debug)]
pub struct RankSupport<'a> {
    bitvector: &'a BitVector,
    directory: RankDirectory,
}

impl<'a> RankSupport<'a> {
    /// Build rank support for `bitvector`
    pub fn new(bitvector: &'a BitVector) -> Self {
        Self {
            bitvector,
            directory: RankDirectory::build(bitvector),
        }
    }

    /// The number of 1 bits in positions `0..=i`, inclusive of `i`
    #[inline]
    pub fn rank1(&self, i: usize) -> Result<usize> {
        self.directory.rank1(self.bitvector, i)
    }

    /// Alias for [`rank1`](RankSupport::rank1), keeping call sites close
    /// to the `rank(i)` notation of the literature
    #[inline]
    pub fn rank(&self, i: usize) -> Result<usize> {
        self.rank1(i)
    }

    /// Total number of 1 bits, O(1)
    pub fn total_ones(&self) -> usize {
        self.directory.total_ones()
    }

    /// Length in bits of the underlying bit vector
    pub fn len(&self) -> usize {
        self.bitvector.len()
    }

    /// Check if the underlying bit vector is empty
    pub fn is_empty(&self) -> bool {
        self.bitvector.is_empty()
    }

    /// The bit vector this support indexes
    pub fn bit_vector(&self) -> &'a BitVector {
        self.bitvector
    }

    /// The index tables
    pub fn directory(&self) -> &RankDirectory {
        &self.directory
    }

    /// Bits of metadata held beside the bit vector
    pub fn overhead(&self) -> usize {
        self.directory.overhead_bits()
    }

    /// Persist the directory to `path` in the `0xFEEDBEEF` format
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut output = FileDataOutput::create(path)?;
        output.write_u32(RANK_MAGIC)?;
        output.write_u32(self.directory.superblock_size() as u32)?;
        output.write_u32(self.directory.block_size() as u32)?;
        serialize_seq(self.directory.superblocks(), &mut output)?;
        serialize_seq(self.directory.blocks(), &mut output)?;
        output.flush()?;
        log::debug!(
            "saved rank directory: {} bytes, {} superblocks, {} blocks",
            output.bytes_written(),
            self.directory.superblocks().len(),
            self.directory.blocks().len()
        );
        Ok(())
    }

    /// Replace the directory with one loaded from `path`
    ///
    /// The file must describe a directory for a vector of this exact
    /// length; anything else fails with [`JacobsonError::Corrupt`].
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = std::fs::read(path)?;
        let mut input = SliceDataInput::new(&bytes);
        let magic = input.read_u32()?;
        if magic != RANK_MAGIC {
            return Err(JacobsonError::corrupt(format!(
                "bad rank directory magic {:#010x}",
                magic
            )));
        }
        let superblock_size = input.read_u32()? as usize;
        let block_size = input.read_u32()? as usize;
        let superblocks = Vec::<u32>::deserialize(&mut input)?;
        let blocks = Vec::<u32>::deserialize(&mut input)?;
        self.directory = RankDirectory::from_saved(
            self.bitvector,
            superblock_size,
            block_size,
            superblocks,
            blocks,
        )?;
        Ok(())
    }
}
