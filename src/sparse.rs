//! Sparse array over a succinct occupancy bit vector
//!
//! A `SparseArray<T>` is a logical array of `len()` positions of which
//! only a few hold values. Occupancy is a [`BitVector`] bit per position;
//! the values themselves sit densely in appended order, and a
//! [`RankDirectory`] translates a logical position to its slot in the
//! dense list in constant time.

use crate::error::{JacobsonError, Result};
use crate::io::serialize::serialize_seq;
use crate::io::{DataInput, DataOutput, FileDataOutput, Serializable, SliceDataInput};
use crate::succinct::{BitVector, RankDirectory};
use crate::util::ceil_div;
use std::path::Path;

/// File magic for persisted sparse arrays
pub const SPARSE_MAGIC: u32 = 0xDEAD_BEEF;

/// A logical array storing values at a sparse subset of positions
///
/// Positions must be appended in ascending order; the occupancy rank
/// index is repaired incrementally from each appended position, which
/// is only sound when everything before it is already final.
///
/// # Examples
///
/// ```rust
/// use jacobson::SparseArray;
///
/// let mut array = SparseArray::new();
/// array.create(10);
/// array.append("foo".to_string(), 1)?;
/// array.append("bar".to_string(), 5)?;
/// array.append("baz".to_string(), 9)?;
///
/// assert_eq!(array.get_at_index(5)?, Some(&"bar".to_string()));
/// assert_eq!(array.get_at_index(3)?, None);
/// assert_eq!(array.get_at_rank(1), Some(&"bar".to_string()));
/// assert_eq!(array.num_elem(), 3);
/// # Ok::<(), jacobson::JacobsonError>(())
/// ```
#[derive(Debug)]
pub struct SparseArray<T> {
    bitvector: BitVector,
    directory: RankDirectory,
    values: Vec<T>,
}

impl<T> SparseArray<T> {
    /// Create an empty placeholder array; call
    /// [`create`](SparseArray::create) before use
    pub fn new() -> Self {
        let bitvector = BitVector::new(8);
        let directory = RankDirectory::build(&bitvector);
        Self {
            bitvector,
            directory,
            values: Vec::new(),
        }
    }

    /// (Re)initialize to an empty array with `size` logical positions
    ///
    /// Replaces the occupancy vector and rank index and clears all
    /// values. Idempotent.
    pub fn create(&mut self, size: usize) {
        self.bitvector = BitVector::new(size);
        self.directory = RankDirectory::build(&self.bitvector);
        self.values.clear();
    }

    /// Store `value` at logical position `pos`
    ///
    /// Positions must arrive in ascending order. Fails with
    /// [`JacobsonError::OutOfRange`] when `pos` is past the end and
    /// [`JacobsonError::InvalidArgument`] when the position is already
    /// occupied or precedes an occupied one (both contract checks are
    /// elided without the `bounds-checks` feature).
    pub fn append(&mut self, value: T, pos: usize) -> Result<()> {
        #[cfg(feature = "bounds-checks")]
        {
            if self.bitvector.at(pos)? {
                return Err(JacobsonError::invalid_argument(format!(
                    "position {} already set",
                    pos
                )));
            }
            // rank below pos counts every occupied position iff they all
            // precede pos, making out-of-order appends cheap to detect
            if self.directory.rank1(&self.bitvector, pos)? != self.values.len() {
                return Err(JacobsonError::invalid_argument(format!(
                    "append at {} is below an occupied position; appends must be ascending",
                    pos
                )));
            }
        }

        self.values.push(value);
        self.bitvector.set(pos, true)?;
        self.directory.rebuild_from(&self.bitvector, pos);
        Ok(())
    }

    /// The value at logical position `index`, or `None` when the
    /// position is unoccupied
    ///
    /// Fails with [`JacobsonError::OutOfRange`] when `index >= len()`.
    pub fn get_at_index(&self, index: usize) -> Result<Option<&T>> {
        if !self.bitvector.at(index)? {
            return Ok(None);
        }
        let rank = self.directory.rank1(&self.bitvector, index)?;
        let value = rank
            .checked_sub(1)
            .and_then(|slot| self.values.get(slot))
            .ok_or_else(|| {
                JacobsonError::internal(format!(
                    "occupied position {} has rank {} but only {} values are stored",
                    index,
                    rank,
                    self.values.len()
                ))
            })?;
        Ok(Some(value))
    }

    /// The `rank`-th stored value (0-indexed), or `None` when fewer
    /// values are stored
    pub fn get_at_rank(&self, rank: usize) -> Option<&T> {
        self.values.get(rank)
    }

    /// Number of occupied positions at or before `index`
    pub fn num_elem_at(&self, index: usize) -> Result<usize> {
        self.directory.rank1(&self.bitvector, index)
    }

    /// The logical length: total positions the array can address
    pub fn len(&self) -> usize {
        self.bitvector.len()
    }

    /// Check if the array has zero logical positions
    pub fn is_empty(&self) -> bool {
        self.bitvector.is_empty()
    }

    /// Number of values currently stored
    pub fn num_elem(&self) -> usize {
        self.values.len()
    }

    /// Bits of metadata excluding the stored values themselves: the
    /// dense slots, the rank tables, and the occupancy bits
    pub fn overhead(&self) -> usize {
        8 * std::mem::size_of::<T>() * self.values.len()
            + self.directory.overhead_bits()
            + self.bitvector.len()
    }
}

impl<T: Serializable> SparseArray<T> {
    /// Persist the array to `path` in the `0xDEADBEEF` format
    ///
    /// With `with_tables` the rank directory is appended after the
    /// values; without it the loader rebuilds the directory from the
    /// occupancy bits.
    pub fn save<P: AsRef<Path>>(&self, path: P, with_tables: bool) -> Result<()> {
        let size = u32::try_from(self.bitvector.len()).map_err(|_| {
            JacobsonError::invalid_argument("logical size exceeds the 32-bit file format")
        })?;

        let mut output = FileDataOutput::create(path)?;
        output.write_u32(SPARSE_MAGIC)?;
        output.write_u32(std::mem::size_of::<T>() as u32)?;
        output.write_u32(size)?;
        output.write_bytes(self.bitvector.bytes())?;
        self.values.serialize(&mut output)?;
        if with_tables {
            serialize_seq(self.directory.superblocks(), &mut output)?;
            serialize_seq(self.directory.blocks(), &mut output)?;
        }
        output.flush()?;
        log::debug!(
            "saved sparse array: {} positions, {} values, {} bytes, tables={}",
            self.bitvector.len(),
            self.values.len(),
            output.bytes_written(),
            with_tables
        );
        Ok(())
    }

    /// Replace this array with one loaded from `path`
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = std::fs::read(path)?;
        let mut input = SliceDataInput::new(&bytes);

        let magic = input.read_u32()?;
        if magic != SPARSE_MAGIC {
            return Err(JacobsonError::corrupt(format!(
                "bad sparse array magic {:#010x}",
                magic
            )));
        }
        let elem_size = input.read_u32()? as usize;
        if elem_size != std::mem::size_of::<T>() {
            return Err(JacobsonError::corrupt(format!(
                "element size {} does not match the expected {}",
                elem_size,
                std::mem::size_of::<T>()
            )));
        }

        let size = input.read_u32()? as usize;
        let image = input.read_vec(ceil_div(size, 8))?;
        let bitvector = BitVector::from_bytes(size, &image)?;
        let values = Vec::<T>::deserialize(&mut input)?;

        // trailing rank tables are optional; absent means rebuild
        let directory = if input.has_more() {
            let superblocks = Vec::<u32>::deserialize(&mut input)?;
            let blocks = Vec::<u32>::deserialize(&mut input)?;
            RankDirectory::from_tables(&bitvector, superblocks, blocks)?
        } else {
            RankDirectory::build(&bitvector)
        };

        if values.len() != directory.total_ones() {
            return Err(JacobsonError::corrupt(format!(
                "{} values stored for {} occupied positions",
                values.len(),
                directory.total_ones()
            )));
        }

        self.bitvector = bitvector;
        self.directory = directory;
        self.values = values;
        Ok(())
    }
}

impl<T> Default for SparseArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_array() -> SparseArray<String> {
        let mut array = SparseArray::new();
        array.create(10);
        array.append("foo".to_string(), 1).unwrap();
        array.append("bar".to_string(), 5).unwrap();
        array.append("baz".to_string(), 9).unwrap();
        array
    }

    #[test]
    fn test_basic_usage() {
        let array = example_array();
        assert_eq!(array.len(), 10);
        assert_eq!(array.num_elem(), 3);
        assert_eq!(array.get_at_rank(1), Some(&"bar".to_string()));
        assert_eq!(array.get_at_rank(3), None);
        assert_eq!(array.get_at_index(3).unwrap(), None);
        assert_eq!(array.get_at_index(5).unwrap(), Some(&"bar".to_string()));
        assert_eq!(array.num_elem_at(5).unwrap(), 2);
        assert_eq!(array.num_elem_at(6).unwrap(), 2);
    }

    #[test]
    fn test_create_resets() {
        let mut array = example_array();
        array.create(20);
        assert_eq!(array.len(), 20);
        assert_eq!(array.num_elem(), 0);
        for i in 0..20 {
            assert_eq!(array.get_at_index(i).unwrap(), None);
        }
        // and it can be filled again
        array.append("again".to_string(), 19).unwrap();
        assert_eq!(array.get_at_index(19).unwrap(), Some(&"again".to_string()));
    }

    #[cfg(feature = "bounds-checks")]
    #[test]
    fn test_append_contract() {
        let mut array = example_array();
        // occupied position
        let err = array.append("dup".to_string(), 5).unwrap_err();
        assert_eq!(err.category(), "argument");
        // below an occupied position
        let err = array.append("late".to_string(), 7).unwrap_err();
        assert_eq!(err.category(), "argument");
        // past the end
        let err = array.append("far".to_string(), 10).unwrap_err();
        assert_eq!(err.category(), "range");
        // the failures left the array unchanged
        assert_eq!(array.num_elem(), 3);
    }

    #[cfg(feature = "bounds-checks")]
    #[test]
    fn test_get_at_index_bounds() {
        let array = example_array();
        assert_eq!(array.get_at_index(10).unwrap_err().category(), "range");
        assert_eq!(array.num_elem_at(10).unwrap_err().category(), "range");
    }

    #[test]
    fn test_index_and_rank_agree() {
        let array = example_array();
        for index in 0..array.len() {
            if let Some(value) = array.get_at_index(index).unwrap() {
                let rank = array.num_elem_at(index).unwrap();
                assert_eq!(array.get_at_rank(rank - 1), Some(value));
            }
        }
    }

    #[test]
    fn test_overhead_accounts_for_all_metadata() {
        let array = example_array();
        let expected = 8 * std::mem::size_of::<String>() * 3
            + array.directory.overhead_bits()
            + array.bitvector.len();
        assert_eq!(array.overhead(), expected);
    }

    #[test]
    fn test_save_load_with_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strings.sparse");

        let array = example_array();
        array.save(&path, true).unwrap();

        let mut loaded = SparseArray::<String>::new();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.len(), 10);
        assert_eq!(loaded.num_elem(), 3);
        for index in 0..10 {
            assert_eq!(
                loaded.get_at_index(index).unwrap(),
                array.get_at_index(index).unwrap()
            );
        }
    }

    #[test]
    fn test_save_load_without_tables_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let with_path = dir.path().join("with.sparse");
        let without_path = dir.path().join("without.sparse");

        let array = example_array();
        array.save(&with_path, true).unwrap();
        array.save(&without_path, false).unwrap();

        let with_len = std::fs::metadata(&with_path).unwrap().len();
        let without_len = std::fs::metadata(&without_path).unwrap().len();
        assert!(without_len < with_len);

        let mut from_tables = SparseArray::<String>::new();
        from_tables.load(&with_path).unwrap();
        let mut rebuilt = SparseArray::<String>::new();
        rebuilt.load(&without_path).unwrap();

        for index in 0..10 {
            assert_eq!(
                from_tables.get_at_index(index).unwrap(),
                rebuilt.get_at_index(index).unwrap()
            );
        }
        for rank in 0..4 {
            assert_eq!(from_tables.get_at_rank(rank), rebuilt.get_at_rank(rank));
        }
    }

    #[test]
    fn test_load_rejects_corruption() {
        let dir = tempfile::tempdir().unwrap();

        let junk = dir.path().join("junk.sparse");
        std::fs::write(&junk, [0u8; 32]).unwrap();
        let mut array = SparseArray::<u64>::new();
        assert_eq!(array.load(&junk).unwrap_err().category(), "corrupt");

        // element size recorded for u32 must not load as u64
        let narrow = dir.path().join("narrow.sparse");
        let mut source = SparseArray::<u32>::new();
        source.create(16);
        source.append(7, 3).unwrap();
        source.save(&narrow, true).unwrap();
        let mut wide = SparseArray::<u64>::new();
        assert_eq!(wide.load(&narrow).unwrap_err().category(), "corrupt");
    }

    #[test]
    fn test_empty_array_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.sparse");

        let mut array = SparseArray::<u64>::new();
        array.create(100);
        array.save(&path, false).unwrap();

        let mut loaded = SparseArray::<u64>::new();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.len(), 100);
        assert_eq!(loaded.num_elem(), 0);
        assert_eq!(loaded.get_at_index(50).unwrap(), None);
    }
}
