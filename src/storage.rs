//! Indexed SI-valued storage for vectors and matrices
//!
//! [`IndexedStorage`] is a 1-D (`1 × n`) or 2-D array tagged Dense or
//! Sparse, Mutable or Immutable. The cells live in a reference-counted
//! buffer shared between clones. A write copies the buffer only while
//! another storage still holds it, whichever side writes first; once the
//! buffer is private later writes reuse it.
//!
//! Writes are refused on Immutable storage. Element-wise binary operations
//! produce Dense storage iff both operands are Dense.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use num_traits::Float;

use crate::error::{Result, UnitError};

/// Cell layout of an [`IndexedStorage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageLayout {
    /// Every cell is stored
    Dense,
    /// Only non-zero cells are stored, keyed by row-major index
    Sparse,
}

#[derive(Debug, Clone, PartialEq)]
enum Cells<T> {
    Dense(Vec<T>),
    Sparse(BTreeMap<usize, T>),
}

/// Dense or sparse, mutable or immutable array of SI values
///
/// `Clone` shares the buffer and flags the clone as possibly sharing it.
/// The flag is bookkeeping only: every write goes through `Arc::make_mut`,
/// which copies exactly when the reference count says the buffer is shared.
#[derive(Debug)]
pub struct IndexedStorage<T> {
    rows: usize,
    cols: usize,
    cells: Arc<Cells<T>>,
    mutable: bool,
    copy_on_write: bool,
}

impl<T: Float> IndexedStorage<T> {
    /// Dense `rows × cols` storage from row-major values
    pub fn dense(rows: usize, cols: usize, values: Vec<T>) -> Result<Self> {
        check_len(rows, cols, values.len())?;
        Ok(Self::from_cells(rows, cols, Cells::Dense(values)))
    }

    /// Sparse `rows × cols` storage from row-major values; zeros are dropped
    pub fn sparse(rows: usize, cols: usize, values: Vec<T>) -> Result<Self> {
        check_len(rows, cols, values.len())?;
        let cells = values
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_zero())
            .collect();
        Ok(Self::from_cells(rows, cols, Cells::Sparse(cells)))
    }

    /// `1 × n` storage in the given layout
    pub fn row(layout: StorageLayout, values: Vec<T>) -> Self {
        let cols = values.len();
        let cells = match layout {
            StorageLayout::Dense => Cells::Dense(values),
            StorageLayout::Sparse => Cells::Sparse(
                values
                    .into_iter()
                    .enumerate()
                    .filter(|(_, v)| !v.is_zero())
                    .collect(),
            ),
        };
        Self::from_cells(1, cols, cells)
    }

    /// Sparse storage from `((row, col), value)` entries; later entries win
    pub fn from_sparse_entries(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = ((usize, usize), T)>,
    ) -> Result<Self> {
        let mut cells = BTreeMap::new();
        for ((row, col), value) in entries {
            let index = index_of(rows, cols, row, col)?;
            if value.is_zero() {
                cells.remove(&index);
            } else {
                cells.insert(index, value);
            }
        }
        Ok(Self::from_cells(rows, cols, Cells::Sparse(cells)))
    }

    /// All-zero storage
    pub fn zeros(layout: StorageLayout, rows: usize, cols: usize) -> Self {
        let cells = match layout {
            StorageLayout::Dense => Cells::Dense(vec![T::zero(); rows * cols]),
            StorageLayout::Sparse => Cells::Sparse(BTreeMap::new()),
        };
        Self::from_cells(rows, cols, cells)
    }

    fn from_cells(rows: usize, cols: usize, cells: Cells<T>) -> Self {
        Self {
            rows,
            cols,
            cells: Arc::new(cells),
            mutable: false,
            copy_on_write: false,
        }
    }

    pub fn layout(&self) -> StorageLayout {
        match *self.cells {
            Cells::Dense(_) => StorageLayout::Dense,
            Cells::Sparse(_) => StorageLayout::Sparse,
        }
    }

    pub fn is_dense(&self) -> bool {
        self.layout() == StorageLayout::Dense
    }

    pub fn is_sparse(&self) -> bool {
        self.layout() == StorageLayout::Sparse
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, zeros included
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of non-zero cells
    pub fn cardinality(&self) -> usize {
        match &*self.cells {
            Cells::Dense(values) => values.iter().filter(|v| !v.is_zero()).count(),
            Cells::Sparse(cells) => cells.values().filter(|v| !v.is_zero()).count(),
        }
    }

    /// Cell at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        let index = index_of(self.rows, self.cols, row, col)?;
        Ok(self.cell(index))
    }

    fn cell(&self, index: usize) -> T {
        match &*self.cells {
            Cells::Dense(values) => values[index],
            Cells::Sparse(cells) => cells.get(&index).copied().unwrap_or_else(T::zero),
        }
    }

    /// All cells in row-major order
    pub fn to_vec(&self) -> Vec<T> {
        match &*self.cells {
            Cells::Dense(values) => values.clone(),
            Cells::Sparse(cells) => {
                let mut values = vec![T::zero(); self.len()];
                for (&index, &value) in cells {
                    values[index] = value;
                }
                values
            }
        }
    }

    /// Sum of all cells
    pub fn sum(&self) -> T {
        match &*self.cells {
            Cells::Dense(values) => values.iter().fold(T::zero(), |acc, &v| acc + v),
            Cells::Sparse(cells) => cells.values().fold(T::zero(), |acc, &v| acc + v),
        }
    }

    /// Deep copy with a private buffer; keeps the mutability flag
    pub fn copy(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            cells: Arc::new((*self.cells).clone()),
            mutable: self.mutable,
            copy_on_write: false,
        }
    }

    /// This storage when already dense, a dense copy otherwise
    pub fn to_dense(&self) -> Cow<'_, Self> {
        match &*self.cells {
            Cells::Dense(_) => Cow::Borrowed(self),
            Cells::Sparse(_) => Cow::Owned(self.relayout(Cells::Dense(self.to_vec()))),
        }
    }

    /// This storage when already sparse, a sparse copy otherwise
    pub fn to_sparse(&self) -> Cow<'_, Self> {
        match &*self.cells {
            Cells::Sparse(_) => Cow::Borrowed(self),
            Cells::Dense(values) => {
                let cells = values
                    .iter()
                    .copied()
                    .enumerate()
                    .filter(|(_, v)| !v.is_zero())
                    .collect();
                Cow::Owned(self.relayout(Cells::Sparse(cells)))
            }
        }
    }

    fn relayout(&self, cells: Cells<T>) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            cells: Arc::new(cells),
            mutable: self.mutable,
            copy_on_write: false,
        }
    }

    /// Writable clone sharing the buffer until either side writes
    pub fn mutable(&self) -> Self {
        Self {
            mutable: true,
            ..self.clone()
        }
    }

    /// Read-only clone sharing the buffer
    pub fn immutable(&self) -> Self {
        Self {
            mutable: false,
            copy_on_write: false,
            ..self.clone()
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Whether this storage came from a clone and has not written since
    ///
    /// A set flag does not promise a copy: if every other holder has been
    /// dropped the next write reuses the buffer. Use [`Self::is_unique`] to
    /// ask whether a write would copy.
    pub fn is_copy_on_write(&self) -> bool {
        self.copy_on_write
    }

    /// Whether both storages read the same buffer
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    /// Whether no other storage shares this buffer
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.cells) == 1
    }

    /// Gate every in-place write goes through
    ///
    /// Fails with [`UnitError::ImmutableMutation`] on immutable storage.
    /// Makes the buffer private when it is still shared (any holder, flagged
    /// or not) and clears the copy-on-write flag.
    pub fn check_copy_on_write(&mut self) -> Result<()> {
        if !self.mutable {
            return Err(UnitError::ImmutableMutation);
        }
        if !self.is_unique() {
            tracing::trace!(rows = self.rows, cols = self.cols, "copy-on-write");
            Arc::make_mut(&mut self.cells);
        }
        self.copy_on_write = false;
        Ok(())
    }

    /// Write one cell; writing zero into sparse storage drops the cell
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let index = index_of(self.rows, self.cols, row, col)?;
        self.check_copy_on_write()?;
        match Arc::make_mut(&mut self.cells) {
            Cells::Dense(values) => values[index] = value,
            Cells::Sparse(cells) => {
                if value.is_zero() {
                    cells.remove(&index);
                } else {
                    cells.insert(index, value);
                }
            }
        }
        Ok(())
    }

    /// Apply `f` to every cell in place
    ///
    /// Sparse storage stays sparse when `f` maps zero to zero; otherwise every
    /// cell becomes explicit.
    pub fn map_in_place(&mut self, f: impl Fn(T) -> T) -> Result<()> {
        self.check_copy_on_write()?;
        let len = self.len();
        map_cells(Arc::make_mut(&mut self.cells), len, f);
        Ok(())
    }

    /// New immutable storage with `f` applied to every cell, same layout
    pub fn map(&self, f: impl Fn(T) -> T) -> Self {
        let mut cells = (*self.cells).clone();
        map_cells(&mut cells, self.len(), f);
        Self::from_cells(self.rows, self.cols, cells)
    }

    /// Element-wise `f(self, other)`
    ///
    /// The result is Dense iff both operands are Dense. A sparse result
    /// stores the union of both operands' cells; implicit cells hold
    /// `f(0, 0)`, so every cell is stored when that is not zero.
    pub fn zip_with(&self, other: &Self, f: impl Fn(T, T) -> T) -> Result<Self> {
        if (self.rows, self.cols) != (other.rows, other.cols) {
            return Err(UnitError::ShapeMismatch {
                left: (self.rows, self.cols),
                right: (other.rows, other.cols),
            });
        }
        let cells = match (&*self.cells, &*other.cells) {
            (Cells::Dense(a), Cells::Dense(b)) => {
                Cells::Dense(a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect())
            }
            (a, b) => {
                let zero = f(T::zero(), T::zero());
                let mut cells = BTreeMap::new();
                let mut put = |index: usize| {
                    let value = f(self.cell(index), other.cell(index));
                    if !value.is_zero() {
                        cells.insert(index, value);
                    }
                };
                if zero.is_zero() {
                    stored_indices(a).for_each(&mut put);
                    stored_indices(b).for_each(&mut put);
                } else {
                    (0..self.len()).for_each(put);
                }
                Cells::Sparse(cells)
            }
        };
        Ok(Self::from_cells(self.rows, self.cols, cells))
    }
}

fn map_cells<T: Float>(cells: &mut Cells<T>, len: usize, f: impl Fn(T) -> T) {
    match cells {
        Cells::Dense(values) => values.iter_mut().for_each(|v| *v = f(*v)),
        Cells::Sparse(cells) => {
            let zero = f(T::zero());
            if zero.is_zero() {
                cells.values_mut().for_each(|v| *v = f(*v));
                cells.retain(|_, v| !v.is_zero());
            } else {
                for index in 0..len {
                    let value = cells.get(&index).map_or(zero, |&v| f(v));
                    cells.insert(index, value);
                }
            }
        }
    }
}

fn stored_indices<T: Float>(cells: &Cells<T>) -> Box<dyn Iterator<Item = usize> + '_> {
    match cells {
        Cells::Dense(values) => Box::new(
            values
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_zero())
                .map(|(i, _)| i),
        ),
        Cells::Sparse(cells) => Box::new(cells.keys().copied()),
    }
}

fn check_len(rows: usize, cols: usize, len: usize) -> Result<()> {
    if rows * cols != len {
        return Err(UnitError::ShapeMismatch {
            left: (rows, cols),
            right: (1, len),
        });
    }
    Ok(())
}

fn index_of(rows: usize, cols: usize, row: usize, col: usize) -> Result<usize> {
    if row >= rows || col >= cols {
        return Err(UnitError::IndexOutOfBounds {
            row,
            col,
            rows,
            cols,
        });
    }
    Ok(row * cols + col)
}

impl<T> Clone for IndexedStorage<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            cells: Arc::clone(&self.cells),
            mutable: self.mutable,
            copy_on_write: true,
        }
    }
}

impl<T: Float> PartialEq for IndexedStorage<T> {
    /// Same shape and cell values; layout and flags are ignored
    fn eq(&self, other: &Self) -> bool {
        (self.rows, self.cols) == (other.rows, other.cols)
            && (self.shares_buffer_with(other) || self.to_vec() == other.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: &[f64]) -> IndexedStorage<f64> {
        IndexedStorage::dense(1, values.len(), values.to_vec()).unwrap()
    }

    #[test]
    fn test_dense_and_sparse_construction() {
        let dense = vector(&[1.0, 0.0, 3.0]);
        assert!(dense.is_dense());
        assert_eq!(dense.cardinality(), 2);
        assert_eq!(dense.len(), 3);

        let sparse = IndexedStorage::sparse(1, 3, vec![1.0, 0.0, 3.0]).unwrap();
        assert!(sparse.is_sparse());
        assert_eq!(sparse.cardinality(), 2);
        assert_eq!(sparse.get(0, 1).unwrap(), 0.0);
        assert_eq!(sparse, dense);

        assert!(matches!(
            IndexedStorage::dense(2, 2, vec![1.0]),
            Err(UnitError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_sparse_entries() {
        let m = IndexedStorage::from_sparse_entries(2, 3, [((0, 1), 2.0), ((1, 2), 5.0), ((0, 1), 4.0)])
            .unwrap();
        assert_eq!(m.to_vec(), vec![0.0, 4.0, 0.0, 0.0, 0.0, 5.0]);
        assert!(matches!(
            IndexedStorage::from_sparse_entries(2, 2, [((2, 0), 1.0)]),
            Err(UnitError::IndexOutOfBounds { row: 2, col: 0, rows: 2, cols: 2 })
        ));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let v = vector(&[1.0, 2.0]);
        assert_eq!(v.get(0, 1).unwrap(), 2.0);
        assert!(matches!(v.get(0, 2), Err(UnitError::IndexOutOfBounds { .. })));
        assert!(matches!(v.get(1, 0), Err(UnitError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_immutable_rejects_writes() {
        let mut v = vector(&[1.0, 2.0]);
        assert!(!v.is_mutable());
        assert_eq!(v.set(0, 0, 5.0), Err(UnitError::ImmutableMutation));
        assert_eq!(v.map_in_place(|x| x * 2.0), Err(UnitError::ImmutableMutation));
    }

    #[test]
    fn test_copy_on_write_copies_once() {
        let v = vector(&[1.0, 2.0, 3.0]);
        let mut m = v.mutable();
        assert!(m.is_mutable());
        assert!(m.is_copy_on_write());
        assert!(m.shares_buffer_with(&v));

        m.set(0, 0, 10.0).unwrap();
        assert!(!m.shares_buffer_with(&v));
        assert!(!m.is_copy_on_write());
        assert_eq!(v.to_vec(), vec![1.0, 2.0, 3.0]);

        let buffer = Arc::as_ptr(&m.cells);
        m.set(0, 1, 20.0).unwrap();
        assert_eq!(Arc::as_ptr(&m.cells), buffer);
        assert_eq!(m.to_vec(), vec![10.0, 20.0, 3.0]);
    }

    #[test]
    fn test_clone_of_mutable_is_isolated() {
        let mut a = vector(&[1.0, 2.0]).mutable();
        a.set(0, 0, 5.0).unwrap();
        let mut b = a.clone();
        b.set(0, 1, 7.0).unwrap();
        a.set(0, 0, 6.0).unwrap();
        assert_eq!(a.to_vec(), vec![6.0, 2.0]);
        assert_eq!(b.to_vec(), vec![5.0, 7.0]);
    }

    #[test]
    fn test_original_unaffected_by_writes_after_mutable() {
        let mut a = vector(&[1.0, 2.0, 3.0]).mutable();
        a.set(0, 0, 4.0).unwrap();
        assert!(!a.is_copy_on_write());

        let b = a.mutable();
        assert!(a.shares_buffer_with(&b));
        assert!(!a.is_copy_on_write());
        assert!(!a.is_unique());

        // the unflagged side writes first and still gets its own buffer
        a.set(0, 0, 9.0).unwrap();
        assert!(!a.shares_buffer_with(&b));
        assert_eq!(a.to_vec(), vec![9.0, 2.0, 3.0]);
        assert_eq!(b.to_vec(), vec![4.0, 2.0, 3.0]);
        assert!(b.is_copy_on_write());
        assert!(b.is_unique());
    }

    #[test]
    fn test_flagged_sole_holder_writes_in_place() {
        let mut m = vector(&[1.0, 2.0]).mutable();
        assert!(m.is_copy_on_write());
        assert!(m.is_unique());
        let buffer = Arc::as_ptr(&m.cells);
        m.set(0, 1, 5.0).unwrap();
        assert_eq!(Arc::as_ptr(&m.cells), buffer);
        assert!(!m.is_copy_on_write());
    }

    #[test]
    fn test_immutable_view() {
        let mut m = vector(&[1.0, 2.0]).mutable();
        m.set(0, 0, 3.0).unwrap();
        let frozen = m.immutable();
        assert!(!frozen.is_mutable());
        assert!(!frozen.is_copy_on_write());
        assert!(frozen.shares_buffer_with(&m));

        m.set(0, 0, 4.0).unwrap();
        assert_eq!(frozen.to_vec(), vec![3.0, 2.0]);
        assert_eq!(m.to_vec(), vec![4.0, 2.0]);
    }

    #[test]
    fn test_copy_is_deep() {
        let v = vector(&[1.0, 2.0]);
        let c = v.copy();
        assert!(!c.shares_buffer_with(&v));
        assert!(!c.is_copy_on_write());
        assert_eq!(c, v);
    }

    #[test]
    fn test_layout_conversion_borrows_when_unchanged() {
        let dense = vector(&[0.0, 2.0]);
        assert!(matches!(dense.to_dense(), Cow::Borrowed(_)));
        let sparse = dense.to_sparse();
        assert!(matches!(sparse, Cow::Owned(_)));
        assert!(sparse.is_sparse());
        assert_eq!(sparse.cardinality(), 1);
        assert!(matches!(sparse.to_sparse(), Cow::Borrowed(_)));
        assert_eq!(sparse.to_dense().to_vec(), vec![0.0, 2.0]);
    }

    #[test]
    fn test_zip_with_layout_rule() {
        let d1 = vector(&[1.0, 0.0, 3.0]);
        let d2 = vector(&[4.0, 5.0, 0.0]);
        let s1 = IndexedStorage::sparse(1, 3, vec![0.0, 2.0, 0.0]).unwrap();
        let s2 = IndexedStorage::sparse(1, 3, vec![1.0, 0.0, 0.0]).unwrap();

        let add = |a: f64, b: f64| a + b;
        assert!(d1.zip_with(&d2, add).unwrap().is_dense());
        assert!(d1.zip_with(&s1, add).unwrap().is_sparse());
        assert!(s1.zip_with(&d1, add).unwrap().is_sparse());
        assert!(s1.zip_with(&s2, add).unwrap().is_sparse());

        assert_eq!(d1.zip_with(&s1, add).unwrap().to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(s1.zip_with(&s2, add).unwrap().cardinality(), 2);
    }

    #[test]
    fn test_zip_with_nonzero_fill() {
        let s1 = IndexedStorage::sparse(1, 2, vec![0.0, 2.0]).unwrap();
        let s2 = IndexedStorage::sparse(1, 2, vec![0.0, 4.0]).unwrap();
        let r = s1.zip_with(&s2, |a, b| a - b + 1.0).unwrap();
        assert!(r.is_sparse());
        assert_eq!(r.to_vec(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_zip_with_shape_mismatch() {
        let a = vector(&[1.0, 2.0]);
        let b = IndexedStorage::dense(2, 1, vec![1.0, 2.0]).unwrap();
        assert_eq!(
            a.zip_with(&b, |x, y| x + y),
            Err(UnitError::ShapeMismatch { left: (1, 2), right: (2, 1) })
        );
    }

    #[test]
    fn test_map_in_place_sparse() {
        let mut s = IndexedStorage::sparse(1, 3, vec![0.0, 2.0, 0.0]).unwrap().mutable();
        s.map_in_place(|x| x * 3.0).unwrap();
        assert_eq!(s.cardinality(), 1);
        assert_eq!(s.get(0, 1).unwrap(), 6.0);

        s.map_in_place(|x| x + 1.0).unwrap();
        assert!(s.is_sparse());
        assert_eq!(s.to_vec(), vec![1.0, 7.0, 1.0]);
    }

    #[test]
    fn test_sparse_set_zero_drops_cell() {
        let mut s = IndexedStorage::<f32>::zeros(StorageLayout::Sparse, 2, 2).mutable();
        s.set(1, 1, 2.5).unwrap();
        assert_eq!(s.cardinality(), 1);
        s.set(1, 1, 0.0).unwrap();
        assert_eq!(s.cardinality(), 0);
        assert_eq!(s.sum(), 0.0);
    }
}
