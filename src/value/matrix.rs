//! Unit-tagged matrix

use std::fmt;
use std::sync::Arc;

use num_traits::Float;

use super::{ArithmeticOp, IndexedValue, Scalar, check_operation_compatibility, from_si, to_si};
use crate::dimension::DimensionVector;
use crate::error::{Result, UnitError};
use crate::storage::IndexedStorage;
use crate::unit::Unit;

/// A `rows × cols` array of numbers sharing one unit, stored in SI
#[derive(Debug, Clone)]
pub struct Matrix<T> {
    storage: IndexedStorage<T>,
    unit: Arc<Unit>,
}

impl<T: Float> Matrix<T> {
    /// Dense matrix from row-major values expressed in `unit`
    pub fn dense(rows: usize, cols: usize, values: Vec<T>, unit: &Arc<Unit>) -> Result<Self> {
        let si = values.into_iter().map(|v| to_si(unit, v)).collect();
        Ok(Self::from_storage(IndexedStorage::dense(rows, cols, si)?, unit))
    }

    /// Sparse matrix from row-major values expressed in `unit`
    pub fn sparse(rows: usize, cols: usize, values: Vec<T>, unit: &Arc<Unit>) -> Result<Self> {
        let si = values.into_iter().map(|v| to_si(unit, v)).collect();
        Ok(Self::from_storage(IndexedStorage::sparse(rows, cols, si)?, unit))
    }

    /// Sparse matrix from `((row, col), value)` entries expressed in `unit`
    pub fn from_entries(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = ((usize, usize), T)>,
        unit: &Arc<Unit>,
    ) -> Result<Self> {
        let entries = entries.into_iter().map(|(at, v)| (at, to_si(unit, v)));
        Ok(Self::from_storage(
            IndexedStorage::from_sparse_entries(rows, cols, entries)?,
            unit,
        ))
    }

    /// Wrap an SI storage
    pub fn from_storage(storage: IndexedStorage<T>, unit: &Arc<Unit>) -> Self {
        Self {
            storage,
            unit: Arc::clone(unit),
        }
    }

    pub fn rows(&self) -> usize {
        self.storage.rows()
    }

    pub fn cols(&self) -> usize {
        self.storage.cols()
    }

    pub fn unit(&self) -> &Arc<Unit> {
        &self.unit
    }

    pub fn dimensions(&self) -> DimensionVector {
        self.unit.dimensions()
    }

    pub fn storage(&self) -> &IndexedStorage<T> {
        &self.storage
    }

    /// Cell in the display unit
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        Ok(from_si(&self.unit, self.storage.get(row, col)?))
    }

    /// Cell in SI
    pub fn get_si(&self, row: usize, col: usize) -> Result<T> {
        self.storage.get(row, col)
    }

    /// Write a cell given in the display unit; the matrix must be mutable
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let si = to_si(&self.unit, value);
        self.storage.set(row, col, si)
    }

    /// Cells in the display unit, row-major
    pub fn to_vec(&self) -> Vec<T> {
        self.storage
            .to_vec()
            .into_iter()
            .map(|si| from_si(&self.unit, si))
            .collect()
    }

    pub fn mutable(&self) -> Self {
        Self::from_storage(self.storage.mutable(), &self.unit)
    }

    pub fn immutable(&self) -> Self {
        Self::from_storage(self.storage.immutable(), &self.unit)
    }

    pub fn is_mutable(&self) -> bool {
        self.storage.is_mutable()
    }

    pub fn to_dense(&self) -> Self {
        Self::from_storage(self.storage.to_dense().into_owned(), &self.unit)
    }

    pub fn to_sparse(&self) -> Self {
        Self::from_storage(self.storage.to_sparse().into_owned(), &self.unit)
    }

    pub fn cardinality(&self) -> usize {
        self.storage.cardinality()
    }

    /// Sum of all cells
    pub fn zsum(&self) -> Scalar<T> {
        Scalar::from_si(self.storage.sum(), &self.unit)
    }

    pub fn to_unit(&self, unit: &Arc<Unit>) -> Result<Self> {
        if self.dimensions() != unit.dimensions() {
            return Err(UnitError::mismatch("convert", &self.dimensions(), &unit.dimensions()));
        }
        Ok(Self::from_storage(self.storage.clone(), unit))
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        check_operation_compatibility(self.dimensions(), other.dimensions(), ArithmeticOp::Add)?;
        let storage = self.storage.zip_with(&other.storage, |a, b| a + b)?;
        Ok(Self::from_storage(storage, &self.unit))
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        check_operation_compatibility(self.dimensions(), other.dimensions(), ArithmeticOp::Sub)?;
        let storage = self.storage.zip_with(&other.storage, |a, b| a - b)?;
        Ok(Self::from_storage(storage, &self.unit))
    }

    pub fn scale_by(&self, factor: T) -> Self {
        Self::from_storage(self.storage.map(|v| v * factor), &self.unit)
    }
}

impl<T: Float> IndexedValue<T> for Matrix<T> {
    fn storage(&self) -> &IndexedStorage<T> {
        &self.storage
    }

    fn unit(&self) -> &Arc<Unit> {
        &self.unit
    }

    fn from_parts(storage: IndexedStorage<T>, unit: Arc<Unit>) -> Self {
        Self { storage, unit }
    }
}

impl<T: Float + fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.to_vec();
        write!(f, "[")?;
        for (r, row) in values.chunks(self.cols().max(1)).enumerate() {
            if r > 0 {
                write!(f, "; ")?;
            }
            for (c, value) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
        }
        write!(f, "] {}", self.unit)
    }
}
