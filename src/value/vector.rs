//! Unit-tagged vector

use std::fmt;
use std::sync::Arc;

use num_traits::Float;

use super::{ArithmeticOp, IndexedValue, Scalar, check_operation_compatibility, from_si, to_si};
use crate::dimension::DimensionVector;
use crate::error::{Result, UnitError};
use crate::storage::{IndexedStorage, StorageLayout};
use crate::unit::Unit;

/// A 1-D array of numbers sharing one unit
///
/// Cells are stored in SI. Vectors start immutable; [`mutable`](Self::mutable)
/// returns a writable copy that shares the buffer until its first write.
#[derive(Debug, Clone)]
pub struct Vector<T> {
    storage: IndexedStorage<T>,
    unit: Arc<Unit>,
}

impl<T: Float> Vector<T> {
    /// Dense vector of values expressed in `unit`
    pub fn dense(values: Vec<T>, unit: &Arc<Unit>) -> Self {
        Self::with_layout(StorageLayout::Dense, values, unit)
    }

    /// Sparse vector of values expressed in `unit`
    pub fn sparse(values: Vec<T>, unit: &Arc<Unit>) -> Self {
        Self::with_layout(StorageLayout::Sparse, values, unit)
    }

    fn with_layout(layout: StorageLayout, values: Vec<T>, unit: &Arc<Unit>) -> Self {
        let si = values.into_iter().map(|v| to_si(unit, v)).collect();
        Self {
            storage: IndexedStorage::row(layout, si),
            unit: Arc::clone(unit),
        }
    }

    /// Wrap a `1 × n` SI storage
    pub fn from_storage(storage: IndexedStorage<T>, unit: &Arc<Unit>) -> Result<Self> {
        if storage.rows() != 1 {
            return Err(UnitError::ShapeMismatch {
                left: (1, storage.cols()),
                right: (storage.rows(), storage.cols()),
            });
        }
        Ok(Self {
            storage,
            unit: Arc::clone(unit),
        })
    }

    pub fn len(&self) -> usize {
        self.storage.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
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

    /// Element in the display unit
    pub fn get(&self, index: usize) -> Result<T> {
        Ok(from_si(&self.unit, self.get_si(index)?))
    }

    /// Element in SI
    pub fn get_si(&self, index: usize) -> Result<T> {
        self.storage.get(0, index)
    }

    /// Write an element given in the display unit; the vector must be
    /// mutable
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let si = to_si(&self.unit, value);
        self.storage.set(0, index, si)
    }

    /// Elements in the display unit
    pub fn to_vec(&self) -> Vec<T> {
        self.storage
            .to_vec()
            .into_iter()
            .map(|si| from_si(&self.unit, si))
            .collect()
    }

    pub fn mutable(&self) -> Self {
        Self {
            storage: self.storage.mutable(),
            unit: Arc::clone(&self.unit),
        }
    }

    pub fn immutable(&self) -> Self {
        Self {
            storage: self.storage.immutable(),
            unit: Arc::clone(&self.unit),
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.storage.is_mutable()
    }

    /// Dense version; shares the buffer when already dense
    pub fn to_dense(&self) -> Self {
        Self {
            storage: self.storage.to_dense().into_owned(),
            unit: Arc::clone(&self.unit),
        }
    }

    /// Sparse version; shares the buffer when already sparse
    pub fn to_sparse(&self) -> Self {
        Self {
            storage: self.storage.to_sparse().into_owned(),
            unit: Arc::clone(&self.unit),
        }
    }

    /// Number of non-zero elements
    pub fn cardinality(&self) -> usize {
        self.storage.cardinality()
    }

    /// Sum of the elements
    pub fn zsum(&self) -> Scalar<T> {
        Scalar::from_si(self.storage.sum(), &self.unit)
    }

    /// Same values displayed in `unit`
    pub fn to_unit(&self, unit: &Arc<Unit>) -> Result<Self> {
        if self.dimensions() != unit.dimensions() {
            return Err(UnitError::mismatch("convert", &self.dimensions(), &unit.dimensions()));
        }
        Ok(Self {
            storage: self.storage.clone(),
            unit: Arc::clone(unit),
        })
    }

    /// Element-wise sum, displayed in this vector's unit
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.combine(other, ArithmeticOp::Add, |a, b| a + b)
    }

    /// Element-wise difference, displayed in this vector's unit
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.combine(other, ArithmeticOp::Sub, |a, b| a - b)
    }

    fn combine(&self, other: &Self, op: ArithmeticOp, f: impl Fn(T, T) -> T) -> Result<Self> {
        check_operation_compatibility(self.dimensions(), other.dimensions(), op)?;
        Ok(Self {
            storage: self.storage.zip_with(&other.storage, f)?,
            unit: Arc::clone(&self.unit),
        })
    }

    /// Multiply every element by a pure number
    pub fn scale_by(&self, factor: T) -> Self {
        Self {
            storage: self.storage.map(|v| v * factor),
            unit: Arc::clone(&self.unit),
        }
    }
}

impl<T: Float> IndexedValue<T> for Vector<T> {
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

impl<T: Float + fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.to_vec().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "] {}", self.unit)
    }
}
