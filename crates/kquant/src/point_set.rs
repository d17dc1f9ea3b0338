use crate::{EmptyPointSetSnafu, Error, RaggedPointSetSnafu, ZeroDimensionsSnafu};
use snafu::prelude::*;

/// An immutable set of same-dimensionality color points, stored as a flat
/// buffer with one `dims`-component point per index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSet {
    data: Vec<u8>,
    dims: usize,
}

impl PointSet {
    /// At least one point and at least one component per point are
    /// required, and `data` must split evenly into `dims`-sized points.
    pub fn new(data: Vec<u8>, dims: usize) -> Result<Self, Error> {
        ensure!(dims >= 1, ZeroDimensionsSnafu);
        ensure!(!data.is_empty(), EmptyPointSetSnafu);
        ensure!(
            data.len().is_multiple_of(dims),
            RaggedPointSetSnafu {
                len: data.len(),
                dims
            }
        );

        Ok(Self { data, dims })
    }

    pub(crate) fn from_flat(data: Vec<u8>, dims: usize) -> Self {
        assert!(dims >= 1);
        assert!(!data.is_empty());
        assert!(data.len().is_multiple_of(dims));

        Self { data, dims }
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dims
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn point(&self, index: usize) -> &[u8] {
        &self.data[index * self.dims..(index + 1) * self.dims]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(self.dims)
    }
}
