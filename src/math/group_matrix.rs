use std::fmt;
use std::sync::Arc;

use super::elements::GroupMember;
use super::group_vector::GroupVector;
use crate::error::{CryptoError, CryptoResult};

/// An immutable rectangular grid of same-group elements.
///
/// Storage is flat row-major with an `(n_rows, n_cols)` header; row and
/// column accessors iterate over the flat buffer rather than copying it.
#[derive(Clone)]
pub struct GroupMatrix<E: GroupMember> {
    n_rows: usize,
    n_cols: usize,
    elements: Vec<E>,
    group: Arc<E::Group>,
}

impl<E: GroupMember> GroupMatrix<E> {
    /// Builds a matrix from non-empty, equal-length rows.
    pub fn from_rows(rows: Vec<Vec<E>>) -> CryptoResult<Self> {
        let first_row = rows.first().ok_or(CryptoError::EmptyWithoutGroup)?;
        let n_cols = first_row.len();
        let first = first_row.first().ok_or(CryptoError::EmptyWithoutGroup)?;
        let group = Arc::clone(first.group());
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(CryptoError::invalid("all matrix rows must have equal size"));
        }
        let n_rows = rows.len();
        let elements: Vec<E> = rows.into_iter().flatten().collect();
        if elements.iter().any(|e| e.group().as_ref() != group.as_ref()) {
            return Err(CryptoError::invalid(
                "all matrix elements must belong to the same group",
            ));
        }
        Ok(GroupMatrix {
            n_rows,
            n_cols,
            elements,
            group,
        })
    }

    /// Reshapes a vector of length `n_rows * n_cols`, reading it row by
    /// row: entry `(i, j)` is `vector[i * n_cols + j]`.
    pub fn from_row_vector(
        vector: &GroupVector<E>,
        n_rows: usize,
        n_cols: usize,
    ) -> CryptoResult<Self> {
        if n_rows == 0 || n_cols == 0 || vector.len() != n_rows * n_cols {
            return Err(CryptoError::invalid(format!(
                "cannot reshape a vector of size {} into a {n_rows} x {n_cols} matrix",
                vector.len()
            )));
        }
        Ok(GroupMatrix {
            n_rows,
            n_cols,
            elements: vector.as_slice().to_vec(),
            group: Arc::clone(vector.group()),
        })
    }

    /// Reshapes a vector of length `n_rows * n_cols`, reading it column
    /// by column: entry `(i, j)` is `vector[j * n_rows + i]`.
    pub fn from_column_vector(
        vector: &GroupVector<E>,
        n_rows: usize,
        n_cols: usize,
    ) -> CryptoResult<Self> {
        let row_major = Self::from_row_vector(vector, n_cols, n_rows)?;
        Ok(row_major.transpose())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn group(&self) -> &Arc<E::Group> {
        &self.group
    }

    pub fn get(&self, row: usize, col: usize) -> &E {
        assert!(row < self.n_rows && col < self.n_cols, "index out of range");
        &self.elements[row * self.n_cols + col]
    }

    /// Borrowing view over row `i`, left to right.
    pub fn row_iter(&self, row: usize) -> impl Iterator<Item = &E> {
        assert!(row < self.n_rows, "row index out of range");
        self.elements[row * self.n_cols..(row + 1) * self.n_cols].iter()
    }

    /// Borrowing view over column `j`, top to bottom.
    pub fn column_iter(&self, col: usize) -> impl Iterator<Item = &E> {
        assert!(col < self.n_cols, "column index out of range");
        self.elements[col..].iter().step_by(self.n_cols)
    }

    pub fn row(&self, i: usize) -> GroupVector<E> {
        GroupVector::from_elements_with_group(self.row_iter(i).cloned().collect(), &self.group)
            .expect("matrix elements share the matrix group")
    }

    pub fn column(&self, j: usize) -> GroupVector<E> {
        GroupVector::from_elements_with_group(self.column_iter(j).cloned().collect(), &self.group)
            .expect("matrix elements share the matrix group")
    }

    pub fn rows(&self) -> impl Iterator<Item = GroupVector<E>> + '_ {
        (0..self.n_rows).map(|i| self.row(i))
    }

    pub fn columns(&self) -> impl Iterator<Item = GroupVector<E>> + '_ {
        (0..self.n_cols).map(|j| self.column(j))
    }

    /// The transposed matrix, as a new value.
    pub fn transpose(&self) -> GroupMatrix<E> {
        let mut elements = Vec::with_capacity(self.elements.len());
        for j in 0..self.n_cols {
            elements.extend(self.column_iter(j).cloned());
        }
        GroupMatrix {
            n_rows: self.n_cols,
            n_cols: self.n_rows,
            elements,
            group: Arc::clone(&self.group),
        }
    }

    /// The entries flattened row by row.
    pub fn to_row_vector(&self) -> GroupVector<E> {
        GroupVector::from_elements_with_group(self.elements.clone(), &self.group)
            .expect("matrix elements share the matrix group")
    }
}

impl<E: GroupMember> PartialEq for GroupMatrix<E> {
    fn eq(&self, other: &Self) -> bool {
        self.n_rows == other.n_rows
            && self.n_cols == other.n_cols
            && self.group.as_ref() == other.group.as_ref()
            && self.elements == other.elements
    }
}

impl<E: GroupMember> Eq for GroupMatrix<E> {}

impl<E: GroupMember> fmt::Debug for GroupMatrix<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupMatrix({} x {})", self.n_rows, self.n_cols)
    }
}
