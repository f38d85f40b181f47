use std::num::NonZeroUsize;

use ndarray::{Array2, ArrayView2, Axis, s};
use rand::{Rng, seq::SliceRandom};

use crate::{MlErr, Result};

/// An in memory, row major table of samples. Each row holds `x_size` feature columns followed
/// by `y_size` target columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    data: Array2<f64>,
    x_size: usize,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `data` - The flattened rows, features first and targets last.
    /// * `x_size` - The amount of feature columns per row.
    /// * `y_size` - The amount of target columns per row.
    ///
    /// # Returns
    /// A new `Dataset` or an error if `data` can't be split evenly into rows.
    pub fn new(data: Vec<f64>, x_size: usize, y_size: usize) -> Result<Self> {
        let row_size = x_size + y_size;
        if row_size == 0 || data.len() % row_size != 0 {
            return Err(MlErr::SizeMismatch {
                a: "data",
                b: "row size",
                got: data.len(),
                expected: row_size,
            });
        }

        let shape = (data.len() / row_size, row_size);
        let data = Array2::from_shape_vec(shape, data).map_err(|_| MlErr::SizeMismatch {
            a: "data",
            b: "row size",
            got: shape.0,
            expected: row_size,
        })?;

        Ok(Self { data, x_size })
    }

    /// Returns the amount of rows.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.data.ncols() - self.x_size
    }

    /// The feature columns of every row.
    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.data.slice(s![.., ..self.x_size])
    }

    /// The target columns of every row.
    pub fn y(&self) -> ArrayView2<'_, f64> {
        self.data.slice(s![.., self.x_size..])
    }

    /// Randomly permutes the rows.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);
        self.data = self.data.select(Axis(0), &indices);
    }

    /// Splits the rows into a train and a test partition after a random permutation. The test
    /// partition holds `ceil(test_ratio * len)` rows and the train partition the rest.
    ///
    /// # Arguments
    /// * `test_ratio` - The fraction of rows that go to the test partition.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// A tuple `(train, test)` or an error if either partition would end up empty.
    pub fn split<R: Rng + ?Sized>(&self, test_ratio: f64, rng: &mut R) -> Result<(Self, Self)> {
        let len = self.len();
        let invalid = MlErr::InvalidSplit {
            ratio: test_ratio,
            len,
        };

        if !(test_ratio > 0.0 && test_ratio < 1.0) {
            return Err(invalid);
        }

        let n_test = (test_ratio * len as f64).ceil() as usize;
        if n_test == 0 || n_test >= len {
            return Err(invalid);
        }

        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(rng);
        let (test_idx, train_idx) = indices.split_at(n_test);

        let train = Self {
            data: self.data.select(Axis(0), train_idx),
            x_size: self.x_size,
        };
        let test = Self {
            data: self.data.select(Axis(0), test_idx),
            x_size: self.x_size,
        };

        Ok((train, test))
    }

    /// Iterates over the rows in chunks of `batch_size`, the last one may be shorter.
    ///
    /// # Returns
    /// An iterator of `(x, y)` views.
    pub fn batches(
        &self,
        batch_size: NonZeroUsize,
    ) -> impl Iterator<Item = (ArrayView2<'_, f64>, ArrayView2<'_, f64>)> {
        let x_size = self.x_size;

        self.data
            .axis_chunks_iter(Axis(0), batch_size.get())
            .map(move |chunk| chunk.split_at(Axis(1), x_size))
    }
}
