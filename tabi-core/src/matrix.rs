//! Dense square matrices of `f64` indexed by place position.

/// Row-major `n × n` matrix.
///
/// Accessors return `Option` for out-of-range indices; [`SquareMatrix::at`]
/// reads a caller-checked index and yields `f64::INFINITY` if the check was
/// wrong, so a stray index can never look like a cheap edge.
///
/// # Examples
/// ```
/// use tabi_core::SquareMatrix;
///
/// let m = SquareMatrix::from_fn(3, |i, j| (i + j) as f64);
/// assert_eq!(m.size(), 3);
/// assert_eq!(m.get(1, 2), Some(3.0));
/// assert_eq!(m.get(3, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SquareMatrix {
    /// Matrix of `size × size` filled with `value`.
    #[must_use]
    pub fn filled(size: usize, value: f64) -> Self {
        Self {
            size,
            values: vec![value; size.saturating_mul(size)],
        }
    }

    /// Matrix whose cell `(i, j)` is `f(i, j)`.
    #[must_use]
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(size.saturating_mul(size));
        for i in 0..size {
            for j in 0..size {
                values.push(f(i, j));
            }
        }
        Self { size, values }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix has no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn offset(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.size && j < self.size).then(|| i * self.size + j)
    }

    /// Cell `(i, j)`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.offset(i, j)
            .and_then(|offset| self.values.get(offset))
            .copied()
    }

    /// Cell `(i, j)`, or `f64::INFINITY` when out of range.
    #[must_use]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.get(i, j).unwrap_or(f64::INFINITY)
    }

    /// Overwrite cell `(i, j)`; out-of-range writes are ignored.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        if let Some(cell) = self
            .offset(i, j)
            .and_then(|offset| self.values.get_mut(offset))
        {
            *cell = value;
        }
    }

    /// Add `delta` to cell `(i, j)`; out-of-range writes are ignored.
    pub fn add(&mut self, i: usize, j: usize, delta: f64) {
        if let Some(cell) = self
            .offset(i, j)
            .and_then(|offset| self.values.get_mut(offset))
        {
            *cell += delta;
        }
    }

    /// Multiply every cell by `factor`.
    pub fn scale_all(&mut self, factor: f64) {
        for cell in &mut self.values {
            *cell *= factor;
        }
    }

    /// Iterate over row `i`; empty when out of range.
    pub fn row(&self, i: usize) -> impl Iterator<Item = f64> + '_ {
        let range = if i < self.size {
            i * self.size..(i + 1) * self.size
        } else {
            0..0
        };
        self.values.get(range).unwrap_or_default().iter().copied()
    }

    /// Largest finite value off the diagonal, or `0.0` if there is none.
    #[must_use]
    pub fn max_off_diagonal(&self) -> f64 {
        (0..self.size)
            .flat_map(|i| (0..self.size).map(move |j| (i, j)))
            .filter(|(i, j)| i != j)
            .map(|(i, j)| self.at(i, j))
            .filter(|value| value.is_finite())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_are_infinite() {
        let m = SquareMatrix::filled(2, 1.0);
        assert_eq!(m.get(2, 0), None);
        assert!(m.at(0, 5).is_infinite());
    }

    #[test]
    fn writes_update_single_cells() {
        let mut m = SquareMatrix::filled(2, 1.0);
        m.set(0, 1, 4.0);
        m.add(0, 1, 0.5);
        m.set(9, 9, 100.0);
        assert_eq!(m.get(0, 1), Some(4.5));
        assert_eq!(m.get(1, 0), Some(1.0));
    }

    #[test]
    fn scaling_touches_every_cell() {
        let mut m = SquareMatrix::filled(2, 2.0);
        m.scale_all(0.5);
        assert!(m.row(1).all(|v| (v - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn max_off_diagonal_skips_diagonal_and_infinity() {
        let m = SquareMatrix::from_fn(3, |i, j| match (i, j) {
            (0, 0) => 99.0,
            (2, 1) => f64::INFINITY,
            _ => (i * 3 + j) as f64,
        });
        assert_eq!(m.max_off_diagonal(), 6.0);
    }

    #[test]
    fn row_out_of_range_is_empty() {
        let m = SquareMatrix::filled(2, 1.0);
        assert_eq!(m.row(4).count(), 0);
    }
}
