//! Sparse payoff matrix assembly.

use std::collections::HashMap;

use itertools::{izip, Itertools};
use serde::{Deserialize, Serialize};

use crate::canonical::Canonical;
use crate::explorer::SequencePair;
use crate::game::Seat;

/// Payoff matrix in triplet form: rows are first-seat sequences, columns
/// second-seat sequences. Entries are sorted by `(row, col)` with no zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseMatrix {
    pub row: Vec<usize>,
    pub col: Vec<usize>,
    pub data: Vec<f64>,
}

impl SparseMatrix {
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `A * y`, with `n_rows` first-seat sequences.
    pub fn dot(&self, y: &[f64], n_rows: usize) -> Vec<f64> {
        let mut out = vec![0.0; n_rows];
        for (&r, &c, &v) in izip!(&self.row, &self.col, &self.data) {
            out[r] += v * y[c];
        }
        out
    }

    /// `A^T * x`, with `n_cols` second-seat sequences.
    pub fn transpose_dot(&self, x: &[f64], n_cols: usize) -> Vec<f64> {
        let mut out = vec![0.0; n_cols];
        for (&r, &c, &v) in izip!(&self.row, &self.col, &self.data) {
            out[c] += v * x[r];
        }
        out
    }

    /// `x^T A y`.
    pub fn bilinear(&self, x: &[f64], y: &[f64]) -> f64 {
        izip!(&self.row, &self.col, &self.data)
            .map(|(&r, &c, &v)| x[r] * v * y[c])
            .sum()
    }
}

/// Remap exploration-time payoff keys into canonical indices.
///
/// Empty sequences map to index 0. Exact zeros are dropped and the rest are
/// sorted by `(row, col)`; values are otherwise passed through untouched.
pub fn assemble<O, A>(
    payoffs: &HashMap<SequencePair, f64>,
    first: &Canonical<O, A>,
    second: &Canonical<O, A>,
) -> SparseMatrix {
    let entries = payoffs
        .iter()
        .filter(|(_, value)| **value != 0.0)
        .map(|(pair, &value)| {
            (
                first.flat(pair[Seat::First.index()]),
                second.flat(pair[Seat::Second.index()]),
                value,
            )
        })
        .sorted_by_key(|&(r, c, _)| (r, c));

    let mut matrix = SparseMatrix {
        row: Vec::with_capacity(payoffs.len()),
        col: Vec::with_capacity(payoffs.len()),
        data: Vec::with_capacity(payoffs.len()),
    };
    for (r, c, v) in entries {
        matrix.row.push(r);
        matrix.col.push(c);
        matrix.data.push(v);
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::SequenceTree;
    use crate::explorer::RawSequence;

    fn canonical(offsets: Vec<usize>) -> Canonical<&'static str, &'static str> {
        Canonical {
            tree: SequenceTree::empty(),
            offsets,
        }
    }

    #[test]
    fn assemble_remaps_sorts_and_prunes() {
        let first = canonical(vec![3, 1]);
        let second = canonical(vec![1]);
        let seq = |infoset, action| RawSequence::Action { infoset, action };

        let mut payoffs = HashMap::new();
        payoffs.insert([seq(0, 1), RawSequence::Empty], 2.0);
        payoffs.insert([seq(1, 0), seq(0, 1)], -1.5);
        payoffs.insert([seq(1, 0), seq(0, 0)], 0.25);
        payoffs.insert([seq(1, 1), RawSequence::Empty], 0.0);

        let matrix = assemble(&payoffs, &first, &second);
        assert_eq!(matrix.row, vec![1, 1, 4]);
        assert_eq!(matrix.col, vec![1, 2, 0]);
        assert_eq!(matrix.data, vec![0.25, -1.5, 2.0]);
    }

    #[test]
    fn products_agree_with_bilinear() {
        let matrix = SparseMatrix {
            row: vec![0, 1, 2],
            col: vec![1, 0, 1],
            data: vec![1.0, -2.0, 4.0],
        };
        let x = [1.0, 0.5, 0.25];
        let y = [1.0, 2.0];
        let ay = matrix.dot(&y, 3);
        let atx = matrix.transpose_dot(&x, 2);
        let via_rows: f64 = ay.iter().zip(&x).map(|(a, b)| a * b).sum();
        let via_cols: f64 = atx.iter().zip(&y).map(|(a, b)| a * b).sum();
        assert_eq!(matrix.bilinear(&x, &y), 3.0);
        assert_eq!(via_rows, 3.0);
        assert_eq!(via_cols, 3.0);
    }
}
