//! The sequence-form representation and the one-shot build pipeline.

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::assembler::{assemble, SparseMatrix};
use crate::canonical::{canonicalize, SequenceTree};
use crate::error::{SeqFormError, SeqFormResult};
use crate::explorer::explore;
use crate::game::{GameState, Seat};

/// Both seats' sequence trees and the payoff matrix between them.
///
/// `A[r][c]` is the chance-weighted gain of the first seat summed over every
/// terminal reached with first-seat sequence `r` and second-seat sequence
/// `c`, so `x^T A y` is the first seat's expected gain under realization
/// plans `x` and `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceForm<O, A> {
    pub x: SequenceTree<O, A>,
    pub y: SequenceTree<O, A>,
    #[serde(rename = "A")]
    pub a: SparseMatrix,
}

/// Convert the game rooted at `initial` into sequence form.
pub fn build<S: GameState>(initial: &S) -> SeqFormResult<SequenceForm<S::Obs, S::Action>> {
    let exploration = explore(initial)?;

    let (first, second) = rayon::join(
        || canonicalize(exploration.registry(Seat::First)),
        || canonicalize(exploration.registry(Seat::Second)),
    );
    let a = assemble(&exploration.payoffs, &first, &second);

    debug!(
        "sequence form: {} x {} sequences, {} non-zeros",
        first.tree.num_sequences(),
        second.tree.num_sequences(),
        a.nnz()
    );

    Ok(SequenceForm {
        x: first.tree,
        y: second.tree,
        a,
    })
}

impl<O, A> SequenceForm<O, A> {
    pub fn tree(&self, seat: Seat) -> &SequenceTree<O, A> {
        match seat {
            Seat::First => &self.x,
            Seat::Second => &self.y,
        }
    }

    /// Check both trees' layouts and that the matrix is sorted, duplicate
    /// free, zero free and within bounds.
    pub fn validate(&self) -> SeqFormResult<()> {
        self.x.validate()?;
        self.y.validate()?;

        let a = &self.a;
        if a.row.len() != a.data.len() || a.col.len() != a.data.len() {
            return Err(SeqFormError::InvalidValue(format!(
                "Matrix arrays disagree: {} rows, {} cols, {} values",
                a.row.len(),
                a.col.len(),
                a.data.len()
            )));
        }
        let (n_rows, n_cols) = (self.x.num_sequences(), self.y.num_sequences());
        for k in 0..a.data.len() {
            if a.data[k] == 0.0 {
                return Err(SeqFormError::InvalidValue(format!("Entry {} is zero", k)));
            }
            if a.row[k] >= n_rows || a.col[k] >= n_cols {
                return Err(SeqFormError::InvalidValue(format!(
                    "Entry {} at ({}, {}) is outside {} x {}",
                    k, a.row[k], a.col[k], n_rows, n_cols
                )));
            }
            if k > 0 && (a.row[k - 1], a.col[k - 1]) >= (a.row[k], a.col[k]) {
                return Err(SeqFormError::InvalidValue(format!(
                    "Entry {} at ({}, {}) is out of order",
                    k, a.row[k], a.col[k]
                )));
            }
        }
        Ok(())
    }

    fn check_plans(&self, x: &[f64], y: &[f64]) -> SeqFormResult<()> {
        // Loaded forms are unchecked; a bad layout would index out of bounds.
        self.validate()?;
        if x.len() != self.x.num_sequences() || y.len() != self.y.num_sequences() {
            return Err(SeqFormError::InvalidValue(format!(
                "Realization plans have lengths {} and {}, expected {} and {}",
                x.len(),
                y.len(),
                self.x.num_sequences(),
                self.y.num_sequences()
            )));
        }
        Ok(())
    }

    /// Expected gain of the first seat, `x^T A y`.
    pub fn value(&self, x: &[f64], y: &[f64]) -> SeqFormResult<f64> {
        self.check_plans(x, y)?;
        Ok(self.a.bilinear(x, y))
    }

    /// Saddle-point gap of two realization plans: how much the first seat
    /// could gain by deviating plus how much the second could save. Zero
    /// exactly at an equilibrium.
    pub fn gap(&self, x: &[f64], y: &[f64]) -> SeqFormResult<f64> {
        self.check_plans(x, y)?;
        let best_first = self.x.maximize(&self.a.dot(y, self.x.num_sequences()));
        let best_second = self
            .y
            .minimize(&self.a.transpose_dot(x, self.y.num_sequences()));
        Ok(best_first - best_second)
    }
}

impl<O: Serialize, A: Serialize> SequenceForm<O, A> {
    pub fn to_json(&self) -> SeqFormResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> SeqFormResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<O: DeserializeOwned, A: DeserializeOwned> SequenceForm<O, A> {
    pub fn from_json(json: &str) -> SeqFormResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::kuhn::KuhnPoker;

    #[test]
    fn kuhn_builds_and_validates() {
        let form = build(&KuhnPoker::new()).unwrap();
        form.validate().unwrap();
        assert_eq!(form.x.num_infosets(), 6);
        assert_eq!(form.y.num_infosets(), 6);
        assert!(!form.a.is_empty());
    }

    #[test]
    fn json_uses_capital_a_field() {
        let form = build(&KuhnPoker::new()).unwrap();
        let json = form.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("A").is_some());
        assert!(value.get("a").is_none());
        assert_eq!(value["x"]["idx"][0], 1);
    }

    #[test]
    fn mismatched_plan_length_is_rejected() {
        let form = build(&KuhnPoker::new()).unwrap();
        assert!(form.value(&[1.0], &[1.0]).is_err());
        assert!(form.gap(&[1.0], &[1.0]).is_err());
    }

    #[test]
    fn loaded_matrix_outside_the_trees_is_rejected() {
        let json = r#"{"x":{"par":[],"idx":[1],"obs":[],"action":[]},"y":{"par":[],"idx":[1],"obs":[],"action":[]},"A":{"row":[3],"col":[0],"data":[1.0]}}"#;
        let form: SequenceForm<String, String> = SequenceForm::from_json(json).unwrap();
        assert!(matches!(form.value(&[1.0], &[1.0]), Err(SeqFormError::InvalidValue(_))));
        assert!(matches!(form.gap(&[1.0], &[1.0]), Err(SeqFormError::InvalidValue(_))));
    }

    #[test]
    fn loaded_tree_with_bad_parent_is_rejected() {
        let json = r#"{"x":{"par":[5],"idx":[1,3],"obs":["a"],"action":[["l","r"]]},"y":{"par":[],"idx":[1],"obs":[],"action":[]},"A":{"row":[],"col":[],"data":[]}}"#;
        let form: SequenceForm<String, String> = SequenceForm::from_json(json).unwrap();
        assert!(form.gap(&[1.0, 0.5, 0.5], &[1.0]).is_err());
    }
}
