//! Canonical sequence trees.
//!
//! Exploration registers information sets in whatever order the game reveals
//! them. Solvers need a layout where every information set owns one
//! contiguous block of flat sequence indices and every parent sequence comes
//! before the block of its children. This module re-linearizes a seat's
//! registry into that preorder layout.
//!
//! Layout of a [`SequenceTree`] with `n` information sets:
//!
//!   idx[0] = 1                      (flat index 0 is the empty sequence)
//!   sequences of set i = idx[i]..idx[i + 1]
//!   par[i] = flat index of the own sequence that leads into set i
//!
//! Sets are stored in canonical order, so `par[i] < idx[i]` always holds.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SeqFormError, SeqFormResult};
use crate::explorer::{RawSequence, Registry};
use crate::game::Behavior;

// ---------------------------------------------------------------------------
// Sequence tree
// ---------------------------------------------------------------------------

/// One seat's sequences in canonical preorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceTree<O, A> {
    pub par: Vec<usize>,
    pub idx: Vec<usize>,
    pub obs: Vec<O>,
    pub action: Vec<Vec<A>>,
}

impl<O, A> SequenceTree<O, A> {
    /// A tree with no information sets: only the empty sequence.
    pub fn empty() -> Self {
        SequenceTree {
            par: Vec::new(),
            idx: vec![1],
            obs: Vec::new(),
            action: Vec::new(),
        }
    }

    pub fn num_infosets(&self) -> usize {
        self.par.len()
    }

    /// Number of flat sequence indices, empty sequence included.
    pub fn num_sequences(&self) -> usize {
        self.idx.last().copied().unwrap_or(1)
    }

    /// Flat indices owned by information set `i`.
    #[inline]
    pub fn range(&self, i: usize) -> Range<usize> {
        self.idx[i]..self.idx[i + 1]
    }

    /// Check the offset layout: array lengths agree, `idx` starts at 1 and
    /// strictly increases by each set's action count, and every parent
    /// precedes its children.
    pub fn validate(&self) -> SeqFormResult<()> {
        let n = self.par.len();
        if self.idx.len() != n + 1 || self.obs.len() != n || self.action.len() != n {
            return Err(SeqFormError::InvalidValue(format!(
                "Sequence tree arrays disagree: {} par, {} idx, {} obs, {} action",
                n,
                self.idx.len(),
                self.obs.len(),
                self.action.len()
            )));
        }
        if self.idx[0] != 1 {
            return Err(SeqFormError::InvalidValue(format!(
                "idx[0] must be 1, got {}",
                self.idx[0]
            )));
        }
        for i in 0..n {
            let width = self.action[i].len();
            if width == 0 || self.idx[i + 1] != self.idx[i] + width {
                return Err(SeqFormError::InvalidValue(format!(
                    "Information set {} spans {}..{} but has {} actions",
                    i,
                    self.idx[i],
                    self.idx[i + 1],
                    width
                )));
            }
            if self.par[i] >= self.idx[i] {
                return Err(SeqFormError::InvalidValue(format!(
                    "Information set {} starts at {} but its parent is {}",
                    i, self.idx[i], self.par[i]
                )));
            }
        }
        Ok(())
    }

    /// Best-response value of a maximizing seat against the linear objective
    /// `c` (one coefficient per flat sequence).
    pub fn maximize(&self, c: &[f64]) -> f64 {
        self.best_response(c, f64::max, f64::NEG_INFINITY)
    }

    /// Best-response value of a minimizing seat against `c`.
    pub fn minimize(&self, c: &[f64]) -> f64 {
        self.best_response(c, f64::min, f64::INFINITY)
    }

    fn best_response(&self, c: &[f64], pick: fn(f64, f64) -> f64, init: f64) -> f64 {
        let mut c = c.to_vec();
        // Children sit after their parents, so a reverse sweep folds leaves first.
        for (i, &p) in self.par.iter().enumerate().rev() {
            let best = c[self.range(i)].iter().copied().fold(init, pick);
            c[p] += best;
        }
        c[0]
    }
}

impl<O, A> SequenceTree<O, A>
where
    O: Clone + Eq + Hash + Debug,
{
    /// Realization plan of a behavioral strategy: the probability that the
    /// seat plays every action of each sequence.
    pub fn realization(&self, behavior: &Behavior<O>) -> SeqFormResult<Vec<f64>> {
        let mut plan = vec![0.0; self.num_sequences()];
        plan[0] = 1.0;
        for (i, obs) in self.obs.iter().enumerate() {
            let probs = behavior.get(obs).ok_or_else(|| {
                SeqFormError::InvalidValue(format!("No strategy at {:?}", obs))
            })?;
            if probs.len() != self.action[i].len() {
                return Err(SeqFormError::InvalidValue(format!(
                    "Strategy at {:?} has {} probabilities for {} actions",
                    obs,
                    probs.len(),
                    self.action[i].len()
                )));
            }
            let reach = plan[self.par[i]];
            for (slot, p) in self.range(i).zip(probs) {
                plan[slot] = reach * p;
            }
        }
        Ok(plan)
    }

    /// Uniform random play at every information set.
    pub fn uniform_behavior(&self) -> Behavior<O> {
        self.obs
            .iter()
            .zip(&self.action)
            .map(|(obs, actions)| {
                let n = actions.len();
                (obs.clone(), vec![1.0 / n as f64; n])
            })
            .collect()
    }

    /// A random mixed strategy at every information set.
    pub fn random_behavior<R: Rng>(&self, rng: &mut R) -> Behavior<O> {
        self.obs
            .iter()
            .zip(&self.action)
            .map(|(obs, actions)| {
                let weights: Vec<f64> = actions
                    .iter()
                    .map(|_| rng.gen_range(0.01..1.0))
                    .collect();
                let total: f64 = weights.iter().sum();
                (obs.clone(), weights.into_iter().map(|w| w / total).collect())
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Canonicalization
// ---------------------------------------------------------------------------

/// A canonical tree plus the mapping back from registration order.
#[derive(Debug, Clone)]
pub struct Canonical<O, A> {
    pub tree: SequenceTree<O, A>,
    /// First canonical flat index of each set, by registration index.
    pub offsets: Vec<usize>,
}

impl<O, A> Canonical<O, A> {
    /// Canonical flat index of an exploration-time sequence.
    #[inline]
    pub fn flat(&self, seq: RawSequence) -> usize {
        match seq {
            RawSequence::Empty => 0,
            RawSequence::Action { infoset, action } => self.offsets[infoset] + action,
        }
    }
}

/// Re-linearize one seat's registry into canonical preorder.
///
/// Children of a set are the sets whose recorded parent sequence lies in it,
/// visited in registration order. Each visited set takes the next free block
/// of flat indices.
pub fn canonicalize<O, A>(registry: &Registry<O, A>) -> Canonical<O, A>
where
    O: Clone + Eq + Hash + Debug,
    A: Clone + PartialEq + Debug,
{
    let infosets = registry.infosets();
    let n = infosets.len();

    let mut roots: Vec<usize> = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (id, info) in infosets.iter().enumerate() {
        match info.parent {
            RawSequence::Empty => roots.push(id),
            RawSequence::Action { infoset, .. } => children[infoset].push(id),
        }
    }

    let mut offsets = vec![0usize; n];
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut next = 1usize;
    let mut stack: Vec<usize> = roots.into_iter().rev().collect();
    while let Some(id) = stack.pop() {
        offsets[id] = next;
        next += infosets[id].actions.len();
        order.push(id);
        stack.extend(children[id].iter().rev());
    }

    let mut tree = SequenceTree::empty();
    for &id in &order {
        let info = &infosets[id];
        let par = match info.parent {
            RawSequence::Empty => 0,
            RawSequence::Action { infoset, action } => offsets[infoset] + action,
        };
        tree.par.push(par);
        tree.idx.push(offsets[id] + info.actions.len());
        tree.obs.push(info.obs.clone());
        tree.action.push(info.actions.clone());
    }

    Canonical { tree, offsets }
}
