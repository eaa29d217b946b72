//! Exhaustive tree exploration.
//!
//! Walks every path of a [`GameState`], registers each information set the
//! first time it is seen, and accumulates chance-weighted terminal payoffs
//! keyed by the pair of sequences active for the two seats.
//!
//! Indices produced here are in *registration order*; they are only
//! meaningful until [`crate::canonical`] re-linearizes them.

use std::collections::HashMap;
use std::hash::Hash;

use log::{debug, trace};

use crate::error::{SeqFormError, SeqFormResult};
use crate::game::{out_of_context, GameState, Seat};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A seat's last sequence before canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RawSequence {
    /// No action taken yet.
    Empty,
    /// Action position `action` at the information set registered `infoset`-th.
    Action { infoset: usize, action: usize },
}

/// Active sequence of each seat, indexed by [`Seat::index`].
pub type SequencePair = [RawSequence; 2];

/// An information set as first discovered.
#[derive(Debug, Clone)]
pub struct RawInfoset<O, A> {
    pub obs: O,
    /// Legal actions, frozen at discovery.
    pub actions: Vec<A>,
    /// Own sequence active when the set was entered.
    pub parent: RawSequence,
}

/// Information sets of one seat in registration order.
#[derive(Debug, Clone)]
pub struct Registry<O, A> {
    seat: Seat,
    index: HashMap<O, usize>,
    infosets: Vec<RawInfoset<O, A>>,
}

impl<O, A> Registry<O, A>
where
    O: Clone + Eq + Hash + std::fmt::Debug,
    A: PartialEq + std::fmt::Debug,
{
    pub fn new(seat: Seat) -> Self {
        Registry {
            seat,
            index: HashMap::new(),
            infosets: Vec::new(),
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn len(&self) -> usize {
        self.infosets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infosets.is_empty()
    }

    pub fn infosets(&self) -> &[RawInfoset<O, A>] {
        &self.infosets
    }

    /// Registration index of the set labelled `obs`, if seen.
    pub fn position(&self, obs: &O) -> Option<usize> {
        self.index.get(obs).copied()
    }

    /// Register `obs` or check a recurrence against the frozen record.
    ///
    /// A recurring label must present the same action list and be entered
    /// from the same own sequence; anything else breaks perfect recall.
    pub(crate) fn visit(
        &mut self,
        obs: O,
        actions: Vec<A>,
        parent: RawSequence,
    ) -> SeqFormResult<usize> {
        if let Some(&id) = self.index.get(&obs) {
            let known = &self.infosets[id];
            if known.actions != actions {
                return Err(SeqFormError::ActionMismatch {
                    player: self.seat,
                    obs: format!("{:?}", obs),
                    expected: format!("{:?}", known.actions),
                    found: format!("{:?}", actions),
                });
            }
            if known.parent != parent {
                return Err(SeqFormError::ParentMismatch {
                    player: self.seat,
                    obs: format!("{:?}", obs),
                });
            }
            return Ok(id);
        }

        let id = self.infosets.len();
        trace!(
            "{} infoset #{} {:?} ({} actions, parent {:?})",
            self.seat,
            id,
            obs,
            actions.len(),
            parent
        );
        self.index.insert(obs.clone(), id);
        self.infosets.push(RawInfoset {
            obs,
            actions,
            parent,
        });
        Ok(id)
    }
}

/// Everything one exploration pass discovers.
#[derive(Debug, Clone)]
pub struct Exploration<O, A> {
    /// Per-seat registries, indexed by [`Seat::index`].
    pub registries: [Registry<O, A>; 2],
    /// Chance-weighted payoff sums per terminal sequence pair.
    pub payoffs: HashMap<SequencePair, f64>,
}

impl<O, A> Exploration<O, A> {
    pub fn registry(&self, seat: Seat) -> &Registry<O, A> {
        &self.registries[seat.index()]
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

struct Frame<S> {
    state: S,
    prob: f64,
    active: SequencePair,
}

/// Explore every path from `initial`.
///
/// Uses an explicit stack; children are pushed in reverse so they pop in
/// legal-action order, giving the same visit order as a recursive preorder.
/// Any contract violation aborts the whole pass.
pub fn explore<S: GameState>(initial: &S) -> SeqFormResult<Exploration<S::Obs, S::Action>> {
    let mut registries = [Registry::new(Seat::First), Registry::new(Seat::Second)];
    let mut payoffs: HashMap<SequencePair, f64> = HashMap::new();
    let mut terminals = 0usize;

    let mut stack = vec![Frame {
        state: initial.clone(),
        prob: 1.0,
        active: [RawSequence::Empty; 2],
    }];

    while let Some(Frame {
        state,
        prob,
        active,
    }) = stack.pop()
    {
        let Some(player) = state.player() else {
            let payoff = state
                .payoff()
                .ok_or_else(|| out_of_context("payoff", None))?;
            *payoffs.entry(active).or_insert(0.0) += payoff * prob;
            terminals += 1;
            continue;
        };

        let actions = state.legal_actions();
        if actions.is_empty() {
            return Err(SeqFormError::NoLegalActions { player });
        }

        let Some(seat) = player.seat() else {
            for action in actions.iter().rev() {
                let p = state
                    .chance_prob(action)
                    .ok_or_else(|| out_of_context("chance_prob", Some(player)))?;
                stack.push(Frame {
                    state: state.step(action),
                    prob: prob * p,
                    active,
                });
            }
            continue;
        };

        let obs = state
            .observation()
            .ok_or_else(|| out_of_context("observation", Some(player)))?;
        let infoset =
            registries[seat.index()].visit(obs, actions.clone(), active[seat.index()])?;

        for (action_pos, action) in actions.iter().enumerate().rev() {
            let mut next = active;
            next[seat.index()] = RawSequence::Action {
                infoset,
                action: action_pos,
            };
            stack.push(Frame {
                state: state.step(action),
                prob,
                active: next,
            });
        }
    }

    debug!(
        "explored {} terminals: {} / {} infosets, {} payoff keys",
        terminals,
        registries[0].len(),
        registries[1].len(),
        payoffs.len()
    );

    Ok(Exploration {
        registries,
        payoffs,
    })
}
