//! The state-machine contract every game must satisfy to be converted.
//!
//! A game is explored purely through [`GameState`]: the core never looks
//! inside a state, it only asks who acts, what they may do, and what a
//! terminal is worth to the first player.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;

use crate::error::{SeqFormError, SeqFormResult};

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// Who acts at a non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
    Chance,
}

impl Player {
    /// The sequence owner for a decision player, `None` for chance.
    pub fn seat(self) -> Option<Seat> {
        match self {
            Player::First => Some(Seat::First),
            Player::Second => Some(Seat::Second),
            Player::Chance => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::First => write!(f, "first player"),
            Player::Second => write!(f, "second player"),
            Player::Chance => write!(f, "chance"),
        }
    }
}

/// A rational player, i.e. one that owns sequences. Chance has no seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::First, Seat::Second];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    pub fn opponent(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

impl From<Seat> for Player {
    fn from(seat: Seat) -> Player {
        match seat {
            Seat::First => Player::First,
            Seat::Second => Player::Second,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Player::from(*self), f)
    }
}

// ---------------------------------------------------------------------------
// State contract
// ---------------------------------------------------------------------------

/// One node of a two-player zero-sum game tree with chance.
///
/// Implementations must be deterministic: `legal_actions` depends only on
/// the state, and `step` returns a fresh value without touching `self`, so
/// sibling branches never observe each other.
///
/// The `Option` returns mark operations that are only defined in some
/// contexts. Returning `None` where the explorer needs a value aborts the
/// build with [`SeqFormError::OutOfContext`].
pub trait GameState: Clone {
    type Action: Clone + Eq + Hash + Debug + Serialize + Send + Sync;
    type Obs: Clone + Eq + Hash + Debug + Serialize + Send + Sync;

    /// Who acts here; `None` at a terminal.
    fn player(&self) -> Option<Player>;

    /// Ordered legal actions. Must be non-empty at every non-terminal.
    fn legal_actions(&self) -> Vec<Self::Action>;

    /// The state reached by taking `action`.
    fn step(&self, action: &Self::Action) -> Self;

    /// Probability of `action` at a chance node.
    fn chance_prob(&self, action: &Self::Action) -> Option<f64>;

    /// Information-set label of the acting player at a decision node.
    /// Must only depend on what that player has seen.
    fn observation(&self) -> Option<Self::Obs>;

    /// Gain of the first player (loss of the second) at a terminal.
    fn payoff(&self) -> Option<f64>;
}

pub(crate) fn out_of_context(operation: &'static str, player: Option<Player>) -> SeqFormError {
    SeqFormError::OutOfContext {
        operation,
        context: match player {
            Some(p) => p.to_string(),
            None => "terminal".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Behavioral strategies
// ---------------------------------------------------------------------------

/// Action probabilities per information set, in legal-action order.
pub type Behavior<O> = HashMap<O, Vec<f64>>;

/// A behavioral strategy for each seat.
#[derive(Debug, Clone)]
pub struct BehaviorProfile<O: Eq + Hash> {
    pub first: Behavior<O>,
    pub second: Behavior<O>,
}

impl<O: Eq + Hash> BehaviorProfile<O> {
    pub fn new(first: Behavior<O>, second: Behavior<O>) -> Self {
        BehaviorProfile { first, second }
    }

    pub fn seat(&self, seat: Seat) -> &Behavior<O> {
        match seat {
            Seat::First => &self.first,
            Seat::Second => &self.second,
        }
    }
}

/// Expected gain of the first player when both seats follow `profile`.
///
/// Walks the full tree with an explicit stack. Information sets missing from
/// the profile, or with the wrong number of probabilities, are rejected.
pub fn expected_value<S: GameState>(
    initial: &S,
    profile: &BehaviorProfile<S::Obs>,
) -> SeqFormResult<f64> {
    let mut total = 0.0;
    let mut stack: Vec<(S, f64)> = vec![(initial.clone(), 1.0)];

    while let Some((state, prob)) = stack.pop() {
        let Some(player) = state.player() else {
            let payoff = state
                .payoff()
                .ok_or_else(|| out_of_context("payoff", None))?;
            total += payoff * prob;
            continue;
        };

        let actions = state.legal_actions();
        if actions.is_empty() {
            return Err(SeqFormError::NoLegalActions { player });
        }

        match player.seat() {
            None => {
                for action in actions.iter().rev() {
                    let p = state
                        .chance_prob(action)
                        .ok_or_else(|| out_of_context("chance_prob", Some(player)))?;
                    stack.push((state.step(action), prob * p));
                }
            }
            Some(seat) => {
                let obs = state
                    .observation()
                    .ok_or_else(|| out_of_context("observation", Some(player)))?;
                let probs = profile.seat(seat).get(&obs).ok_or_else(|| {
                    SeqFormError::InvalidValue(format!(
                        "No strategy for {} at {:?}",
                        seat, obs
                    ))
                })?;
                if probs.len() != actions.len() {
                    return Err(SeqFormError::InvalidValue(format!(
                        "Strategy for {} at {:?} has {} probabilities for {} actions",
                        seat,
                        obs,
                        probs.len(),
                        actions.len()
                    )));
                }
                for (action, &p) in actions.iter().zip(probs).rev() {
                    stack.push((state.step(action), prob * p));
                }
            }
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chance_has_no_seat() {
        assert_eq!(Player::Chance.seat(), None);
        assert_eq!(Player::First.seat(), Some(Seat::First));
        assert_eq!(Player::Second.seat(), Some(Seat::Second));
    }

    #[test]
    fn seat_round_trips_through_player() {
        for seat in Seat::BOTH {
            assert_eq!(Player::from(seat).seat(), Some(seat));
            assert_eq!(seat.opponent().opponent(), seat);
        }
        assert_eq!(Seat::First.index(), 0);
        assert_eq!(Seat::Second.index(), 1);
    }
}
