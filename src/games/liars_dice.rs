//! Liar's Dice with six-sided dice. Each seat rolls privately, then the
//! seats alternate raising a bid `face:count` until one calls `liar`.

use std::sync::Arc;

use itertools::Itertools;

use crate::error::{SeqFormError, SeqFormResult};
use crate::game::{GameState, Player};

use super::history_label;

const FACES: u32 = 6;
const LIAR: &str = "liar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiarsDice {
    dice: u32,
    /// Every sorted roll of `dice` dice, e.g. `"1"`..`"6"` for one die.
    rolls: Arc<Vec<String>>,
    hands: Option<[String; 2]>,
    bid: Option<(u32, u32)>,
    /// `history[0]` is the roll `"<first>:<second>"`.
    history: Vec<String>,
}

impl LiarsDice {
    pub fn new(dice: u32) -> SeqFormResult<Self> {
        if dice == 0 || dice > 9 {
            return Err(SeqFormError::InvalidValue(format!(
                "Dice per player must be between 1 and 9, got {}",
                dice
            )));
        }
        let rolls = (1..=FACES)
            .combinations_with_replacement(dice as usize)
            .map(|faces| faces.iter().map(|f| f.to_string()).collect::<String>())
            .collect();
        Ok(LiarsDice {
            dice,
            rolls: Arc::new(rolls),
            hands: None,
            bid: None,
            history: Vec::new(),
        })
    }

    /// Probability of one sorted roll: its multinomial count over 6^dice.
    fn roll_prob(&self, roll: &str) -> f64 {
        let mut ways = factorial(self.dice);
        for repeats in roll.chars().counts().into_values() {
            ways /= factorial(repeats as u32);
        }
        ways / (FACES as f64).powi(self.dice as i32)
    }

    fn count(&self, face: u32) -> u32 {
        let face = char::from_digit(face, 10);
        self.hands
            .iter()
            .flatten()
            .map(|hand| hand.chars().filter(|&c| Some(c) == face).count() as u32)
            .sum()
    }
}

fn factorial(n: u32) -> f64 {
    (1..=n).map(f64::from).product()
}

fn parse_bid(action: &str) -> Option<(u32, u32)> {
    let (face, count) = action.split_once(':')?;
    Some((face.parse().ok()?, count.parse().ok()?))
}

impl GameState for LiarsDice {
    type Action = String;
    type Obs = String;

    fn player(&self) -> Option<Player> {
        if self.history.last().map(String::as_str) == Some(LIAR) {
            return None;
        }
        if self.hands.is_none() {
            return Some(Player::Chance);
        }
        if self.history.len() % 2 == 0 {
            Some(Player::Second)
        } else {
            Some(Player::First)
        }
    }

    fn legal_actions(&self) -> Vec<String> {
        match self.player() {
            None => Vec::new(),
            Some(Player::Chance) => self
                .rolls
                .iter()
                .cartesian_product(self.rolls.iter())
                .map(|(a, b)| format!("{}:{}", a, b))
                .collect(),
            Some(_) => {
                let max_count = 2 * self.dice;
                let (face, count) = self.bid.unwrap_or((1, 0));
                let mut actions: Vec<String> = (face..=FACES)
                    .cartesian_product(1..=max_count)
                    .filter(|&(f, n)| face < f || count < n)
                    .map(|(f, n)| format!("{}:{}", f, n))
                    .collect();
                if self.bid.is_some() {
                    actions.push(LIAR.to_string());
                }
                actions
            }
        }
    }

    fn step(&self, action: &String) -> Self {
        let mut next = self.clone();
        match self.player() {
            Some(Player::Chance) => {
                if let Some((a, b)) = action.split_once(':') {
                    next.hands = Some([a.to_string(), b.to_string()]);
                }
            }
            Some(_) if action != LIAR => next.bid = parse_bid(action),
            _ => {}
        }
        next.history.push(action.clone());
        next
    }

    fn chance_prob(&self, action: &String) -> Option<f64> {
        if self.player()? != Player::Chance {
            return None;
        }
        let (a, b) = action.split_once(':')?;
        Some(self.roll_prob(a) * self.roll_prob(b))
    }

    fn observation(&self) -> Option<String> {
        let seat = self.player()?.seat()?;
        let hands = self.hands.as_ref()?;
        Some(history_label(&hands[seat.index()], &self.history[1..]))
    }

    fn payoff(&self) -> Option<f64> {
        if self.player().is_some() {
            return None;
        }
        let (face, count) = self.bid?;
        let bid_holds = self.count(face) >= count;
        // Odd length: the last bid came from the first seat.
        let bid_by_first = self.history.len() % 2 == 1;
        Some(if bid_holds == bid_by_first { 1.0 } else { -1.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(actions: &[&str]) -> LiarsDice {
        actions
            .iter()
            .fold(LiarsDice::new(1).unwrap(), |state, a| state.step(&a.to_string()))
    }

    #[test]
    fn roll_probabilities_sum_to_one() {
        for dice in 1..=2 {
            let root = LiarsDice::new(dice).unwrap();
            let total: f64 = root
                .legal_actions()
                .iter()
                .map(|a| root.chance_prob(a).unwrap())
                .sum();
            assert!((total - 1.0).abs() < 1e-12, "dice {}: {}", dice, total);
        }
    }

    #[test]
    fn opening_bids_exclude_liar() {
        let state = play(&["3:5"]);
        let actions = state.legal_actions();
        assert_eq!(actions.len(), 12);
        assert!(!actions.contains(&LIAR.to_string()));
    }

    #[test]
    fn bids_must_increase() {
        let state = play(&["3:5", "5:2"]);
        let actions = state.legal_actions();
        assert_eq!(actions, vec!["6:1", "6:2", "liar"]);
    }

    #[test]
    fn liar_call_settles_bid() {
        // First seat bids two 3s with only one 3 showing; second calls.
        assert_eq!(play(&["3:5", "3:2", "liar"]).payoff(), Some(-1.0));
        // First seat bids one 5, which holds.
        assert_eq!(play(&["3:5", "5:1", "liar"]).payoff(), Some(1.0));
        // Second seat bids one 6, which fails; first calls.
        assert_eq!(play(&["3:5", "5:1", "6:1", "liar"]).payoff(), Some(1.0));
    }

    #[test]
    fn observation_shows_own_roll_only() {
        assert_eq!(play(&["3:5"]).observation().as_deref(), Some("3"));
        assert_eq!(play(&["3:5", "2:1"]).observation().as_deref(), Some("5,2:1"));
    }
}
