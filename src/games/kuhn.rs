//! Kuhn poker: three cards, ante 1, a single bet of 1.

use crate::game::{GameState, Player};

use super::history_label;

const DEALS: [&str; 6] = ["JQ", "JK", "QJ", "QK", "KJ", "KQ"];
const RANKS: &str = "JQK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KuhnPoker {
    terminated: bool,
    bet: [u32; 2],
    /// `history[0]` is the deal, one card per seat.
    history: Vec<String>,
}

impl KuhnPoker {
    pub fn new() -> Self {
        KuhnPoker {
            terminated: false,
            bet: [1, 1],
            history: Vec::new(),
        }
    }

    fn card(&self, seat: usize) -> Option<char> {
        self.history.first()?.chars().nth(seat)
    }
}

impl Default for KuhnPoker {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for KuhnPoker {
    type Action = String;
    type Obs = String;

    fn player(&self) -> Option<Player> {
        if self.terminated {
            return None;
        }
        if self.history.is_empty() {
            return Some(Player::Chance);
        }
        if self.history.len() % 2 == 0 {
            Some(Player::Second)
        } else {
            Some(Player::First)
        }
    }

    fn legal_actions(&self) -> Vec<String> {
        let actions: &[&str] = match (self.player(), self.history.last().map(String::as_str)) {
            (None, _) => &[],
            (Some(Player::Chance), _) => &DEALS,
            (_, Some("Bet")) => &["Fold", "Call"],
            _ => &["Check", "Bet"],
        };
        actions.iter().map(|a| a.to_string()).collect()
    }

    fn step(&self, action: &String) -> Self {
        let mut next = self.clone();
        let seat = match self.player().and_then(Player::seat) {
            Some(seat) => seat,
            None => {
                next.history.push(action.clone());
                return next;
            }
        };
        match action.as_str() {
            "Bet" => next.bet[seat.index()] = self.bet[seat.opponent().index()] + 1,
            "Check" if self.history.last().map(String::as_str) == Some("Check") => {
                next.terminated = true
            }
            "Call" => {
                next.bet[seat.index()] = self.bet[seat.opponent().index()];
                next.terminated = true;
            }
            "Fold" => next.terminated = true,
            _ => {}
        }
        next.history.push(action.clone());
        next
    }

    fn chance_prob(&self, _action: &String) -> Option<f64> {
        (self.player() == Some(Player::Chance)).then(|| 1.0 / DEALS.len() as f64)
    }

    fn observation(&self) -> Option<String> {
        let seat = self.player()?.seat()?;
        Some(history_label(self.card(seat.index())?, &self.history[1..]))
    }

    fn payoff(&self) -> Option<f64> {
        if !self.terminated {
            return None;
        }
        if self.history.last().map(String::as_str) == Some("Fold") {
            // Even length: the first seat made the last move.
            return Some(if self.history.len() % 2 == 0 {
                -(self.bet[0] as f64)
            } else {
                self.bet[1] as f64
            });
        }
        let pot = self.bet[0] as f64;
        let first = RANKS.find(self.card(0)?)?;
        let second = RANKS.find(self.card(1)?)?;
        Some(if first > second { pot } else { -pot })
    }
}
