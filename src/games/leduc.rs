//! Leduc hold'em: two copies of each rank, one private card per seat, one
//! community card, two betting rounds with raises of 2 then 4 and at most
//! two raises per round.

use std::sync::Arc;

use itertools::iproduct;

use crate::error::{SeqFormError, SeqFormResult};
use crate::game::{GameState, Player};

use super::history_label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeducHoldem {
    /// Ranks from lowest to highest.
    ranks: Arc<Vec<char>>,
    terminated: bool,
    flop: bool,
    community: Option<char>,
    bet: [u32; 2],
    raises: u32,
    /// `history[0]` is the deal, one card per seat.
    history: Vec<String>,
    last: Option<Player>,
}

impl LeducHoldem {
    /// Standard Leduc with J, Q, K.
    pub fn new() -> Self {
        Self::from_ranks(vec!['J', 'Q', 'K'])
    }

    /// Leduc over the given ranks, lowest first (e.g. `"23456789TJQKA"`).
    pub fn with_ranks(ranks: &str) -> SeqFormResult<Self> {
        let ranks: Vec<char> = ranks.chars().collect();
        if ranks.len() < 2 {
            return Err(SeqFormError::InvalidValue(
                "Leduc needs at least 2 ranks".to_string(),
            ));
        }
        for (i, r) in ranks.iter().enumerate() {
            if ranks[..i].contains(r) {
                return Err(SeqFormError::InvalidValue(format!("Duplicate rank: {}", r)));
            }
        }
        Ok(Self::from_ranks(ranks))
    }

    fn from_ranks(ranks: Vec<char>) -> Self {
        LeducHoldem {
            ranks: Arc::new(ranks),
            terminated: false,
            flop: false,
            community: None,
            bet: [1, 1],
            raises: 0,
            history: Vec::new(),
            last: None,
        }
    }

    fn hole(&self, seat: usize) -> Option<char> {
        self.history.first()?.chars().nth(seat)
    }

    fn rank(&self, card: char) -> Option<usize> {
        self.ranks.iter().position(|&r| r == card)
    }

    fn last_action(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }
}

impl Default for LeducHoldem {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for LeducHoldem {
    type Action = String;
    type Obs = String;

    fn player(&self) -> Option<Player> {
        if self.terminated {
            return None;
        }
        if self.history.is_empty() || (self.flop && self.community.is_none()) {
            return Some(Player::Chance);
        }
        match self.last {
            Some(Player::First) => Some(Player::Second),
            _ => Some(Player::First),
        }
    }

    fn legal_actions(&self) -> Vec<String> {
        let Some(player) = self.player() else {
            return Vec::new();
        };
        if player == Player::Chance {
            if self.history.is_empty() {
                return iproduct!(self.ranks.iter(), self.ranks.iter())
                    .map(|(a, b)| format!("{}{}", a, b))
                    .collect();
            }
            let (a, b) = (self.hole(0), self.hole(1));
            return self
                .ranks
                .iter()
                .filter(|&&r| a != b || Some(r) != a)
                .map(|r| r.to_string())
                .collect();
        }
        let actions: &[&str] = match self.last_action() {
            Some("Raise") if self.raises >= 2 => &["Fold", "Call"],
            Some("Raise") => &["Fold", "Call", "Raise"],
            _ => &["Check", "Raise"],
        };
        actions.iter().map(|a| a.to_string()).collect()
    }

    fn step(&self, action: &String) -> Self {
        let mut next = self.clone();
        let player = self.player();
        next.last = player;
        next.history.push(action.clone());

        let Some(seat) = player.and_then(Player::seat) else {
            if !self.history.is_empty() {
                next.community = action.chars().next();
            }
            return next;
        };

        match action.as_str() {
            "Raise" => {
                let size = if self.flop { 4 } else { 2 };
                next.bet[seat.index()] = self.bet[seat.opponent().index()] + size;
                next.raises += 1;
            }
            "Check" if self.last_action() == Some("Check") => {
                if self.flop {
                    next.terminated = true;
                } else {
                    next.flop = true;
                }
            }
            "Call" => {
                next.bet[seat.index()] = self.bet[seat.opponent().index()];
                next.raises = 0;
                if self.flop {
                    next.terminated = true;
                } else {
                    next.flop = true;
                }
            }
            "Fold" => next.terminated = true,
            _ => {}
        }
        next
    }

    fn chance_prob(&self, action: &String) -> Option<f64> {
        if self.player()? != Player::Chance {
            return None;
        }
        let n = self.ranks.len() as f64;
        let cards: Vec<char> = action.chars().collect();
        if self.history.is_empty() {
            // Two copies of each rank, 2n cards in the deck.
            let pairs = n * (2.0 * n - 1.0);
            let paired = cards.first()? == cards.get(1)?;
            return Some(if paired { 1.0 / pairs } else { 2.0 / pairs });
        }
        let (a, b) = (self.hole(0)?, self.hole(1)?);
        let card = *cards.first()?;
        Some(if a != b && (card == a || card == b) {
            1.0 / (2.0 * (n - 1.0))
        } else {
            1.0 / (n - 1.0)
        })
    }

    fn observation(&self) -> Option<String> {
        let seat = self.player()?.seat()?;
        Some(history_label(self.hole(seat.index())?, &self.history[1..]))
    }

    fn payoff(&self) -> Option<f64> {
        if !self.terminated {
            return None;
        }
        if self.last_action() == Some("Fold") {
            return Some(match self.last? {
                Player::First => -(self.bet[0] as f64),
                _ => self.bet[1] as f64,
            });
        }
        let pot = self.bet[0] as f64;
        let (a, b) = (self.hole(0)?, self.hole(1)?);
        let community = self.community?;
        if a == community {
            return Some(pot);
        }
        if b == community {
            return Some(-pot);
        }
        let (ra, rb) = (self.rank(a)?, self.rank(b)?);
        Some(match ra.cmp(&rb) {
            std::cmp::Ordering::Greater => pot,
            std::cmp::Ordering::Less => -pot,
            std::cmp::Ordering::Equal => 0.0,
        })
    }
}
