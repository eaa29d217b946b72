//! Goofspiel: each round chance reveals a prize card, then both seats bid a
//! card from their own hand. The first bid is hidden from the second seat
//! until the round resolves. The higher bid wins the prize's value.

use std::sync::Arc;

use crate::error::{SeqFormError, SeqFormResult};
use crate::game::{GameState, Player};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goofspiel {
    /// Cards from lowest to highest; a card's prize value is its rank + 1.
    cards: Arc<Vec<char>>,
    /// Remaining cards of the first seat, the second seat and the prize deck.
    hands: [Vec<char>; 3],
    prize: Option<char>,
    first_bid: Option<char>,
    score: i64,
    /// One `"<prize><bid1><bid2>"` entry per finished round.
    history: Vec<String>,
}

const PRIZES: usize = 2;

impl Goofspiel {
    /// Four-card Goofspiel over A, 2, 3, 4.
    pub fn new() -> Self {
        Self::from_cards(vec!['A', '2', '3', '4'])
    }

    pub fn with_cards(cards: &str) -> SeqFormResult<Self> {
        let cards: Vec<char> = cards.chars().collect();
        if cards.is_empty() {
            return Err(SeqFormError::InvalidValue(
                "Goofspiel needs at least 1 card".to_string(),
            ));
        }
        for (i, c) in cards.iter().enumerate() {
            if cards[..i].contains(c) {
                return Err(SeqFormError::InvalidValue(format!("Duplicate card: {}", c)));
            }
        }
        Ok(Self::from_cards(cards))
    }

    fn from_cards(cards: Vec<char>) -> Self {
        Goofspiel {
            hands: [cards.clone(), cards.clone(), cards.clone()],
            cards: Arc::new(cards),
            prize: None,
            first_bid: None,
            score: 0,
            history: Vec::new(),
        }
    }

    fn rank(&self, card: char) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    /// Score change for the first seat when `bid` meets `card` over `prize`.
    fn settle(&self, prize: char, bid: char, card: char) -> Option<i64> {
        let value = self.rank(prize)? as i64 + 1;
        Some(match self.rank(bid)?.cmp(&self.rank(card)?) {
            std::cmp::Ordering::Greater => value,
            std::cmp::Ordering::Less => -value,
            std::cmp::Ordering::Equal => 0,
        })
    }
}

impl Default for Goofspiel {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for Goofspiel {
    type Action = String;
    type Obs = String;

    fn player(&self) -> Option<Player> {
        if self.hands[PRIZES].is_empty() {
            return None;
        }
        Some(match (self.prize, self.first_bid) {
            (None, _) => Player::Chance,
            (Some(_), None) => Player::First,
            (Some(_), Some(_)) => Player::Second,
        })
    }

    fn legal_actions(&self) -> Vec<String> {
        let hand = match self.player() {
            None => return Vec::new(),
            Some(Player::Chance) => &self.hands[PRIZES],
            Some(Player::First) => &self.hands[0],
            Some(Player::Second) => &self.hands[1],
        };
        hand.iter().map(|c| c.to_string()).collect()
    }

    fn step(&self, action: &String) -> Self {
        let mut next = self.clone();
        let Some(card) = action.chars().next() else {
            return next;
        };
        match self.player() {
            Some(Player::Chance) => next.prize = Some(card),
            Some(Player::First) => next.first_bid = Some(card),
            Some(Player::Second) => {
                let (Some(prize), Some(bid)) = (self.prize, self.first_bid) else {
                    return next;
                };
                let Some(delta) = self.settle(prize, bid, card) else {
                    return next;
                };
                next.hands[PRIZES].retain(|&c| c != prize);
                next.hands[0].retain(|&c| c != bid);
                next.hands[1].retain(|&c| c != card);
                next.score += delta;
                next.history.push(format!("{}{}{}", prize, bid, card));
                next.prize = None;
                next.first_bid = None;
            }
            None => {}
        }
        next
    }

    fn chance_prob(&self, _action: &String) -> Option<f64> {
        (self.player()? == Player::Chance).then(|| 1.0 / self.hands[PRIZES].len() as f64)
    }

    fn observation(&self) -> Option<String> {
        self.player()?.seat()?;
        let prize = self.prize?;
        Some(
            self.history
                .iter()
                .cloned()
                .chain(std::iter::once(prize.to_string()))
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    fn payoff(&self) -> Option<f64> {
        self.player().is_none().then_some(self.score as f64)
    }
}
