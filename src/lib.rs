//! Sequence-form construction for two-player zero-sum extensive-form games.
//!
//! A game is supplied as a [`GameState`] state machine. [`build`] explores
//! every path, groups decision points into information sets by observation,
//! lays each seat's sequences out in canonical preorder and assembles the
//! sparse payoff matrix between them:
//!
//! ```text
//! GameState -> explore -> canonicalize (per seat) -> assemble -> SequenceForm
//! ```

pub mod assembler;
pub mod canonical;
pub mod cli;
pub mod display;
pub mod error;
pub mod explorer;
pub mod game;
pub mod games;
pub mod sequence_form;

pub use assembler::SparseMatrix;
pub use canonical::SequenceTree;
pub use error::{SeqFormError, SeqFormResult};
pub use game::{expected_value, BehaviorProfile, GameState, Player, Seat};
pub use sequence_form::{build, SequenceForm};
