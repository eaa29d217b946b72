//! Small benchmark games implementing [`crate::game::GameState`].
//!
//! All payoffs are the first seat's gain. Observations are a seat's private
//! holding followed by the public history, joined with commas.

pub mod goofspiel;
pub mod kuhn;
pub mod leduc;
pub mod liars_dice;

pub use goofspiel::Goofspiel;
pub use kuhn::KuhnPoker;
pub use leduc::LeducHoldem;
pub use liars_dice::LiarsDice;

/// `"<private>,<h1>,<h2>,..."`.
pub(crate) fn history_label<P: std::fmt::Display>(private: P, history: &[String]) -> String {
    std::iter::once(private.to_string())
        .chain(history.iter().cloned())
        .collect::<Vec<_>>()
        .join(",")
}
