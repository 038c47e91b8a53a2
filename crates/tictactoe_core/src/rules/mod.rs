//! Game rules for n×n tic-tac-toe.
//!
//! Pure functions over a [`Grid`](super::Grid). Rules are separated from
//! board storage so the transition logic can compose them.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::check_winner;
