//! Keyword search over display text.
//!
//! [`search::find_matches`] is the pure scan; [`session::SearchSession`] keeps
//! the last keyword, its spans and the current-match cursor between reloads.

pub mod errors;
pub mod search;
pub mod session;
