//! Season statistics and multiple-choice trivia for a single football club.
//!
//! Raw fixtures are loaded once ([`season`], [`store`]), turned into an immutable per-club table
//! ([`matches::derive_match_statistics`]) and then queried for fresh questions
//! ([`questions::generate_quiz_question`]) as often as needed.
pub mod error;
pub mod matches;
pub mod questions;
pub mod report;
pub mod season;
pub mod store;

#[cfg(test)]
mod testing;
