//! Platform integration boundary.
//!
//! The core never interprets platform commands itself; it parses them and
//! relays them to optional collaborators, absorbing every failure.

pub mod media;
