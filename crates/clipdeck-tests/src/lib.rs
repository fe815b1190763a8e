//! Integration test crate for ClipDeck.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple clipdeck crates to verify they work together.

#[cfg(test)]
mod container;

#[cfg(test)]
mod codec;

#[cfg(test)]
mod audio;
