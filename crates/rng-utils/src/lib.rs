//! # rng-utils
//!
//! Secure random generation and zero-on-drop byte wrappers shared by the
//! stamps/SRC-20 transaction core (knapsack selection, short-lived key
//! material).

pub mod random;
pub mod zeroizing;
