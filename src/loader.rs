//! CSV readers for user-supplied cells and load profiles.
//!
//! The readers are strict. Substituting a default for malformed input is up to the caller.

pub mod cell;
pub mod profile;
