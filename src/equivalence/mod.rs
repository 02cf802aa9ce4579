//! Expression equivalence checking
//!
//! Prompt construction, reply parsing and the check pipeline that ties them
//! to a provider.

pub mod checker;
pub mod prompt;
pub mod verdict;

#[cfg(test)]
pub mod testing;
