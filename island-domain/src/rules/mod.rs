//! Theme rule evaluation: a priority-ordered, first-match-wins rule engine
//! backed by a shared cache of compiled patterns.

pub mod engine;
pub mod errors;
pub mod regex_cache;

pub use engine::{RuleEngine, RuleMatch};
pub use errors::RuleError;
pub use regex_cache::RegexCache;
