//! Support classification rules for processed crash reports.
//!
//! A processed crash (the output of a stackwalker, plus whatever the rest of the
//! pipeline has attached to it) is handed to a series of [`SupportClassificationRule`]s.
//! Each rule decides whether it applies, and if so writes a single
//! [`ClassificationRecord`] into `classifications.support` explaining to the user
//! what went wrong, e.g. "your operating system is no longer supported".
//!
//! Use [`ClassifierRuleSet::default_rules`] to get the standard rules, or
//! implement [`SupportClassificationRule`] for your own.

mod bitguard;
mod context;
mod crash;
mod out_of_date;
mod rule;
mod rule_set;
mod version;

pub use bitguard::*;
pub use context::*;
pub use crash::*;
pub use out_of_date::*;
pub use rule::*;
pub use rule_set::*;
pub use version::*;
