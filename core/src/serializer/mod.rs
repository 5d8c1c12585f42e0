//! Serializers for the logical model.
//!
//! Only the rule language itself is supported ([`rls`]); its output re-parses
//! to structurally equal statements.

pub mod rls;

pub use rls::{to_rls, to_rls_with_prefixes};
