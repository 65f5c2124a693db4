//! Host expression boundary: evaluatability filtering and translation to
//! store-side SQL fragments.
//!
//! The host pipeline consults [`CompositeEvaluatabilityFilter`] first; nodes
//! it rejects are handed to the [`TranslatorChain`], which walks the node,
//! lowers constants through the mapping registry, and dispatches calls and
//! member accesses to capability translators by exact method identity.
//! Translators answer `Ok(None)` for nodes outside their capability; the
//! chain tries the next one.

#![forbid(unsafe_code)]

pub mod chain;
pub mod evaluatable;
pub mod fulltext;
pub mod network;
pub mod temporal;

pub use chain::{Translator, TranslatorChain};
pub use evaluatable::{
    CompositeEvaluatabilityFilter, EvaluatabilitySubFilter, FullTextEvaluatabilityFilter,
    NetworkEvaluatabilityFilter, TemporalEvaluatabilityFilter,
};
pub use fulltext::FullTextTranslator;
pub use network::NetworkTranslator;
pub use temporal::TemporalTranslator;
