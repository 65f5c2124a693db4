//! Decides whether an expression node may be evaluated client-side.
//!
//! Each capability domain contributes a sub-filter that vetoes the syntactic
//! shapes it knows must run at the store; everything else it defers on. The
//! composite answer is the logical AND of every sub-filter across the whole
//! subtree, so a new capability domain slots in without touching existing
//! ones and can only make the composite stricter.

use pgmap_expr::expr::{HostExpr, HostMethod};

/// One capability domain's veto. Returns `false` only for shapes this
/// domain recognizes as store-only; `true` defers to the other filters.
pub trait EvaluatabilitySubFilter: Send + Sync {
    fn name(&self) -> &str;
    fn allows(&self, node: &HostExpr) -> bool;
}

/// Vetoes temporal helper calls. Current-time functions have no meaningful
/// client-side value: evaluating them locally would freeze the clock at
/// query-compilation time.
pub struct TemporalEvaluatabilityFilter;

impl EvaluatabilitySubFilter for TemporalEvaluatabilityFilter {
    fn name(&self) -> &str {
        "temporal"
    }

    fn allows(&self, node: &HostExpr) -> bool {
        !matches!(
            node,
            HostExpr::Call(call) if matches!(call.method, HostMethod::Temporal(_))
        )
    }
}

/// Vetoes full-text helper calls. Parsing and weighting depend on store-side
/// text-search configurations that do not exist client-side.
pub struct FullTextEvaluatabilityFilter;

impl EvaluatabilitySubFilter for FullTextEvaluatabilityFilter {
    fn name(&self) -> &str {
        "fulltext"
    }

    fn allows(&self, node: &HostExpr) -> bool {
        !matches!(
            node,
            HostExpr::Call(call) if matches!(call.method, HostMethod::FullText(_))
        )
    }
}

/// Vetoes network-address helper calls.
pub struct NetworkEvaluatabilityFilter;

impl EvaluatabilitySubFilter for NetworkEvaluatabilityFilter {
    fn name(&self) -> &str {
        "network"
    }

    fn allows(&self, node: &HostExpr) -> bool {
        !matches!(
            node,
            HostExpr::Call(call) if matches!(call.method, HostMethod::Network(_))
        )
    }
}

/// The ordered veto chain. A node is locally evaluatable only when every
/// sub-filter allows it and every child node is itself locally evaluatable.
pub struct CompositeEvaluatabilityFilter {
    filters: Vec<Box<dyn EvaluatabilitySubFilter>>,
}

impl CompositeEvaluatabilityFilter {
    pub fn new(filters: Vec<Box<dyn EvaluatabilitySubFilter>>) -> Self {
        Self { filters }
    }

    /// Composite with the built-in capability sub-filters.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            Box::new(TemporalEvaluatabilityFilter),
            Box::new(FullTextEvaluatabilityFilter),
            Box::new(NetworkEvaluatabilityFilter),
        ])
    }

    pub fn is_locally_evaluatable(&self, node: &HostExpr) -> bool {
        for filter in &self.filters {
            if !filter.allows(node) {
                tracing::debug!(filter = filter.name(), "node vetoed for local evaluation");
                return false;
            }
        }
        match node {
            HostExpr::Call(call) => {
                call.target
                    .as_deref()
                    .map(|t| self.is_locally_evaluatable(t))
                    .unwrap_or(true)
                    && call.args.iter().all(|a| self.is_locally_evaluatable(a))
            }
            HostExpr::Member(member) => self.is_locally_evaluatable(&member.target),
            HostExpr::Constant { .. } | HostExpr::Column { .. } | HostExpr::Parameter { .. } => {
                true
            }
        }
    }
}

impl Default for CompositeEvaluatabilityFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgmap_expr::expr::{
        FullTextMethod, HostCall, NetworkMethod, TemporalMethod,
    };
    use pgmap_types::HostType;

    fn utc_now() -> HostExpr {
        HostExpr::Call(HostCall {
            method: HostMethod::Temporal(TemporalMethod::UtcNow),
            target: None,
            args: vec![],
            return_type: HostType::TimestampTz,
        })
    }

    #[test]
    fn plain_nodes_are_locally_evaluatable() {
        let filter = CompositeEvaluatabilityFilter::with_defaults();
        assert!(filter.is_locally_evaluatable(&HostExpr::constant(1i32, HostType::Int32)));
        assert!(filter.is_locally_evaluatable(&HostExpr::column("a", HostType::Int32)));
        assert!(filter.is_locally_evaluatable(&HostExpr::parameter("p", HostType::Text)));
    }

    #[test]
    fn one_veto_rejects_regardless_of_other_filters() {
        let filter = CompositeEvaluatabilityFilter::with_defaults();
        assert!(!filter.is_locally_evaluatable(&utc_now()));

        let fulltext = HostExpr::Call(HostCall {
            method: HostMethod::FullText(FullTextMethod::ToTsVector),
            target: None,
            args: vec![HostExpr::constant("body", HostType::Text)],
            return_type: HostType::TsVector,
        });
        assert!(!filter.is_locally_evaluatable(&fulltext));

        let network = HostExpr::Call(HostCall {
            method: HostMethod::Network(NetworkMethod::Host),
            target: None,
            args: vec![HostExpr::column("ip", HostType::Inet)],
            return_type: HostType::Text,
        });
        assert!(!filter.is_locally_evaluatable(&network));
    }

    #[test]
    fn veto_propagates_up_through_enclosing_nodes() {
        let filter = CompositeEvaluatabilityFilter::with_defaults();
        use pgmap_expr::expr::{HostMember, HostMemberAccess, TemporalMember};
        let nested = HostExpr::Member(HostMemberAccess {
            member: HostMember::Temporal(TemporalMember::Year),
            target: Box::new(utc_now()),
            ty: HostType::Int32,
        });
        assert!(!filter.is_locally_evaluatable(&nested));
    }

    #[test]
    fn an_empty_chain_allows_everything() {
        let filter = CompositeEvaluatabilityFilter::new(vec![]);
        assert!(filter.is_locally_evaluatable(&utc_now()));
    }
}
