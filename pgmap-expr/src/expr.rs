//! Host-side expression tree at the translation boundary.
//!
//! The host pipeline hands these nodes in one at a time during translation.
//! Method and member identities are capability-tagged enums rather than
//! name strings, so a user-defined member that happens to share a name with
//! a store function can never be picked up by accident.

use pgmap_types::{HostType, Value};

/// One node of the host expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum HostExpr {
    /// A compile-time-known constant.
    Constant { value: Value, ty: HostType },
    /// Reference to a store column.
    Column { name: String, ty: HostType },
    /// A deferred query parameter.
    Parameter { name: String, ty: HostType },
    /// A method call with statically known identity.
    Call(HostCall),
    /// A member access with statically known identity.
    Member(HostMemberAccess),
}

/// Method-call node: identity, optional receiver, arguments, declared
/// return type.
#[derive(Debug, Clone, PartialEq)]
pub struct HostCall {
    pub method: HostMethod,
    pub target: Option<Box<HostExpr>>,
    pub args: Vec<HostExpr>,
    pub return_type: HostType,
}

/// Member-access node: identity, receiver, declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct HostMemberAccess {
    pub member: HostMember,
    pub target: Box<HostExpr>,
    pub ty: HostType,
}

impl HostExpr {
    pub fn constant(value: impl Into<Value>, ty: HostType) -> HostExpr {
        HostExpr::Constant {
            value: value.into(),
            ty,
        }
    }

    pub fn column(name: impl Into<String>, ty: HostType) -> HostExpr {
        HostExpr::Column {
            name: name.into(),
            ty,
        }
    }

    pub fn parameter(name: impl Into<String>, ty: HostType) -> HostExpr {
        HostExpr::Parameter {
            name: name.into(),
            ty,
        }
    }

    /// Declared type of this node.
    pub fn ty(&self) -> &HostType {
        match self {
            HostExpr::Constant { ty, .. }
            | HostExpr::Column { ty, .. }
            | HostExpr::Parameter { ty, .. } => ty,
            HostExpr::Call(call) => &call.return_type,
            HostExpr::Member(member) => &member.ty,
        }
    }

    /// The constant value, when this node is a constant.
    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            HostExpr::Constant { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Capability-tagged method identity.
///
/// Each capability domain contributes its own enum; the core never matches
/// on names across domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMethod {
    Temporal(TemporalMethod),
    FullText(FullTextMethod),
    Network(NetworkMethod),
}

/// Capability-tagged member identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMember {
    Temporal(TemporalMember),
}

/// Temporal helper methods with no local evaluation semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalMethod {
    /// Current timestamp in the store's local time zone.
    LocalNow,
    /// Current timestamp normalized to UTC.
    UtcNow,
    /// Current date, truncated to day granularity.
    Today,
}

/// Date/time component members on temporal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalMember {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    DayOfWeek,
    DayOfYear,
    Date,
    TimeOfDay,
}

/// Full-text search methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullTextMethod {
    ToTsVector,
    ToTsQuery,
    PlainToTsQuery,
    PhraseToTsQuery,
    WebSearchToTsQuery,
    /// `vector.Matches(query)`.
    Matches,
    /// Vector concatenation.
    Concat,
    Rank,
    RankCoverDensity,
    Headline,
    SetWeight,
}

/// Network-address methods over inet/cidr values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMethod {
    ContainedBy,
    ContainedByOrEqual,
    Contains,
    ContainsOrEqual,
    ContainsOrContainedBy,
    Abbreviate,
    Broadcast,
    Host,
    MaskLength,
    Netmask,
    Network,
    SetMaskLength,
    Text,
    SameFamily,
    Merge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_types_are_reachable_through_ty() {
        let col = HostExpr::column("created_at", HostType::Timestamp);
        assert_eq!(col.ty(), &HostType::Timestamp);

        let member = HostExpr::Member(HostMemberAccess {
            member: HostMember::Temporal(TemporalMember::Year),
            target: Box::new(col),
            ty: HostType::Int32,
        });
        assert_eq!(member.ty(), &HostType::Int32);

        let call = HostExpr::Call(HostCall {
            method: HostMethod::Temporal(TemporalMethod::UtcNow),
            target: None,
            args: vec![],
            return_type: HostType::TimestampTz,
        });
        assert_eq!(call.ty(), &HostType::TimestampTz);
    }

    #[test]
    fn constants_expose_their_value() {
        let node = HostExpr::constant(5i32, HostType::Int32);
        assert_eq!(node.as_constant(), Some(&Value::Int32(5)));
        assert_eq!(
            HostExpr::column("a", HostType::Int32).as_constant(),
            None
        );
    }

    #[test]
    fn method_identity_is_compared_structurally() {
        let a = HostMethod::FullText(FullTextMethod::Rank);
        let b = HostMethod::FullText(FullTextMethod::RankCoverDensity);
        assert_ne!(a, b);
        assert_eq!(a, HostMethod::FullText(FullTextMethod::Rank));
    }
}
