//! Expression representations at the host/store boundary.
//!
//! `expr` holds the immutable host-side tree handed in by the query
//! pipeline; `sql` holds the store-side form that translators emit. Both are
//! plain data with no behavior beyond construction helpers and rendering.

#![forbid(unsafe_code)]

pub mod expr;
pub mod sql;

pub use expr::{
    FullTextMethod, HostCall, HostExpr, HostMemberAccess, HostMember, HostMethod, NetworkMethod,
    TemporalMember, TemporalMethod,
};
pub use sql::{SqlExpr, SqlOperator};
