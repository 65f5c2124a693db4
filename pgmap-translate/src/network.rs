//! Network-address method translation.
//!
//! Containment relations lower to the store's inet operators; everything
//! else is a direct function call. The host surface exposes these as
//! two-operand helper methods with no receiver, so the operand list is the
//! argument list as given.

use pgmap_expr::expr::{HostCall, HostMethod, NetworkMethod};
use pgmap_expr::sql::{SqlExpr, SqlOperator};
use pgmap_result::Result;

use crate::chain::Translator;

pub struct NetworkTranslator;

impl Translator for NetworkTranslator {
    fn name(&self) -> &str {
        "network"
    }

    fn translate_call(
        &self,
        call: &HostCall,
        target: Option<&SqlExpr>,
        args: &[SqlExpr],
    ) -> Result<Option<SqlExpr>> {
        let HostMethod::Network(method) = call.method else {
            return Ok(None);
        };
        // Helper methods are receiver-less; a receiver means a host surface
        // this translator does not know.
        if target.is_some() {
            return Ok(None);
        }
        let ty = call.return_type.clone();

        let operator = match method {
            NetworkMethod::ContainedBy => Some(SqlOperator::ContainedBy),
            NetworkMethod::ContainedByOrEqual => Some(SqlOperator::ContainedByOrEqual),
            NetworkMethod::Contains => Some(SqlOperator::Contains),
            NetworkMethod::ContainsOrEqual => Some(SqlOperator::ContainsOrEqual),
            NetworkMethod::ContainsOrContainedBy => Some(SqlOperator::Overlaps),
            _ => None,
        };
        if let Some(op) = operator {
            let [left, right] = args else {
                return Ok(None);
            };
            return Ok(Some(SqlExpr::binary(left.clone(), op, right.clone(), ty)));
        }

        let (name, arity) = match method {
            NetworkMethod::Abbreviate => ("abbrev", 1),
            NetworkMethod::Broadcast => ("broadcast", 1),
            NetworkMethod::Host => ("host", 1),
            NetworkMethod::MaskLength => ("masklen", 1),
            NetworkMethod::Netmask => ("netmask", 1),
            NetworkMethod::Network => ("network", 1),
            NetworkMethod::SetMaskLength => ("set_masklen", 2),
            NetworkMethod::Text => ("text", 1),
            NetworkMethod::SameFamily => ("inet_same_family", 2),
            NetworkMethod::Merge => ("inet_merge", 2),
            _ => return Ok(None),
        };
        if args.len() != arity {
            return Ok(None);
        }
        Ok(Some(SqlExpr::function(name, args.to_vec(), ty)))
    }
}
