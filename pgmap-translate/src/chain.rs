//! The translator chain: recursive lowering of host expression nodes.
//!
//! Leaves lower directly — constants through the mapping registry's literal
//! generation, columns and parameters structurally. Calls and member
//! accesses translate their operands first, then are offered to each
//! capability translator in order until one claims the node. A node no
//! translator claims surfaces as `Ok(None)`; the host decides whether that
//! is an unsupported-query error.

use std::sync::Arc;

use pgmap_expr::expr::{HostCall, HostExpr, HostMemberAccess};
use pgmap_expr::sql::SqlExpr;
use pgmap_mapping::{ResolveRequest, TypeMappingRegistry};
use pgmap_result::Result;

use crate::fulltext::FullTextTranslator;
use crate::network::NetworkTranslator;
use crate::temporal::TemporalTranslator;

/// One capability domain's translation rules.
///
/// Operands arrive already translated; the original node is passed alongside
/// for identity dispatch and constant-argument inspection. `Ok(None)` means
/// "not mine, try the next translator" and is never an error.
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    fn translate_call(
        &self,
        call: &HostCall,
        target: Option<&SqlExpr>,
        args: &[SqlExpr],
    ) -> Result<Option<SqlExpr>>;

    fn translate_member(
        &self,
        _member: &HostMemberAccess,
        _target: &SqlExpr,
    ) -> Result<Option<SqlExpr>> {
        Ok(None)
    }
}

/// Ordered chain of capability translators over a shared mapping registry.
pub struct TranslatorChain {
    registry: Arc<TypeMappingRegistry>,
    translators: Vec<Box<dyn Translator>>,
}

impl TranslatorChain {
    pub fn new(registry: Arc<TypeMappingRegistry>, translators: Vec<Box<dyn Translator>>) -> Self {
        Self {
            registry,
            translators,
        }
    }

    /// Chain wired with the built-in capability translators.
    pub fn with_defaults(registry: Arc<TypeMappingRegistry>) -> Self {
        Self::new(
            registry,
            vec![
                Box::new(TemporalTranslator),
                Box::new(FullTextTranslator),
                Box::new(NetworkTranslator),
            ],
        )
    }

    pub fn registry(&self) -> &Arc<TypeMappingRegistry> {
        &self.registry
    }

    /// Translate a host expression to a store fragment.
    ///
    /// `Ok(None)` means some part of the tree had no mapping or no
    /// applicable translator; errors are reserved for structurally invalid
    /// usage (a non-constant argument where a constant is required, a value
    /// shape the mapping cannot render).
    pub fn translate(&self, node: &HostExpr) -> Result<Option<SqlExpr>> {
        match node {
            HostExpr::Constant { value, ty } => {
                let Some(mapping) = self
                    .registry
                    .resolve(&ResolveRequest::by_host_type(ty.clone()))
                else {
                    tracing::debug!(host_type = %ty, "constant has no type mapping");
                    return Ok(None);
                };
                let sql = mapping.generate_literal(value)?;
                Ok(Some(SqlExpr::literal(sql, ty.clone())))
            }
            HostExpr::Column { name, ty } => Ok(Some(SqlExpr::Column {
                name: name.clone(),
                ty: ty.clone(),
            })),
            HostExpr::Parameter { name, ty } => Ok(Some(SqlExpr::Parameter {
                name: name.clone(),
                ty: ty.clone(),
            })),
            HostExpr::Call(call) => self.translate_call(call),
            HostExpr::Member(member) => self.translate_member(member),
        }
    }

    fn translate_call(&self, call: &HostCall) -> Result<Option<SqlExpr>> {
        let target = match call.target.as_deref() {
            Some(t) => match self.translate(t)? {
                Some(sql) => Some(sql),
                None => return Ok(None),
            },
            None => None,
        };
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            match self.translate(arg)? {
                Some(sql) => args.push(sql),
                None => return Ok(None),
            }
        }
        for translator in &self.translators {
            if let Some(sql) = translator.translate_call(call, target.as_ref(), &args)? {
                tracing::debug!(translator = translator.name(), "call translated");
                return Ok(Some(sql));
            }
        }
        Ok(None)
    }

    fn translate_member(&self, member: &HostMemberAccess) -> Result<Option<SqlExpr>> {
        let Some(target) = self.translate(&member.target)? else {
            return Ok(None);
        };
        for translator in &self.translators {
            if let Some(sql) = translator.translate_member(member, &target)? {
                tracing::debug!(translator = translator.name(), "member translated");
                return Ok(Some(sql));
            }
        }
        Ok(None)
    }
}
