//! Full-text search translation.
//!
//! Constructors and matches are direct function/operator lowerings. The
//! ranking and headline functions need argument reordering: the store puts
//! the weight array (ranking) and the search configuration (headline) before
//! the document, while the host call supplies them after the receiver. The
//! reordering is a fixed table over the 2-4 supported overload arities, not
//! a general algorithm.

use pgmap_expr::expr::{FullTextMethod, HostCall, HostMethod};
use pgmap_expr::sql::{SqlExpr, SqlOperator};
use pgmap_result::{Error, Result};
use pgmap_types::{HostType, Value};

use crate::chain::Translator;

pub struct FullTextTranslator;

impl Translator for FullTextTranslator {
    fn name(&self) -> &str {
        "fulltext"
    }

    fn translate_call(
        &self,
        call: &HostCall,
        target: Option<&SqlExpr>,
        args: &[SqlExpr],
    ) -> Result<Option<SqlExpr>> {
        let HostMethod::FullText(method) = call.method else {
            return Ok(None);
        };
        let ty = call.return_type.clone();
        let translated = match method {
            FullTextMethod::ToTsVector => constructor("to_tsvector", args, ty),
            FullTextMethod::ToTsQuery => constructor("to_tsquery", args, ty),
            FullTextMethod::PlainToTsQuery => constructor("plainto_tsquery", args, ty),
            FullTextMethod::PhraseToTsQuery => constructor("phraseto_tsquery", args, ty),
            FullTextMethod::WebSearchToTsQuery => {
                constructor("websearch_to_tsquery", args, ty)
            }
            FullTextMethod::Matches => {
                let (Some(vector), [query]) = (target, args) else {
                    return Ok(None);
                };
                // A plain-text needle is parsed at the store, not client-side.
                let query = match query.ty() {
                    HostType::Text => SqlExpr::function(
                        "plainto_tsquery",
                        vec![query.clone()],
                        HostType::TsQuery,
                    ),
                    _ => query.clone(),
                };
                Some(SqlExpr::binary(
                    vector.clone(),
                    SqlOperator::TsMatch,
                    query,
                    ty,
                ))
            }
            FullTextMethod::Concat => {
                let (Some(left), [right]) = (target, args) else {
                    return Ok(None);
                };
                Some(SqlExpr::binary(
                    left.clone(),
                    SqlOperator::Concat,
                    right.clone(),
                    ty,
                ))
            }
            FullTextMethod::Rank => rank("ts_rank", target, args, ty),
            FullTextMethod::RankCoverDensity => rank("ts_rank_cd", target, args, ty),
            FullTextMethod::Headline => headline(target, args, ty),
            FullTextMethod::SetWeight => return set_weight(call, target, ty).map(Some),
        };
        Ok(translated)
    }
}

fn constructor(name: &str, args: &[SqlExpr], ty: HostType) -> Option<SqlExpr> {
    // Arity 1 uses the default configuration; arity 2 names one explicitly.
    // The configuration must be a rendered constant or a column — a computed
    // configuration is a shape this translator does not claim.
    match args {
        [_] => Some(SqlExpr::function(name, args.to_vec(), ty)),
        [config, _]
            if matches!(config, SqlExpr::Literal { .. } | SqlExpr::Column { .. }) =>
        {
            Some(SqlExpr::function(name, args.to_vec(), ty))
        }
        _ => None,
    }
}

/// Overload table for `ts_rank`/`ts_rank_cd`. The receiver is the vector;
/// when a weight array is supplied the store wants it in front of the
/// vector, so overloads are keyed by arity plus whether the first argument
/// is the weight container.
fn rank(name: &str, target: Option<&SqlExpr>, args: &[SqlExpr], ty: HostType) -> Option<SqlExpr> {
    let vector = target?;
    let reordered: Vec<SqlExpr> = match args {
        // (query)
        [query] => vec![vector.clone(), query.clone()],
        // (weights, query)
        [weights, query] if weights.ty().is_container() => {
            vec![weights.clone(), vector.clone(), query.clone()]
        }
        // (query, normalization)
        [query, normalization] => {
            vec![vector.clone(), query.clone(), normalization.clone()]
        }
        // (weights, query, normalization)
        [weights, query, normalization] if weights.ty().is_container() => vec![
            weights.clone(),
            vector.clone(),
            query.clone(),
            normalization.clone(),
        ],
        _ => return None,
    };
    Some(SqlExpr::function(name, reordered, ty))
}

/// Overload table for `ts_headline`. The receiver is the query; the store
/// wants the document first and, for the configured overload, the
/// configuration in front of the document.
fn headline(target: Option<&SqlExpr>, args: &[SqlExpr], ty: HostType) -> Option<SqlExpr> {
    let query = target?;
    let reordered: Vec<SqlExpr> = match args {
        // (document)
        [document] => vec![document.clone(), query.clone()],
        // (document, options)
        [document, options] => vec![document.clone(), query.clone(), options.clone()],
        // (config, document, options)
        [config, document, options] => vec![
            config.clone(),
            document.clone(),
            query.clone(),
            options.clone(),
        ],
        _ => return None,
    };
    Some(SqlExpr::function("ts_headline", reordered, ty))
}

/// `setweight` requires a compile-time-constant weight label: the store
/// accepts only `'A'`-`'D'`, and a runtime-computed label would defeat the
/// translation entirely. Dynamic usage fails fast.
fn set_weight(call: &HostCall, target: Option<&SqlExpr>, ty: HostType) -> Result<SqlExpr> {
    let vector = target.ok_or_else(|| {
        Error::configuration("setweight requires a vector receiver")
    })?;
    let label = match call.args.first().and_then(|arg| arg.as_constant()) {
        Some(Value::Text(s)) if matches!(s.as_str(), "A" | "B" | "C" | "D") => s.clone(),
        Some(Value::Text(s)) => {
            return Err(Error::configuration(format!(
                "setweight label must be one of 'A'-'D', got '{s}'"
            )));
        }
        Some(other) => {
            return Err(Error::configuration(format!(
                "setweight label must be a character constant, got {}",
                other.type_name()
            )));
        }
        None => {
            return Err(Error::configuration(
                "setweight label must be a compile-time constant",
            ));
        }
    };
    Ok(SqlExpr::function(
        "setweight",
        vec![
            vector.clone(),
            SqlExpr::literal(format!("'{label}'"), HostType::Char),
        ],
        ty,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgmap_expr::expr::HostExpr;

    fn vector() -> SqlExpr {
        SqlExpr::Column {
            name: "doc".into(),
            ty: HostType::TsVector,
        }
    }

    fn query() -> SqlExpr {
        SqlExpr::literal("'fat & rat'::tsquery", HostType::TsQuery)
    }

    fn weights() -> SqlExpr {
        SqlExpr::literal(
            "ARRAY[0.1,0.2,0.4,1.0]",
            HostType::list_of(HostType::Float32, false),
        )
    }

    fn rank_call(args: Vec<HostExpr>) -> HostCall {
        HostCall {
            method: HostMethod::FullText(FullTextMethod::Rank),
            target: Some(Box::new(HostExpr::column("doc", HostType::TsVector))),
            args,
            return_type: HostType::Float32,
        }
    }

    fn translate_rank(args: &[SqlExpr]) -> String {
        FullTextTranslator
            .translate_call(&rank_call(vec![]), Some(&vector()), args)
            .unwrap()
            .unwrap()
            .to_sql()
    }

    #[test]
    fn rank_overloads_reorder_weights_to_the_front() {
        assert_eq!(
            translate_rank(&[query()]),
            "ts_rank(\"doc\", 'fat & rat'::tsquery)"
        );
        assert_eq!(
            translate_rank(&[query(), SqlExpr::literal("32", HostType::Int32)]),
            "ts_rank(\"doc\", 'fat & rat'::tsquery, 32)"
        );
        assert_eq!(
            translate_rank(&[weights(), query()]),
            "ts_rank(ARRAY[0.1,0.2,0.4,1.0], \"doc\", 'fat & rat'::tsquery)"
        );
        assert_eq!(
            translate_rank(&[
                weights(),
                query(),
                SqlExpr::literal("4", HostType::Int32)
            ]),
            "ts_rank(ARRAY[0.1,0.2,0.4,1.0], \"doc\", 'fat & rat'::tsquery, 4)"
        );
    }

    #[test]
    fn headline_puts_document_before_query_and_config_first() {
        let call = HostCall {
            method: HostMethod::FullText(FullTextMethod::Headline),
            target: Some(Box::new(HostExpr::column("q", HostType::TsQuery))),
            args: vec![],
            return_type: HostType::Text,
        };
        let q = SqlExpr::Column {
            name: "q".into(),
            ty: HostType::TsQuery,
        };
        let document = SqlExpr::Column {
            name: "body".into(),
            ty: HostType::Text,
        };
        let options = SqlExpr::literal("'MaxWords=5'", HostType::Text);
        let config = SqlExpr::literal("'english'", HostType::Text);

        let render = |args: &[SqlExpr]| {
            FullTextTranslator
                .translate_call(&call, Some(&q), args)
                .unwrap()
                .unwrap()
                .to_sql()
        };
        assert_eq!(render(&[document.clone()]), "ts_headline(\"body\", \"q\")");
        assert_eq!(
            render(&[document.clone(), options.clone()]),
            "ts_headline(\"body\", \"q\", 'MaxWords=5')"
        );
        assert_eq!(
            render(&[config, document, options]),
            "ts_headline('english', \"body\", \"q\", 'MaxWords=5')"
        );
    }

    #[test]
    fn matches_wraps_plain_text_needles() {
        let call = HostCall {
            method: HostMethod::FullText(FullTextMethod::Matches),
            target: Some(Box::new(HostExpr::column("doc", HostType::TsVector))),
            args: vec![],
            return_type: HostType::Bool,
        };
        let needle = SqlExpr::literal("'fat rats'", HostType::Text);
        let sql = FullTextTranslator
            .translate_call(&call, Some(&vector()), &[needle])
            .unwrap()
            .unwrap();
        assert_eq!(sql.to_sql(), "(\"doc\" @@ plainto_tsquery('fat rats'))");

        let typed = FullTextTranslator
            .translate_call(&call, Some(&vector()), &[query()])
            .unwrap()
            .unwrap();
        assert_eq!(typed.to_sql(), "(\"doc\" @@ 'fat & rat'::tsquery)");
    }

    #[test]
    fn setweight_requires_a_constant_label() {
        let constant = HostCall {
            method: HostMethod::FullText(FullTextMethod::SetWeight),
            target: Some(Box::new(HostExpr::column("doc", HostType::TsVector))),
            args: vec![HostExpr::constant("A", HostType::Char)],
            return_type: HostType::TsVector,
        };
        let label = SqlExpr::literal("'A'", HostType::Char);
        let sql = FullTextTranslator
            .translate_call(&constant, Some(&vector()), &[label.clone()])
            .unwrap()
            .unwrap();
        assert_eq!(sql.to_sql(), "setweight(\"doc\", 'A')");

        let dynamic = HostCall {
            args: vec![HostExpr::column("w", HostType::Char)],
            ..constant.clone()
        };
        assert!(matches!(
            FullTextTranslator.translate_call(&dynamic, Some(&vector()), &[label.clone()]),
            Err(Error::Configuration(_))
        ));

        let bad_label = HostCall {
            args: vec![HostExpr::constant("Z", HostType::Char)],
            ..constant
        };
        assert!(matches!(
            FullTextTranslator.translate_call(&bad_label, Some(&vector()), &[label]),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn constructor_config_must_be_a_constant_or_column() {
        let call = HostCall {
            method: HostMethod::FullText(FullTextMethod::ToTsVector),
            target: None,
            args: vec![],
            return_type: HostType::TsVector,
        };
        let body = SqlExpr::Column {
            name: "body".into(),
            ty: HostType::Text,
        };
        let config = SqlExpr::literal("'english'", HostType::Text);
        let computed = SqlExpr::function("lower", vec![config.clone()], HostType::Text);

        let render = |args: &[SqlExpr]| {
            FullTextTranslator
                .translate_call(&call, None, args)
                .unwrap()
                .map(|sql| sql.to_sql())
        };
        assert_eq!(
            render(&[config, body.clone()]),
            Some("to_tsvector('english', \"body\")".into())
        );
        // A computed configuration is deferred, never claimed.
        assert_eq!(render(&[computed, body]), None);
    }

    #[test]
    fn other_capability_calls_are_not_claimed() {
        let call = HostCall {
            method: HostMethod::Temporal(pgmap_expr::expr::TemporalMethod::UtcNow),
            target: None,
            args: vec![],
            return_type: HostType::TimestampTz,
        };
        assert!(FullTextTranslator
            .translate_call(&call, None, &[])
            .unwrap()
            .is_none());
    }
}
