//! Store-side expression form produced by translation.
//!
//! A `SqlExpr` is a dialect-correct fragment: function calls, operator
//! applications, literals already rendered by their type mapping, and the
//! small set of syntactic forms (CASE, CAST, AT TIME ZONE) the translators
//! need. Rendering is deterministic and fully parenthesized so fragments
//! compose without precedence surprises.

use pgmap_types::HostType;

/// A translated store-side expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
    /// A literal already rendered to store syntax by its type mapping.
    Literal { sql: String, ty: HostType },
    /// Column reference.
    Column { name: String, ty: HostType },
    /// Positional or named bind parameter.
    Parameter { name: String, ty: HostType },
    /// Function call.
    Function {
        name: String,
        args: Vec<SqlExpr>,
        ty: HostType,
    },
    /// Binary operator application.
    Binary {
        left: Box<SqlExpr>,
        op: SqlOperator,
        right: Box<SqlExpr>,
        ty: HostType,
    },
    /// Searched CASE expression.
    Case {
        when_then: Vec<(SqlExpr, SqlExpr)>,
        else_expr: Option<Box<SqlExpr>>,
        ty: HostType,
    },
    /// CAST to a named store type.
    Cast {
        expr: Box<SqlExpr>,
        store_type: String,
        ty: HostType,
    },
    /// Time-zone conversion.
    AtTimeZone {
        expr: Box<SqlExpr>,
        zone: String,
        ty: HostType,
    },
}

/// Dialect operator tokens emitted by the translators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOperator {
    /// `=`
    Equal,
    /// `%`
    Modulo,
    /// `@@` full-text match.
    TsMatch,
    /// `||` concatenation.
    Concat,
    /// `<<` strictly contained by.
    ContainedBy,
    /// `<<=` contained by or equal.
    ContainedByOrEqual,
    /// `>>` strictly contains.
    Contains,
    /// `>>=` contains or equal.
    ContainsOrEqual,
    /// `&&` contains or is contained by.
    Overlaps,
}

impl SqlOperator {
    pub fn token(self) -> &'static str {
        match self {
            SqlOperator::Equal => "=",
            SqlOperator::Modulo => "%",
            SqlOperator::TsMatch => "@@",
            SqlOperator::Concat => "||",
            SqlOperator::ContainedBy => "<<",
            SqlOperator::ContainedByOrEqual => "<<=",
            SqlOperator::Contains => ">>",
            SqlOperator::ContainsOrEqual => ">>=",
            SqlOperator::Overlaps => "&&",
        }
    }
}

impl SqlExpr {
    pub fn literal(sql: impl Into<String>, ty: HostType) -> SqlExpr {
        SqlExpr::Literal {
            sql: sql.into(),
            ty,
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<SqlExpr>, ty: HostType) -> SqlExpr {
        SqlExpr::Function {
            name: name.into(),
            args,
            ty,
        }
    }

    pub fn binary(left: SqlExpr, op: SqlOperator, right: SqlExpr, ty: HostType) -> SqlExpr {
        SqlExpr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            ty,
        }
    }

    pub fn cast(expr: SqlExpr, store_type: impl Into<String>, ty: HostType) -> SqlExpr {
        SqlExpr::Cast {
            expr: Box::new(expr),
            store_type: store_type.into(),
            ty,
        }
    }

    /// Declared result type of the fragment.
    pub fn ty(&self) -> &HostType {
        match self {
            SqlExpr::Literal { ty, .. }
            | SqlExpr::Column { ty, .. }
            | SqlExpr::Parameter { ty, .. }
            | SqlExpr::Function { ty, .. }
            | SqlExpr::Binary { ty, .. }
            | SqlExpr::Case { ty, .. }
            | SqlExpr::Cast { ty, .. }
            | SqlExpr::AtTimeZone { ty, .. } => ty,
        }
    }

    /// Render the fragment to store syntax.
    pub fn to_sql(&self) -> String {
        match self {
            SqlExpr::Literal { sql, .. } => sql.clone(),
            SqlExpr::Column { name, .. } => quote_identifier(name),
            SqlExpr::Parameter { name, .. } => format!("${name}"),
            SqlExpr::Function { name, args, .. } => {
                let rendered: Vec<_> = args.iter().map(|a| a.to_sql()).collect();
                format!("{}({})", name, rendered.join(", "))
            }
            SqlExpr::Binary {
                left, op, right, ..
            } => format!("({} {} {})", left.to_sql(), op.token(), right.to_sql()),
            SqlExpr::Case {
                when_then,
                else_expr,
                ..
            } => {
                let mut out = String::from("CASE");
                for (when, then) in when_then {
                    out.push_str(&format!(" WHEN {} THEN {}", when.to_sql(), then.to_sql()));
                }
                if let Some(else_expr) = else_expr {
                    out.push_str(&format!(" ELSE {}", else_expr.to_sql()));
                }
                out.push_str(" END");
                out
            }
            SqlExpr::Cast {
                expr, store_type, ..
            } => format!("CAST({} AS {})", expr.to_sql(), store_type),
            SqlExpr::AtTimeZone { expr, zone, .. } => {
                format!("({} AT TIME ZONE '{}')", expr.to_sql(), zone)
            }
        }
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_rendering_joins_arguments() {
        let expr = SqlExpr::function(
            "date_part",
            vec![
                SqlExpr::literal("'year'", HostType::Text),
                SqlExpr::Column {
                    name: "created_at".into(),
                    ty: HostType::Timestamp,
                },
            ],
            HostType::Float64,
        );
        assert_eq!(expr.to_sql(), "date_part('year', \"created_at\")");
    }

    #[test]
    fn binary_rendering_is_parenthesized() {
        let expr = SqlExpr::binary(
            SqlExpr::Column {
                name: "doc".into(),
                ty: HostType::TsVector,
            },
            SqlOperator::TsMatch,
            SqlExpr::literal("'fat & rat'::tsquery", HostType::TsQuery),
            HostType::Bool,
        );
        assert_eq!(expr.to_sql(), "(\"doc\" @@ 'fat & rat'::tsquery)");
    }

    #[test]
    fn case_and_cast_render_store_syntax() {
        let dp = SqlExpr::function("date_part", vec![], HostType::Float64);
        let expr = SqlExpr::cast(
            SqlExpr::Case {
                when_then: vec![(
                    SqlExpr::binary(
                        dp.clone(),
                        SqlOperator::Equal,
                        SqlExpr::literal("0", HostType::Int32),
                        HostType::Bool,
                    ),
                    SqlExpr::literal("7", HostType::Int32),
                )],
                else_expr: Some(Box::new(dp)),
                ty: HostType::Float64,
            },
            "integer",
            HostType::Int32,
        );
        assert_eq!(
            expr.to_sql(),
            "CAST(CASE WHEN (date_part() = 0) THEN 7 ELSE date_part() END AS integer)"
        );
    }

    #[test]
    fn identifiers_with_quotes_are_escaped() {
        let expr = SqlExpr::Column {
            name: "odd\"name".into(),
            ty: HostType::Text,
        };
        assert_eq!(expr.to_sql(), "\"odd\"\"name\"");
    }
}
