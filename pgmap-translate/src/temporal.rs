//! Date/time member and method translation.
//!
//! Component extraction goes through `date_part`, which returns a double:
//! integral components cast straight to integer, while components carrying a
//! sub-unit remainder (seconds, milliseconds) are floored first so the host
//! member's discrete semantics hold. Day-of-week needs a conditional rewrite
//! because the store numbers that day 0 where the host numbers it 7 — a
//! plain offset would shift the other six days too.

use pgmap_expr::expr::{
    HostCall, HostMemberAccess, HostMethod, TemporalMember, TemporalMethod,
};
use pgmap_expr::sql::{SqlExpr, SqlOperator};
use pgmap_result::Result;
use pgmap_types::HostType;

use crate::chain::Translator;

pub struct TemporalTranslator;

impl Translator for TemporalTranslator {
    fn name(&self) -> &str {
        "temporal"
    }

    fn translate_call(
        &self,
        call: &HostCall,
        _target: Option<&SqlExpr>,
        _args: &[SqlExpr],
    ) -> Result<Option<SqlExpr>> {
        let HostMethod::Temporal(method) = call.method else {
            return Ok(None);
        };
        let ty = call.return_type.clone();
        let now = SqlExpr::function("now", vec![], HostType::TimestampTz);
        let translated = match method {
            TemporalMethod::LocalNow => now,
            TemporalMethod::UtcNow => SqlExpr::AtTimeZone {
                expr: Box::new(now),
                zone: "UTC".to_string(),
                ty: ty.clone(),
            },
            TemporalMethod::Today => SqlExpr::function(
                "date_trunc",
                vec![SqlExpr::literal("'day'", HostType::Text), now],
                ty.clone(),
            ),
        };
        Ok(Some(translated))
    }

    fn translate_member(
        &self,
        member: &HostMemberAccess,
        target: &SqlExpr,
    ) -> Result<Option<SqlExpr>> {
        let pgmap_expr::expr::HostMember::Temporal(temporal) = member.member;
        let ty = member.ty.clone();
        let translated = match temporal {
            TemporalMember::Year => extract_integral("year", target, ty),
            TemporalMember::Month => extract_integral("month", target, ty),
            TemporalMember::Day => extract_integral("day", target, ty),
            TemporalMember::Hour => extract_integral("hour", target, ty),
            TemporalMember::Minute => extract_integral("minute", target, ty),
            TemporalMember::DayOfYear => extract_integral("doy", target, ty),
            TemporalMember::Second => extract_floored("second", target, ty),
            TemporalMember::Millisecond => {
                // date_part('millisecond') includes whole seconds.
                SqlExpr::binary(
                    extract_floored("millisecond", target, ty.clone()),
                    SqlOperator::Modulo,
                    SqlExpr::literal("1000", HostType::Int32),
                    ty,
                )
            }
            TemporalMember::DayOfWeek => {
                let extraction = extract_floored("dow", target, ty.clone());
                SqlExpr::Case {
                    when_then: vec![(
                        SqlExpr::binary(
                            extraction.clone(),
                            SqlOperator::Equal,
                            SqlExpr::literal("0", HostType::Int32),
                            HostType::Bool,
                        ),
                        SqlExpr::literal("7", HostType::Int32),
                    )],
                    else_expr: Some(Box::new(extraction)),
                    ty,
                }
            }
            TemporalMember::Date => SqlExpr::cast(target.clone(), "date", ty),
            TemporalMember::TimeOfDay => SqlExpr::cast(target.clone(), "time", ty),
        };
        Ok(Some(translated))
    }
}

fn date_part(part: &str, target: &SqlExpr) -> SqlExpr {
    SqlExpr::function(
        "date_part",
        vec![
            SqlExpr::literal(format!("'{part}'"), HostType::Text),
            target.clone(),
        ],
        HostType::Float64,
    )
}

fn extract_integral(part: &str, target: &SqlExpr, ty: HostType) -> SqlExpr {
    SqlExpr::cast(date_part(part, target), "integer", ty)
}

fn extract_floored(part: &str, target: &SqlExpr, ty: HostType) -> SqlExpr {
    SqlExpr::cast(
        SqlExpr::function("floor", vec![date_part(part, target)], HostType::Float64),
        "integer",
        ty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgmap_expr::expr::HostMember;

    fn member(temporal: TemporalMember, ty: HostType) -> HostMemberAccess {
        HostMemberAccess {
            member: HostMember::Temporal(temporal),
            target: Box::new(pgmap_expr::expr::HostExpr::column(
                "created_at",
                HostType::Timestamp,
            )),
            ty,
        }
    }

    fn column() -> SqlExpr {
        SqlExpr::Column {
            name: "created_at".into(),
            ty: HostType::Timestamp,
        }
    }

    fn render(temporal: TemporalMember, ty: HostType) -> String {
        TemporalTranslator
            .translate_member(&member(temporal, ty), &column())
            .unwrap()
            .unwrap()
            .to_sql()
    }

    #[test]
    fn integral_components_cast_without_floor() {
        assert_eq!(
            render(TemporalMember::Year, HostType::Int32),
            "CAST(date_part('year', \"created_at\") AS integer)"
        );
        assert_eq!(
            render(TemporalMember::DayOfYear, HostType::Int32),
            "CAST(date_part('doy', \"created_at\") AS integer)"
        );
    }

    #[test]
    fn seconds_are_floored_before_the_cast() {
        assert_eq!(
            render(TemporalMember::Second, HostType::Int32),
            "CAST(floor(date_part('second', \"created_at\")) AS integer)"
        );
    }

    #[test]
    fn milliseconds_drop_the_whole_second_part() {
        assert_eq!(
            render(TemporalMember::Millisecond, HostType::Int32),
            "(CAST(floor(date_part('millisecond', \"created_at\")) AS integer) % 1000)"
        );
    }

    #[test]
    fn day_of_week_rewrites_zero_to_seven_conditionally() {
        let sql = render(TemporalMember::DayOfWeek, HostType::Int32);
        assert_eq!(
            sql,
            "CASE WHEN (CAST(floor(date_part('dow', \"created_at\")) AS integer) = 0) \
             THEN 7 \
             ELSE CAST(floor(date_part('dow', \"created_at\")) AS integer) END"
        );
    }

    #[test]
    fn date_and_time_of_day_are_plain_casts() {
        assert_eq!(
            render(TemporalMember::Date, HostType::Date),
            "CAST(\"created_at\" AS date)"
        );
        assert_eq!(
            render(TemporalMember::TimeOfDay, HostType::Time),
            "CAST(\"created_at\" AS time)"
        );
    }

    #[test]
    fn current_time_methods_lower_to_now_variants() {
        let call = |method| HostCall {
            method: HostMethod::Temporal(method),
            target: None,
            args: vec![],
            return_type: HostType::TimestampTz,
        };
        let render = |method| {
            TemporalTranslator
                .translate_call(&call(method), None, &[])
                .unwrap()
                .unwrap()
                .to_sql()
        };
        assert_eq!(render(TemporalMethod::LocalNow), "now()");
        assert_eq!(render(TemporalMethod::UtcNow), "(now() AT TIME ZONE 'UTC')");
        assert_eq!(render(TemporalMethod::Today), "date_trunc('day', now())");
    }
}
