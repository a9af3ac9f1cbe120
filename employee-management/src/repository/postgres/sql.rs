//! Rendering of typed query objects into parameterised SQL
//!
//! Column names come from each entity's static field table; every value is
//! bound as a parameter. Results mirror the in-memory evaluation of the same
//! [`Filter`]: text ordering ignores case, NULL sorts first when ascending and
//! ties fall back to `created_at` then `id`.

use sqlx::{
    postgres::PgArguments,
    query::Query,
    Postgres, QueryBuilder,
};

use crate::repository::{
    Entity, FieldDef, FieldKind, Filter, FilterCondition, FilterOperator, FilterValue,
    OrderDirection, PageRequest, RepositoryError, RepositoryOperation, RepositoryResult,
};

/// Append ` WHERE …` for `filter`; nothing when the filter is empty
pub(crate) fn push_filter<E: Entity>(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &Filter,
    operation: RepositoryOperation,
) -> RepositoryResult<()> {
    filter.validate::<E>(operation)?;

    for (index, condition) in filter.conditions().iter().enumerate() {
        qb.push(if index == 0 { " WHERE " } else { " AND " });
        let def = E::field(&condition.field).ok_or_else(|| {
            RepositoryError::validation_failed(
                operation,
                format!("Unknown filter field: {}", condition.field),
            )
            .for_entity(E::ENTITY_NAME)
        })?;
        push_condition(qb, def, condition, operation)?;
    }
    Ok(())
}

fn push_condition(
    qb: &mut QueryBuilder<'_, Postgres>,
    def: &FieldDef,
    condition: &FilterCondition,
    operation: RepositoryOperation,
) -> RepositoryResult<()> {
    let column = def.column;
    let value = &condition.value;

    match condition.operator {
        FilterOperator::IsNull => {
            qb.push(column).push(" IS NULL");
        }
        FilterOperator::IsNotNull => {
            qb.push(column).push(" IS NOT NULL");
        }
        FilterOperator::Contains => {
            let FilterValue::String(needle) = value else {
                return Err(RepositoryError::validation_failed(
                    operation,
                    format!("Contains on {} requires a text value", condition.field),
                ));
            };
            qb.push(column).push(" ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(needle)));
        }
        FilterOperator::In => match value {
            FilterValue::StringList(values) => {
                qb.push(column).push(" = ANY(");
                qb.push_bind(values.clone());
                qb.push(")");
            }
            FilterValue::IntegerList(values) => {
                qb.push(column).push(" = ANY(");
                qb.push_bind(values.clone());
                qb.push(")");
            }
            _ => {
                return Err(RepositoryError::validation_failed(
                    operation,
                    format!("In on {} requires a list value", condition.field),
                ))
            }
        },
        FilterOperator::Equal if value.is_null() => {
            qb.push(column).push(" IS NULL");
        }
        FilterOperator::NotEqual if value.is_null() => {
            qb.push(column).push(" IS NOT NULL");
        }
        // every non-null value ranks above NULL
        FilterOperator::GreaterThan | FilterOperator::GreaterThanOrEqual if value.is_null() => {
            qb.push(column).push(" IS NOT NULL");
        }
        FilterOperator::LessThan | FilterOperator::LessThanOrEqual if value.is_null() => {
            qb.push("FALSE");
        }
        FilterOperator::NotEqual => {
            qb.push(column).push(" IS DISTINCT FROM ");
            push_value(qb, value);
        }
        operator => {
            qb.push(column).push(" ").push(operator.to_string()).push(" ");
            push_value(qb, value);
        }
    }
    Ok(())
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::String(v) => {
            qb.push_bind(v.clone());
        }
        FilterValue::Integer(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Float(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Boolean(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Uuid(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Date(v) => {
            qb.push_bind(*v);
        }
        FilterValue::DateTime(v) => {
            qb.push_bind(*v);
        }
        FilterValue::StringList(v) => {
            qb.push_bind(v.clone());
        }
        FilterValue::IntegerList(v) => {
            qb.push_bind(v.clone());
        }
        FilterValue::Null => {
            qb.push("NULL");
        }
    }
}

/// Append ` ORDER BY …` with the deterministic tie-breakers
pub(crate) fn push_order<E: Entity>(
    qb: &mut QueryBuilder<'_, Postgres>,
    page: &PageRequest,
) -> RepositoryResult<()> {
    qb.push(" ORDER BY ");
    if let Some(sort) = &page.sort {
        let def = E::sort_field(sort)?;
        if def.kind == FieldKind::Text {
            qb.push("LOWER(").push(def.column).push(")");
        } else {
            qb.push(def.column);
        }
        qb.push(match sort.direction {
            OrderDirection::Ascending => " ASC NULLS FIRST, ",
            OrderDirection::Descending => " DESC NULLS LAST, ",
        });
    }
    qb.push("created_at ASC, id ASC");
    Ok(())
}

/// Append ` LIMIT … OFFSET …` for the normalized page
pub(crate) fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: &PageRequest) {
    let window = page.pagination();
    qb.push(" LIMIT ");
    qb.push_bind(i64::try_from(window.limit).unwrap_or(i64::MAX));
    qb.push(" OFFSET ");
    qb.push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));
}

/// Bind positional parameters of a raw statement
pub(crate) fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[FilterValue],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param.clone() {
            FilterValue::String(v) => query.bind(v),
            FilterValue::Integer(v) => query.bind(v),
            FilterValue::Float(v) => query.bind(v),
            FilterValue::Boolean(v) => query.bind(v),
            FilterValue::Uuid(v) => query.bind(v),
            FilterValue::Date(v) => query.bind(v),
            FilterValue::DateTime(v) => query.bind(v),
            FilterValue::StringList(v) => query.bind(v),
            FilterValue::IntegerList(v) => query.bind(v),
            FilterValue::Null => query.bind(None::<String>),
        };
    }
    query
}

/// Reject empty raw statements before they reach the server
pub(crate) fn ensure_statement(sql: &str) -> RepositoryResult<()> {
    if sql.trim().is_empty() {
        return Err(RepositoryError::validation_failed(
            RepositoryOperation::ExecuteRaw,
            "SQL statement must not be empty",
        ));
    }
    Ok(())
}

/// Escape `%`, `_` and `\` for use inside an ILIKE pattern
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
