//! SQL fragment rendering
//!
//! Turns filters, ordering, projections and grouping into PostgreSQL text with
//! `$n` placeholders. Parameter values are returned in placeholder order.

use crate::query_builder::aggregation::SelectField;
use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::grouping::GroupBy;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::value::SqlValue;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build WHERE clause from conditions, numbering parameters from `$1`
    pub fn build_where_clause(conditions: &[QueryFilter]) -> (String, Vec<SqlValue>) {
        let (parts, values) = Self::build_conditions(conditions, 1);
        if parts.is_empty() {
            (String::new(), values)
        } else {
            (format!("WHERE {}", parts.join(" AND ")), values)
        }
    }

    /// Render each top-level filter separately, numbering from `first_param`
    pub fn build_conditions(
        conditions: &[QueryFilter],
        first_param: usize,
    ) -> (Vec<String>, Vec<SqlValue>) {
        let mut values = Vec::new();
        let mut param_counter = first_param;

        let parts = conditions
            .iter()
            .map(|condition| Self::build_condition_sql(condition, &mut values, &mut param_counter))
            .filter(|sql| !sql.is_empty())
            .collect();

        (parts, values)
    }

    fn build_condition_sql(
        filter: &QueryFilter,
        values: &mut Vec<SqlValue>,
        param_counter: &mut usize,
    ) -> String {
        match filter {
            QueryFilter::Condition(condition) => {
                Self::build_single_condition_sql(condition, values, param_counter)
            }
            QueryFilter::Group { operator, filters } => {
                let operator_str = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };

                let group_conditions = filters
                    .iter()
                    .map(|f| Self::build_condition_sql(f, values, param_counter))
                    .filter(|sql| !sql.is_empty())
                    .collect::<Vec<_>>()
                    .join(operator_str);

                if group_conditions.is_empty() {
                    String::new()
                } else {
                    format!("({})", group_conditions)
                }
            }
            QueryFilter::Expr {
                sql,
                values: expr_values,
            } => {
                let mut rendered = String::with_capacity(sql.len() + 8);
                for ch in sql.chars() {
                    if ch == '?' {
                        rendered.push_str(&Self::next_param(param_counter));
                    } else {
                        rendered.push(ch);
                    }
                }
                values.extend(expr_values.iter().cloned());
                rendered
            }
        }
    }

    fn next_param(param_counter: &mut usize) -> String {
        let param = format!("${}", param_counter);
        *param_counter += 1;
        param
    }

    fn binary_sql(
        condition: &QueryCondition,
        op: &str,
        values: &mut Vec<SqlValue>,
        param_counter: &mut usize,
    ) -> String {
        match condition.values.first() {
            Some(value) => {
                values.push(value.clone());
                format!("{} {} {}", condition.field, op, Self::next_param(param_counter))
            }
            None => "1=0".to_string(),
        }
    }

    fn build_single_condition_sql(
        condition: &QueryCondition,
        values: &mut Vec<SqlValue>,
        param_counter: &mut usize,
    ) -> String {
        let field = &condition.field;

        match &condition.operator {
            QueryOperator::Eq => match condition.values.first() {
                Some(SqlValue::Null) | None => format!("{} IS NULL", field),
                Some(_) => Self::binary_sql(condition, "=", values, param_counter),
            },
            QueryOperator::Ne => match condition.values.first() {
                Some(SqlValue::Null) | None => format!("{} IS NOT NULL", field),
                Some(_) => Self::binary_sql(condition, "!=", values, param_counter),
            },
            QueryOperator::Gt => Self::binary_sql(condition, ">", values, param_counter),
            QueryOperator::Gte => Self::binary_sql(condition, ">=", values, param_counter),
            QueryOperator::Lt => Self::binary_sql(condition, "<", values, param_counter),
            QueryOperator::Lte => Self::binary_sql(condition, "<=", values, param_counter),
            QueryOperator::Like => Self::binary_sql(condition, "LIKE", values, param_counter),
            QueryOperator::ILike => Self::binary_sql(condition, "ILIKE", values, param_counter),
            QueryOperator::In | QueryOperator::NotIn => {
                let negated = condition.operator == QueryOperator::NotIn;
                if condition.values.is_empty() {
                    // IN () matches nothing, NOT IN () matches everything
                    return if negated { "1=1" } else { "1=0" }.to_string();
                }

                let placeholders: Vec<String> = condition
                    .values
                    .iter()
                    .map(|_| Self::next_param(param_counter))
                    .collect();

                values.extend(condition.values.iter().cloned());
                format!(
                    "{} {} ({})",
                    field,
                    if negated { "NOT IN" } else { "IN" },
                    placeholders.join(", ")
                )
            }
            QueryOperator::IsNull => format!("{} IS NULL", field),
            QueryOperator::IsNotNull => format!("{} IS NOT NULL", field),
        }
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> String {
        if order_by.is_empty() {
            return String::new();
        }

        let order_items: Vec<String> = order_by
            .iter()
            .map(|(field, order)| format!("{} {}", field, order.to_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build SELECT list from fields
    pub fn build_select_clause(fields: &[SelectField]) -> String {
        if fields.is_empty() {
            return "*".to_string();
        }

        fields
            .iter()
            .map(SelectField::to_sql)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Build GROUP BY clause
    pub fn build_group_by_clause(group_by: Option<&GroupBy>) -> String {
        match group_by {
            Some(group) if !group.fields.is_empty() => {
                format!("GROUP BY {}", group.fields.join(", "))
            }
            _ => String::new(),
        }
    }
}
