/// Represents SQL aggregate functions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateFunction {
    /// COUNT(*) or COUNT(field)
    Count,
    /// SUM(field)
    Sum,
    /// MIN(field)
    Min,
    /// MAX(field)
    Max,
    /// COUNT(DISTINCT field)
    CountDistinct,
}

impl AggregateFunction {
    /// Convert aggregate function to SQL string
    pub fn to_sql(&self) -> &'static str {
        match self {
            AggregateFunction::Count | AggregateFunction::CountDistinct => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }

    /// Check if this is a DISTINCT aggregate
    pub fn is_distinct(&self) -> bool {
        matches!(self, AggregateFunction::CountDistinct)
    }
}

/// Represents a field selection in a SELECT clause
#[derive(Debug, Clone, PartialEq)]
pub enum SelectField {
    /// Select specific field: SELECT field_name
    Field(String),
    /// Select field with alias: SELECT field_name AS alias
    FieldWithAlias { field: String, alias: String },
    /// Select aggregate function: SELECT COUNT(field)
    Aggregate {
        function: AggregateFunction,
        field: Option<String>, // None for COUNT(*)
        alias: Option<String>,
        /// `FILTER (WHERE ...)` predicate
        filter: Option<String>,
        /// `COALESCE(..., default)` for aggregates over no rows
        default: Option<String>,
    },
}

impl SelectField {
    fn aggregate(function: AggregateFunction, field: Option<String>) -> Self {
        SelectField::Aggregate {
            function,
            field,
            alias: None,
            filter: None,
            default: None,
        }
    }

    /// Create a simple field selection
    pub fn field(field: impl Into<String>) -> Self {
        SelectField::Field(field.into())
    }

    /// Create a field with alias
    pub fn field_as(field: impl Into<String>, alias: impl Into<String>) -> Self {
        SelectField::FieldWithAlias {
            field: field.into(),
            alias: alias.into(),
        }
    }

    /// Create COUNT(*) aggregate
    pub fn count_all() -> Self {
        Self::aggregate(AggregateFunction::Count, None)
    }

    /// Create COUNT(field) aggregate
    pub fn count(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Count, Some(field.into()))
    }

    /// Create COUNT(DISTINCT field) aggregate
    pub fn count_distinct(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::CountDistinct, Some(field.into()))
    }

    /// Create SUM(field) aggregate
    pub fn sum(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Sum, Some(field.into()))
    }

    pub fn min(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Min, Some(field.into()))
    }

    pub fn max(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Max, Some(field.into()))
    }

    /// Add an alias to this select field
    pub fn with_alias(self, alias: impl Into<String>) -> Self {
        match self {
            SelectField::Field(field) => SelectField::FieldWithAlias {
                field,
                alias: alias.into(),
            },
            SelectField::Aggregate {
                function,
                field,
                filter,
                default,
                ..
            } => SelectField::Aggregate {
                function,
                field,
                alias: Some(alias.into()),
                filter,
                default,
            },
            other => other,
        }
    }

    /// Restrict an aggregate to rows matching `predicate`
    pub fn filtered(mut self, predicate: impl Into<String>) -> Self {
        if let SelectField::Aggregate { filter, .. } = &mut self {
            *filter = Some(predicate.into());
        }
        self
    }

    /// Substitute `value` when the aggregate is NULL
    pub fn or_default(mut self, value: impl Into<String>) -> Self {
        if let SelectField::Aggregate { default, .. } = &mut self {
            *default = Some(value.into());
        }
        self
    }

    pub fn to_sql(&self) -> String {
        match self {
            SelectField::Field(name) => name.clone(),
            SelectField::FieldWithAlias { field, alias } => format!("{} AS {}", field, alias),
            SelectField::Aggregate {
                function,
                field,
                alias,
                filter,
                default,
            } => {
                let field_part = match (function.is_distinct(), field) {
                    (true, Some(f)) => format!("DISTINCT {}", f),
                    (_, Some(f)) => f.clone(),
                    (_, None) => "*".to_string(),
                };

                let mut sql = format!("{}({})", function.to_sql(), field_part);
                if let Some(predicate) = filter {
                    sql = format!("{} FILTER (WHERE {})", sql, predicate);
                }
                if let Some(value) = default {
                    sql = format!("COALESCE({}, {})", sql, value);
                }

                match alias {
                    Some(alias) => format!("{} AS {}", sql, alias),
                    None => sql,
                }
            }
        }
    }
}
