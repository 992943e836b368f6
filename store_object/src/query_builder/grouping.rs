/// Represents a GROUP BY clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBy {
    /// Fields to group by
    pub fields: Vec<String>,
}

impl GroupBy {
    /// Create a new GROUP BY clause with the specified fields
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Create a GROUP BY clause with a single field
    pub fn single(field: impl Into<String>) -> Self {
        Self {
            fields: vec![field.into()],
        }
    }

    pub fn then(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }
}
