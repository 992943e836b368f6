//! Page-number pagination
//!
//! Pages are 1-based. A page of zero or below is read as the first page, so the
//! computed offset is never negative.

/// Page size used when a query leaves `per_page` at zero
pub const DEFAULT_PER_PAGE: i64 = 20;
/// Upper bound applied to a requested page size
pub const MAX_PER_PAGE: i64 = 500;

/// Page-size policy applied by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_per_page: i64,
    pub max_per_page: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl PageLimits {
    /// Both sizes are raised to at least 1, so a page is never empty by policy
    pub fn new(default_per_page: i64, max_per_page: i64) -> Self {
        Self {
            default_per_page: default_per_page.max(1),
            max_per_page: max_per_page.max(1),
        }
    }

    /// Effective page size for a requested one, always at least 1
    pub fn per_page(&self, requested: i64) -> i64 {
        let max = self.max_per_page.max(1);
        if requested <= 0 {
            self.default_per_page.clamp(1, max)
        } else {
            requested.min(max)
        }
    }
}

/// Pagination configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}

impl Pagination {
    pub fn new() -> Self {
        Self {
            limit: None,
            offset: None,
        }
    }

    /// LIMIT/OFFSET for a 1-based page number
    pub fn for_page(page: i64, per_page: i64, limits: &PageLimits) -> Self {
        let per_page = limits.per_page(per_page);
        let page = page.max(1);
        Self {
            limit: Some(per_page),
            offset: Some((page - 1).saturating_mul(per_page)),
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_sql(&self) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        clauses.join(" ")
    }
}
