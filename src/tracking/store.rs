use super::model::{
    GetSummaryTrackingQuery, GetSummaryTrackingResult, SearchSummaryTrackingLogQuery,
    SearchTrackingQuery, SearchTrackingResult, SummaryTrackingLogResult, Tracking, TrackingAction,
    TrackingDTO, TrackingLog, TrackingLogSummary,
};
use store_object::validation::{ensure_id, ensure_not_empty, ensure_time_range};
use store_object::{
    GenericStore, GroupBy, PageLimits, QueryBuilder, QueryContext, QueryFilter, SearchResult,
    SearchSource, SelectField, SharedDatabase, SqlGenerator, SqlValue, StoreError,
};

const TABLE: &str = "trackings";
const LOG_TABLE: &str = "tracking_logs";

const DTO_COLUMNS: &str = "tr.id, tr.affiliate_id, COALESCE(af.login_name, '') AS login_name, \
     tr.name, tr.code, tr.landing_url, tr.status, tr.created_at, tr.updated_at";

const SOURCE: SearchSource = SearchSource {
    columns: DTO_COLUMNS,
    from: "trackings tr LEFT JOIN affiliates af ON af.id = tr.affiliate_id",
    order_by: "tr.id DESC",
};

/// Links with at least one event; the inner join drops links without logs
const SUMMARY_FROM: &str = "trackings tr \
     JOIN tracking_logs l ON l.tracking_id = tr.id \
     LEFT JOIN affiliates af ON af.id = tr.affiliate_id";

#[derive(Debug, Clone)]
pub struct TrackingStore {
    base: GenericStore,
    logs: GenericStore,
}

impl TrackingStore {
    pub fn new(db: SharedDatabase) -> Self {
        Self {
            base: GenericStore::new(db.clone(), TABLE),
            logs: GenericStore::new(db, LOG_TABLE),
        }
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.base = self.base.with_page_limits(limits);
        self
    }

    pub async fn create(&self, ctx: &QueryContext, tracking: &Tracking) -> Result<i64, StoreError> {
        ensure_not_empty(TABLE, "code", &tracking.code)?;
        let sql = "INSERT INTO trackings \
                   (affiliate_id, name, code, landing_url, status, created_at, updated_at) \
                   VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id";
        let params = [
            SqlValue::from(tracking.affiliate_id),
            SqlValue::from(&tracking.name),
            SqlValue::from(&tracking.code),
            SqlValue::from(&tracking.landing_url),
            SqlValue::from(tracking.status),
            SqlValue::from(tracking.created_at),
            SqlValue::from(tracking.updated_at),
        ];
        self.base.insert(ctx, "create", sql, &params).await
    }

    /// Links of the affiliate already using `name` (case-insensitive), other than `exclude_id`
    pub async fn tracking_taken(
        &self,
        ctx: &QueryContext,
        affiliate_id: i64,
        name: &str,
        exclude_id: i64,
    ) -> Result<Vec<TrackingDTO>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE tr.affiliate_id = $1 AND LOWER(tr.name) = LOWER($2) \
             AND tr.id <> $3 ORDER BY tr.id",
            DTO_COLUMNS, SOURCE.from
        );
        let params = [
            SqlValue::from(affiliate_id),
            SqlValue::from(name),
            SqlValue::from(exclude_id),
        ];
        self.base
            .fetch_children(ctx, "tracking_taken", &sql, &params)
            .await
    }

    pub async fn create_log(&self, ctx: &QueryContext, log: &TrackingLog) -> Result<i64, StoreError> {
        ensure_id(LOG_TABLE, "tracking_id", log.tracking_id)?;
        let sql = "INSERT INTO tracking_logs (tracking_id, action, ip_address, created_at) \
                   VALUES ($1, $2, $3, $4) RETURNING id";
        let params = [
            SqlValue::from(log.tracking_id),
            SqlValue::from(log.action),
            SqlValue::from(&log.ip_address),
            SqlValue::from(log.created_at),
        ];
        self.logs.insert(ctx, "create_log", sql, &params).await
    }

    /// Search tracking links, newest first.
    ///
    /// The page and the total are read by two statements outside a transaction.
    pub async fn search(
        &self,
        ctx: &QueryContext,
        query: &SearchTrackingQuery,
    ) -> Result<SearchTrackingResult, StoreError> {
        let builder = QueryBuilder::new()
            .eq_if("tr.affiliate_id", query.affiliate_id)
            .contains_if("af.login_name", query.login_name.as_deref())
            .contains_if("tr.name", query.name.as_deref())
            .eq_if("tr.status", query.status)
            .paginate(query.page, query.per_page, self.base.page_limits());
        self.base.search(ctx, "search", &SOURCE, &builder).await
    }

    pub async fn get_tracking_count(
        &self,
        ctx: &QueryContext,
        where_clause: &str,
        params: &[SqlValue],
    ) -> Result<i64, StoreError> {
        self.base
            .count_where(ctx, "get_tracking_count", &SOURCE, where_clause, params)
            .await
    }

    pub async fn get_tracking_by_id(
        &self,
        ctx: &QueryContext,
        id: i64,
    ) -> Result<TrackingDTO, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE tr.id = $1", DTO_COLUMNS, SOURCE.from);
        self.base
            .fetch_one(ctx, "get_tracking_by_id", &sql, &[SqlValue::from(id)])
            .await
    }

    /// Rename the link or change its landing page; code and status stay
    pub async fn update_tracking(
        &self,
        ctx: &QueryContext,
        tracking: &Tracking,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", tracking.id)?;
        let sql = "UPDATE trackings SET name = $1, landing_url = $2, updated_at = $3 WHERE id = $4";
        let params = [
            SqlValue::from(&tracking.name),
            SqlValue::from(&tracking.landing_url),
            SqlValue::from(tracking.updated_at),
            SqlValue::from(tracking.id),
        ];
        self.base.execute(ctx, "update_tracking", sql, &params).await?;
        Ok(())
    }

    pub async fn update_status(
        &self,
        ctx: &QueryContext,
        tracking: &Tracking,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", tracking.id)?;
        let sql = "UPDATE trackings SET status = $1, updated_at = $2 WHERE id = $3";
        let params = [
            SqlValue::from(tracking.status),
            SqlValue::from(tracking.updated_at),
            SqlValue::from(tracking.id),
        ];
        self.base.execute(ctx, "update_status", sql, &params).await?;
        Ok(())
    }

    /// Event counts per link, newest link first.
    ///
    /// Only links with events inside the window appear. The page and the total
    /// are read by two statements outside a transaction.
    pub async fn get_summary_tracking_log(
        &self,
        ctx: &QueryContext,
        query: &SearchSummaryTrackingLogQuery,
    ) -> Result<SummaryTrackingLogResult, StoreError> {
        ensure_time_range(LOG_TABLE, query.from, query.to)?;
        let builder = QueryBuilder::new()
            .eq_if("tr.affiliate_id", query.affiliate_id)
            .eq_if("tr.id", query.tracking_id)
            .range_if("l.created_at", query.from, query.to)
            .paginate(query.page, query.per_page, self.base.page_limits());
        let (where_clause, _, limit_clause, params) = builder.build();

        let mut fields = vec![
            SelectField::field_as("tr.id", "tracking_id"),
            SelectField::field_as("tr.name", "tracking_name"),
            SelectField::field_as("tr.affiliate_id", "affiliate_id"),
            SelectField::field_as("COALESCE(af.login_name, '')", "login_name"),
        ];
        fields.extend(Self::action_counts());
        let group_by = GroupBy::single("tr.id")
            .then("tr.name")
            .then("tr.affiliate_id")
            .then("af.login_name");

        let page_sql = [
            format!(
                "SELECT {} FROM {}",
                SqlGenerator::build_select_clause(&fields),
                SUMMARY_FROM
            ),
            where_clause.clone(),
            SqlGenerator::build_group_by_clause(Some(&group_by)),
            "ORDER BY tr.id DESC".to_string(),
            limit_clause,
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
        let items: Vec<TrackingLogSummary> = self
            .logs
            .fetch_all(ctx, "get_summary_tracking_log", &page_sql, &params)
            .await?;

        let count_field = SelectField::count_distinct("tr.id").with_alias("total");
        let mut count_sql = format!(
            "SELECT {} FROM {}",
            SqlGenerator::build_select_clause(&[count_field]),
            SUMMARY_FROM
        );
        if !where_clause.is_empty() {
            count_sql.push(' ');
            count_sql.push_str(&where_clause);
        }
        let total_count = self
            .logs
            .count(ctx, "get_summary_tracking_log", &count_sql, &params)
            .await?;

        Ok(SearchResult { items, total_count })
    }

    /// Event counts across every link of one affiliate
    pub async fn get_summary_tracking_log_for_affiliate(
        &self,
        ctx: &QueryContext,
        query: &GetSummaryTrackingQuery,
    ) -> Result<GetSummaryTrackingResult, StoreError> {
        ensure_time_range(LOG_TABLE, query.from, query.to)?;
        let (where_clause, params) = QueryBuilder::new()
            .filter(QueryFilter::eq("tr.affiliate_id", query.affiliate_id))
            .range_if("l.created_at", query.from, query.to)
            .build_where_clause();
        let sql = format!(
            "SELECT {} FROM tracking_logs l JOIN trackings tr ON tr.id = l.tracking_id {}",
            SqlGenerator::build_select_clause(&Self::action_counts()),
            where_clause
        );
        self.logs
            .fetch_one(ctx, "get_summary_tracking_log_for_affiliate", &sql, &params)
            .await
    }

    fn action_counts() -> Vec<SelectField> {
        [
            (TrackingAction::CLICK, "clicks"),
            (TrackingAction::REGISTRATION, "registrations"),
            (TrackingAction::FIRST_DEPOSIT, "first_deposits"),
        ]
        .into_iter()
        .map(|(action, alias)| {
            SelectField::count_all()
                .filtered(format!("l.action = {}", action))
                .with_alias(alias)
        })
        .collect()
    }
}
