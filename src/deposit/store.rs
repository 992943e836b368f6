use super::model::{
    Deposit, DepositDTO, DepositLog, DepositStatus, GetStatsChartResult, GetStatusStatsQuery,
    SearchDepositQuery, SearchDepositQueryResult, Stats, StatusSeries,
    UpdateDepositAttachmentsCommand, UpdateDepositPartnerTransactionIdCommand,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use store_object::validation::{ensure_id, ensure_not_empty, ensure_time_range};
use store_object::{
    GenericStore, GroupBy, PageLimits, QueryBuilder, QueryContext, SearchSource, SelectField,
    SharedDatabase, SqlGenerator, SqlValue, StoreError,
};

const TABLE: &str = "deposits";
const LOG_TABLE: &str = "deposit_logs";

const DTO_COLUMNS: &str = "d.id, d.affiliate_id, COALESCE(af.login_name, '') AS login_name, \
     d.transaction_id, d.partner_transaction_id, d.amount, d.currency, d.payment_method, \
     d.status, d.attachments, d.remark, d.created_at, d.updated_at";

const SOURCE: SearchSource = SearchSource {
    columns: DTO_COLUMNS,
    from: "deposits d LEFT JOIN affiliates af ON af.id = d.affiliate_id",
    order_by: "d.id DESC",
};

#[derive(Deserialize)]
struct StatusStatsRow {
    status: DepositStatus,
    currency: String,
    total_amount: f64,
    total_count: i64,
}

#[derive(Debug, Clone)]
pub struct DepositStore {
    base: GenericStore,
    logs: GenericStore,
}

impl DepositStore {
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

    pub async fn create_deposit(
        &self,
        ctx: &QueryContext,
        deposit: &Deposit,
    ) -> Result<i64, StoreError> {
        ensure_not_empty(TABLE, "transaction_id", &deposit.transaction_id)?;
        let sql = "INSERT INTO deposits \
                   (affiliate_id, transaction_id, partner_transaction_id, amount, currency, \
                   payment_method, status, attachments, remark, created_at, updated_at) \
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING id";
        let params = [
            SqlValue::from(deposit.affiliate_id),
            SqlValue::from(&deposit.transaction_id),
            SqlValue::from(&deposit.partner_transaction_id),
            SqlValue::from(deposit.amount),
            SqlValue::from(&deposit.currency),
            SqlValue::from(&deposit.payment_method),
            SqlValue::from(deposit.status),
            Self::attachments_param(&deposit.attachments),
            SqlValue::from(&deposit.remark),
            SqlValue::from(deposit.created_at),
            SqlValue::from(deposit.updated_at),
        ];
        self.base.insert(ctx, "create_deposit", sql, &params).await
    }

    pub async fn save_deposit_log(
        &self,
        ctx: &QueryContext,
        log: &DepositLog,
    ) -> Result<i64, StoreError> {
        ensure_id(LOG_TABLE, "deposit_id", log.deposit_id)?;
        let sql = "INSERT INTO deposit_logs (deposit_id, status, remark, created_by, created_at) \
                   VALUES ($1, $2, $3, $4, $5) RETURNING id";
        let params = [
            SqlValue::from(log.deposit_id),
            SqlValue::from(log.status),
            SqlValue::from(&log.remark),
            SqlValue::from(&log.created_by),
            SqlValue::from(log.created_at),
        ];
        self.logs.insert(ctx, "save_deposit_log", sql, &params).await
    }

    /// Log entries of a deposit, oldest first; empty when there are none
    pub async fn get_deposit_log(
        &self,
        ctx: &QueryContext,
        deposit_id: i64,
    ) -> Result<Vec<DepositLog>, StoreError> {
        let sql = "SELECT id, deposit_id, status, remark, created_by, created_at FROM deposit_logs \
                   WHERE deposit_id = $1 ORDER BY created_at, id";
        self.logs
            .fetch_children(ctx, "get_deposit_log", sql, &[SqlValue::from(deposit_id)])
            .await
    }

    pub async fn get_deposit_by_id(
        &self,
        ctx: &QueryContext,
        id: i64,
    ) -> Result<DepositDTO, StoreError> {
        self.fetch_dto(ctx, "get_deposit_by_id", "d.id = $1", vec![SqlValue::from(id)])
            .await
    }

    pub async fn get_deposit_by_transaction_id(
        &self,
        ctx: &QueryContext,
        transaction_id: &str,
    ) -> Result<DepositDTO, StoreError> {
        self.fetch_dto(
            ctx,
            "get_deposit_by_transaction_id",
            "d.transaction_id = $1",
            vec![SqlValue::from(transaction_id)],
        )
        .await
    }

    /// The deposit, only while it is in `status`
    pub async fn get_deposit_by_status(
        &self,
        ctx: &QueryContext,
        id: i64,
        status: DepositStatus,
    ) -> Result<DepositDTO, StoreError> {
        self.fetch_dto(
            ctx,
            "get_deposit_by_status",
            "d.id = $1 AND d.status = $2",
            vec![SqlValue::from(id), SqlValue::from(status)],
        )
        .await
    }

    /// Search deposits, newest first.
    ///
    /// The page and the total are read by two statements outside a transaction.
    pub async fn search_deposit(
        &self,
        ctx: &QueryContext,
        query: &SearchDepositQuery,
    ) -> Result<SearchDepositQueryResult, StoreError> {
        ensure_time_range(TABLE, query.created_from, query.created_to)?;
        let builder = QueryBuilder::new()
            .eq_if("d.affiliate_id", query.affiliate_id)
            .contains_if("af.login_name", query.login_name.as_deref())
            .eq_if("d.transaction_id", query.transaction_id.as_deref())
            .eq_if("d.currency", query.currency.as_deref())
            .eq_if("d.status", query.status)
            .range_if("d.created_at", query.created_from, query.created_to)
            .paginate(query.page, query.per_page, self.base.page_limits());
        self.base
            .search(ctx, "search_deposit", &SOURCE, &builder)
            .await
    }

    pub async fn get_search_deposit_count(
        &self,
        ctx: &QueryContext,
        where_clause: &str,
        params: &[SqlValue],
    ) -> Result<i64, StoreError> {
        self.base
            .count_where(ctx, "get_search_deposit_count", &SOURCE, where_clause, params)
            .await
    }

    /// Move the deposit to a new status and replace its remark
    pub async fn update_status(
        &self,
        ctx: &QueryContext,
        deposit: &Deposit,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", deposit.id)?;
        let sql = "UPDATE deposits SET status = $1, remark = $2, updated_at = $3 WHERE id = $4";
        let params = [
            SqlValue::from(deposit.status),
            SqlValue::from(&deposit.remark),
            SqlValue::from(deposit.updated_at),
            SqlValue::from(deposit.id),
        ];
        self.base.execute(ctx, "update_status", sql, &params).await?;
        Ok(())
    }

    pub async fn update_deposit_amount(
        &self,
        ctx: &QueryContext,
        deposit: &Deposit,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", deposit.id)?;
        let sql = "UPDATE deposits SET amount = $1, updated_at = $2 WHERE id = $3";
        let params = [
            SqlValue::from(deposit.amount),
            SqlValue::from(deposit.updated_at),
            SqlValue::from(deposit.id),
        ];
        self.base
            .execute(ctx, "update_deposit_amount", sql, &params)
            .await?;
        Ok(())
    }

    /// Replace the attachment list wholesale
    pub async fn update_deposit_attachments(
        &self,
        ctx: &QueryContext,
        cmd: &UpdateDepositAttachmentsCommand,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", cmd.id)?;
        let sql = "UPDATE deposits SET attachments = $1, updated_at = NOW() WHERE id = $2";
        let params = [Self::attachments_param(&cmd.attachments), SqlValue::from(cmd.id)];
        self.base
            .execute(ctx, "update_deposit_attachments", sql, &params)
            .await?;
        Ok(())
    }

    pub async fn update_deposit_partner_transaction_id(
        &self,
        ctx: &QueryContext,
        cmd: &UpdateDepositPartnerTransactionIdCommand,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", cmd.id)?;
        let sql = "UPDATE deposits SET partner_transaction_id = $1, updated_at = NOW() WHERE id = $2";
        let params = [
            SqlValue::from(&cmd.partner_transaction_id),
            SqlValue::from(cmd.id),
        ];
        self.base
            .execute(ctx, "update_deposit_partner_transaction_id", sql, &params)
            .await?;
        Ok(())
    }

    /// Per-currency totals of deposits in `status` created within `[from, to]`
    pub async fn get_total_by_status(
        &self,
        ctx: &QueryContext,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        status: DepositStatus,
    ) -> Result<Vec<Stats>, StoreError> {
        ensure_time_range(TABLE, Some(from), Some(to))?;
        let (where_clause, params) = QueryBuilder::new()
            .eq_if("d.status", Some(status))
            .range_if("d.created_at", Some(from), Some(to))
            .build_where_clause();

        let group_by = GroupBy::single("d.currency");
        let sql = Self::rollup_sql(vec![SelectField::field_as("d.currency", "currency")], &where_clause, &group_by);
        self.base
            .fetch_all(ctx, "get_total_by_status", &sql, &params)
            .await
    }

    /// Per-status, per-currency totals for a time window, one series per status
    pub async fn get_status_stats(
        &self,
        ctx: &QueryContext,
        query: &GetStatusStatsQuery,
    ) -> Result<GetStatsChartResult, StoreError> {
        ensure_time_range(TABLE, Some(query.from), Some(query.to))?;
        let (where_clause, params) = QueryBuilder::new()
            .range_if("d.created_at", Some(query.from), Some(query.to))
            .in_if("d.status", query.statuses.clone())
            .build_where_clause();

        let group_by = GroupBy::single("d.status").then("d.currency");
        let sql = Self::rollup_sql(
            vec![
                SelectField::field_as("d.status", "status"),
                SelectField::field_as("d.currency", "currency"),
            ],
            &where_clause,
            &group_by,
        );
        let rows: Vec<StatusStatsRow> = self
            .base
            .fetch_all(ctx, "get_status_stats", &sql, &params)
            .await?;

        let mut series: Vec<StatusSeries> = Vec::new();
        for row in rows {
            let stats = Stats {
                currency: row.currency,
                total_amount: row.total_amount,
                total_count: row.total_count,
            };
            match series.last_mut() {
                Some(last) if last.status == row.status => last.stats.push(stats),
                _ => series.push(StatusSeries {
                    status: row.status,
                    stats: vec![stats],
                }),
            }
        }
        Ok(GetStatsChartResult { series })
    }

    async fn fetch_dto(
        &self,
        ctx: &QueryContext,
        operation: &str,
        predicate: &str,
        params: Vec<SqlValue>,
    ) -> Result<DepositDTO, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE {}", DTO_COLUMNS, SOURCE.from, predicate);
        self.base.fetch_one(ctx, operation, &sql, &params).await
    }

    fn rollup_sql(mut fields: Vec<SelectField>, where_clause: &str, group_by: &GroupBy) -> String {
        fields.push(
            SelectField::sum("d.amount")
                .or_default("0")
                .with_alias("total_amount"),
        );
        fields.push(SelectField::count_all().with_alias("total_count"));
        [
            format!("SELECT {} FROM deposits d", SqlGenerator::build_select_clause(&fields)),
            where_clause.to_string(),
            SqlGenerator::build_group_by_clause(Some(group_by)),
            format!("ORDER BY {}", group_by.fields.join(", ")),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    fn attachments_param(attachments: &[String]) -> SqlValue {
        SqlValue::Json(serde_json::Value::from(attachments.to_vec()))
    }
}
