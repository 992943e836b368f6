use super::model::{
    GetStatusStatsQuery, GetStatusStatsResult, SearchTransfersQuery, SearchTransfersResult,
    StatusStats, Transfer, TransferDTO, TransferGrandTotalResult, TransferLog,
};
use store_object::validation::{ensure_id, ensure_not_empty, ensure_time_range};
use store_object::{
    GenericStore, GroupBy, PageLimits, QueryBuilder, QueryContext, QueryFilter, SearchSource,
    SelectField, SharedDatabase, SqlGenerator, SqlValue, StoreError,
};

const TABLE: &str = "direct_transfers";
const LOG_TABLE: &str = "direct_transfer_logs";

const DTO_COLUMNS: &str = "t.id, t.transaction_id, t.from_affiliate_id, \
     COALESCE(fa.login_name, '') AS from_login_name, t.to_affiliate_id, \
     COALESCE(ta.login_name, '') AS to_login_name, t.amount, t.currency, t.status, t.remark, \
     t.created_by, t.created_at, t.updated_at";

const SOURCE: SearchSource = SearchSource {
    columns: DTO_COLUMNS,
    from: "direct_transfers t \
           LEFT JOIN affiliates fa ON fa.id = t.from_affiliate_id \
           LEFT JOIN affiliates ta ON ta.id = t.to_affiliate_id",
    order_by: "t.id DESC",
};

#[derive(Debug, Clone)]
pub struct TransferStore {
    base: GenericStore,
    logs: GenericStore,
}

impl TransferStore {
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

    pub async fn create(&self, ctx: &QueryContext, transfer: &Transfer) -> Result<i64, StoreError> {
        ensure_not_empty(TABLE, "transaction_id", &transfer.transaction_id)?;
        let sql = "INSERT INTO direct_transfers \
                   (transaction_id, from_affiliate_id, to_affiliate_id, amount, currency, status, \
                   remark, created_by, created_at, updated_at) \
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id";
        let params = [
            SqlValue::from(&transfer.transaction_id),
            SqlValue::from(transfer.from_affiliate_id),
            SqlValue::from(transfer.to_affiliate_id),
            SqlValue::from(transfer.amount),
            SqlValue::from(&transfer.currency),
            SqlValue::from(transfer.status),
            SqlValue::from(&transfer.remark),
            SqlValue::from(&transfer.created_by),
            SqlValue::from(transfer.created_at),
            SqlValue::from(transfer.updated_at),
        ];
        self.base.insert(ctx, "create", sql, &params).await
    }

    pub async fn update_status(
        &self,
        ctx: &QueryContext,
        transfer: &Transfer,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", transfer.id)?;
        let sql = "UPDATE direct_transfers SET status = $1, remark = $2, updated_at = $3 WHERE id = $4";
        let params = [
            SqlValue::from(transfer.status),
            SqlValue::from(&transfer.remark),
            SqlValue::from(transfer.updated_at),
            SqlValue::from(transfer.id),
        ];
        self.base.execute(ctx, "update_status", sql, &params).await?;
        Ok(())
    }

    pub async fn create_log(&self, ctx: &QueryContext, log: &TransferLog) -> Result<i64, StoreError> {
        ensure_id(LOG_TABLE, "transfer_id", log.transfer_id)?;
        let sql = "INSERT INTO direct_transfer_logs (transfer_id, status, remark, created_by, created_at) \
                   VALUES ($1, $2, $3, $4, $5) RETURNING id";
        let params = [
            SqlValue::from(log.transfer_id),
            SqlValue::from(log.status),
            SqlValue::from(&log.remark),
            SqlValue::from(&log.created_by),
            SqlValue::from(log.created_at),
        ];
        self.logs.insert(ctx, "create_log", sql, &params).await
    }

    /// Log of one transfer, oldest first
    pub async fn get_log_by_id(
        &self,
        ctx: &QueryContext,
        transfer_id: i64,
    ) -> Result<Vec<TransferLog>, StoreError> {
        let sql = "SELECT id, transfer_id, status, remark, created_by, created_at \
                   FROM direct_transfer_logs WHERE transfer_id = $1 ORDER BY created_at, id";
        self.logs
            .fetch_children(ctx, "get_log_by_id", sql, &[SqlValue::from(transfer_id)])
            .await
    }

    pub async fn get_by_id(&self, ctx: &QueryContext, id: i64) -> Result<TransferDTO, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE t.id = $1", DTO_COLUMNS, SOURCE.from);
        self.base
            .fetch_one(ctx, "get_by_id", &sql, &[SqlValue::from(id)])
            .await
    }

    pub async fn get_by_transaction_id(
        &self,
        ctx: &QueryContext,
        transaction_id: &str,
    ) -> Result<TransferDTO, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE t.transaction_id = $1",
            DTO_COLUMNS, SOURCE.from
        );
        self.base
            .fetch_one(
                ctx,
                "get_by_transaction_id",
                &sql,
                &[SqlValue::from(transaction_id)],
            )
            .await
    }

    /// Search transfers, newest first, with the grand total of every match.
    ///
    /// Page, count and grand total are three statements outside a transaction.
    pub async fn search(
        &self,
        ctx: &QueryContext,
        query: &SearchTransfersQuery,
    ) -> Result<SearchTransfersResult, StoreError> {
        ensure_time_range(TABLE, query.created_from, query.created_to)?;
        let builder = Self::filters(query).paginate(
            query.page,
            query.per_page,
            self.base.page_limits(),
        );
        let page = self.base.search(ctx, "search", &SOURCE, &builder).await?;

        let (conditions, params) = builder.build_conditions();
        let grand_total = self
            .get_transfer_grand_total(ctx, &conditions, &params)
            .await?;

        Ok(SearchTransfersResult {
            transfers: page.items,
            total_count: page.total_count,
            grand_total,
        })
    }

    pub async fn get_count(
        &self,
        ctx: &QueryContext,
        where_clause: &str,
        params: &[SqlValue],
    ) -> Result<i64, StoreError> {
        self.base
            .count_where(ctx, "get_count", &SOURCE, where_clause, params)
            .await
    }

    /// Amount sum and row count over the AND of `conditions`.
    ///
    /// Each condition is a rendered predicate whose `$n` placeholders index `params`.
    pub async fn get_transfer_grand_total(
        &self,
        ctx: &QueryContext,
        conditions: &[String],
        params: &[SqlValue],
    ) -> Result<TransferGrandTotalResult, StoreError> {
        let fields = [
            SelectField::sum("t.amount")
                .or_default("0")
                .with_alias("total_amount"),
            SelectField::count_all().with_alias("total_count"),
        ];
        let mut sql = format!(
            "SELECT {} FROM {}",
            SqlGenerator::build_select_clause(&fields),
            SOURCE.from
        );
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        self.base
            .fetch_one(ctx, "get_transfer_grand_total", &sql, params)
            .await
    }

    /// Amount and count per status within `[from, to]`, optionally for one currency
    pub async fn get_status_stats(
        &self,
        ctx: &QueryContext,
        query: &GetStatusStatsQuery,
    ) -> Result<GetStatusStatsResult, StoreError> {
        ensure_time_range(TABLE, Some(query.from), Some(query.to))?;
        let (where_clause, params) = QueryBuilder::new()
            .range_if("t.created_at", Some(query.from), Some(query.to))
            .eq_if("t.currency", query.currency.as_deref())
            .build_where_clause();

        let fields = [
            SelectField::field_as("t.status", "status"),
            SelectField::sum("t.amount")
                .or_default("0")
                .with_alias("total_amount"),
            SelectField::count_all().with_alias("total_count"),
        ];
        let group_by = GroupBy::single("t.status");
        let sql = format!(
            "SELECT {} FROM direct_transfers t {} {} ORDER BY t.status",
            SqlGenerator::build_select_clause(&fields),
            where_clause,
            SqlGenerator::build_group_by_clause(Some(&group_by)),
        );
        let stats: Vec<StatusStats> = self
            .base
            .fetch_all(ctx, "get_status_stats", &sql, &params)
            .await?;
        Ok(GetStatusStatsResult { stats })
    }

    fn filters(query: &SearchTransfersQuery) -> QueryBuilder {
        let builder = QueryBuilder::new()
            .eq_if("t.transaction_id", query.transaction_id.as_deref())
            .eq_if("t.from_affiliate_id", query.from_affiliate_id)
            .eq_if("t.to_affiliate_id", query.to_affiliate_id);

        let builder = match query.login_name.as_deref() {
            Some(name) if !name.is_empty() => builder.filter(QueryFilter::or(vec![
                QueryFilter::contains("fa.login_name", name),
                QueryFilter::contains("ta.login_name", name),
            ])),
            _ => builder,
        };

        builder
            .eq_if("t.currency", query.currency.as_deref())
            .eq_if("t.status", query.status)
            .range_if("t.created_at", query.created_from, query.created_to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct_transfer::TransferStatus;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;
    use store_object::testing::FakeDatabase;
    use store_object::{DbError, Row};

    fn fixture() -> (Arc<FakeDatabase>, TransferStore) {
        let db = FakeDatabase::shared();
        let store = TransferStore::new(db.clone());
        (db, store)
    }

    fn ctx() -> QueryContext {
        QueryContext::background()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, day, 8, 30, 0).unwrap()
    }

    fn dto(id: i64) -> TransferDTO {
        TransferDTO {
            id,
            transaction_id: format!("TRF-{id}"),
            from_affiliate_id: 1,
            from_login_name: "alpha".to_string(),
            to_affiliate_id: 2,
            to_login_name: "beta".to_string(),
            amount: 75.25,
            currency: "USD".to_string(),
            status: TransferStatus::COMPLETED,
            remark: String::new(),
            created_by: "ops".to_string(),
            created_at: at(3),
            updated_at: at(3),
        }
    }

    fn grand_total(amount: f64, count: i64) -> Row {
        Row::new()
            .with("total_amount", amount)
            .with("total_count", count)
    }

    #[tokio::test]
    async fn test_get_transfer_grand_total() {
        struct Case {
            name: &'static str,
            fail: Option<DbError>,
            expect: Option<TransferGrandTotalResult>,
        }
        let cases = vec![
            Case {
                name: "get transfer grand total success",
                fail: None,
                expect: Some(TransferGrandTotalResult {
                    total_amount: 0.0,
                    total_count: 0,
                }),
            },
            Case {
                name: "get transfer grand total error",
                fail: Some(DbError::other("error")),
                expect: None,
            },
        ];

        for case in cases {
            let (db, store) = fixture();
            match case.fail {
                Some(err) => db.fail_with(err),
                None => {
                    db.push_row(grand_total(0.0, 0));
                }
            }
            let result = store.get_transfer_grand_total(&ctx(), &[], &[]).await;
            match case.expect {
                Some(expected) => assert_eq!(result.unwrap(), expected, "{}", case.name),
                None => assert!(result.is_err(), "{}", case.name),
            }
        }
    }

    #[tokio::test]
    async fn test_get_transfer_grand_total_joins_conditions() {
        let (db, store) = fixture();
        db.push_row(grand_total(150.5, 2));
        let conditions = vec!["t.currency = $1".to_string(), "t.status = $2".to_string()];
        let params = vec![SqlValue::from("USD"), SqlValue::Int(2)];

        let total = store
            .get_transfer_grand_total(&ctx(), &conditions, &params)
            .await
            .unwrap();
        assert_eq!(total.total_count, 2);
        assert_eq!(total.total_amount, 150.5);

        let statement = db.last_statement().unwrap();
        assert!(statement.sql.starts_with(
            "SELECT COALESCE(SUM(t.amount), 0) AS total_amount, COUNT(*) AS total_count FROM direct_transfers t"
        ));
        assert!(statement.sql.ends_with("WHERE t.currency = $1 AND t.status = $2"));
        assert_eq!(statement.params, params);
    }

    #[tokio::test]
    async fn test_get_log_by_id() {
        let cases = [
            ("get log by id success", None, Some(1usize)),
            ("get log by id error", Some(DbError::other("error")), None),
            ("get log by id not found", Some(DbError::NoRows), Some(0)),
        ];
        for (name, fail, expect_len) in cases {
            let (db, store) = fixture();
            match fail {
                Some(err) => {
                    db.push_error(err);
                }
                None => {
                    let log = TransferLog {
                        id: 1,
                        transfer_id: 1,
                        status: TransferStatus::PENDING,
                        created_at: at(1),
                        ..Default::default()
                    };
                    db.push_rows(vec![Row::encode(&log).unwrap()]);
                }
            }
            let result = store.get_log_by_id(&ctx(), 1).await;
            match expect_len {
                Some(len) => assert_eq!(result.unwrap().len(), len, "{}", name),
                None => assert!(result.is_err(), "{}", name),
            }
        }
    }

    #[tokio::test]
    async fn test_get_by_id_and_transaction_id() {
        let (db, store) = fixture();
        db.push_row(Row::encode(&dto(6)).unwrap());
        db.push_row(Row::encode(&dto(6)).unwrap());
        assert_eq!(store.get_by_id(&ctx(), 6).await.unwrap(), dto(6));
        assert_eq!(
            store.get_by_transaction_id(&ctx(), "TRF-6").await.unwrap(),
            dto(6)
        );
        let statements = db.statements();
        assert!(statements[0].sql.ends_with("WHERE t.id = $1"));
        assert!(statements[1].sql.ends_with("WHERE t.transaction_id = $1"));
        assert_eq!(statements[1].params, vec![SqlValue::from("TRF-6")]);

        let (db, store) = fixture();
        db.fail_with(DbError::other("error"));
        assert!(store.get_by_id(&ctx(), 6).await.unwrap_err().is_persistence());
        assert!(store
            .get_by_transaction_id(&ctx(), "TRF-6")
            .await
            .unwrap_err()
            .is_persistence());

        let (db, store) = fixture();
        db.fail_with(DbError::NoRows);
        assert!(store.get_by_id(&ctx(), 6).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_search_includes_grand_total() {
        let (db, store) = fixture();
        db.push_rows(vec![Row::encode(&dto(2)).unwrap()]);
        db.push_row(Row::new().with("total", 1));
        db.push_row(grand_total(75.25, 1));

        let query = SearchTransfersQuery {
            login_name: Some("alp".to_string()),
            status: Some(TransferStatus::COMPLETED),
            ..Default::default()
        };
        let result = store.search(&ctx(), &query).await.unwrap();
        assert_eq!(result.transfers, vec![dto(2)]);
        assert_eq!(result.total_count, 1);
        assert_eq!(result.grand_total.total_amount, 75.25);

        let statements = db.statements();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].sql.contains(
            "WHERE (fa.login_name ILIKE $1 OR ta.login_name ILIKE $2) AND t.status = $3 ORDER BY t.id DESC"
        ));
        assert!(statements[2]
            .sql
            .ends_with("WHERE (fa.login_name ILIKE $1 OR ta.login_name ILIKE $2) AND t.status = $3"));
        assert_eq!(statements[0].params, statements[2].params);
        assert_eq!(statements[0].params[0], SqlValue::from("%alp%"));
    }

    #[tokio::test]
    async fn test_search_errors() {
        let (db, store) = fixture();
        db.fail_with(DbError::other("error"));
        assert!(store
            .search(&ctx(), &SearchTransfersQuery::default())
            .await
            .is_err());

        let (db, store) = fixture();
        db.push_rows(vec![]);
        db.push_row(Row::new().with("total", 0));
        db.push_error(DbError::NoRows);
        assert!(store
            .search(&ctx(), &SearchTransfersQuery::default())
            .await
            .unwrap_err()
            .is_not_found());

        let (_db, store) = fixture();
        let inverted = SearchTransfersQuery {
            created_from: Some(at(5)),
            created_to: Some(at(4)),
            ..Default::default()
        };
        assert!(store.search(&ctx(), &inverted).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_get_status_stats() {
        struct Case {
            name: &'static str,
            fail: Option<DbError>,
            expect_len: Option<usize>,
        }
        let cases = vec![
            Case {
                name: "get status stats success",
                fail: None,
                expect_len: Some(2),
            },
            Case {
                name: "get status stats error",
                fail: Some(DbError::other("error")),
                expect_len: None,
            },
            Case {
                name: "get status stats not found",
                fail: Some(DbError::NoRows),
                expect_len: None,
            },
        ];
        let query = GetStatusStatsQuery {
            from: at(1),
            to: at(31),
            currency: Some("USD".to_string()),
        };

        for case in cases {
            let (db, store) = fixture();
            match case.fail {
                Some(err) => db.fail_with(err),
                None => {
                    db.push_rows(vec![
                        grand_total(10.0, 1).with("status", 1),
                        grand_total(20.0, 3).with("status", 2),
                    ]);
                }
            }
            let result = store.get_status_stats(&ctx(), &query).await;
            match case.expect_len {
                Some(len) => {
                    let result = result.unwrap();
                    assert_eq!(result.stats.len(), len, "{}", case.name);
                    assert_eq!(result.stats[1].status, TransferStatus::COMPLETED);
                    let statement = db.last_statement().unwrap();
                    assert_eq!(
                        statement.sql,
                        "SELECT t.status AS status, COALESCE(SUM(t.amount), 0) AS total_amount, \
                         COUNT(*) AS total_count FROM direct_transfers t \
                         WHERE t.created_at >= $1 AND t.created_at <= $2 AND t.currency = $3 \
                         GROUP BY t.status ORDER BY t.status"
                    );
                }
                None => assert!(result.is_err(), "{}", case.name),
            }
        }
    }

    #[tokio::test]
    async fn test_create_and_create_log() {
        let (db, store) = fixture();
        db.push_row(Row::new().with("id", 14));
        db.push_row(Row::new().with("id", 3));

        let transfer = Transfer {
            transaction_id: "TRF-14".to_string(),
            from_affiliate_id: 1,
            to_affiliate_id: 2,
            amount: 5.0,
            ..Default::default()
        };
        assert_eq!(store.create(&ctx(), &transfer).await.unwrap(), 14);
        let log = TransferLog {
            transfer_id: 14,
            status: TransferStatus::PENDING,
            ..Default::default()
        };
        assert_eq!(store.create_log(&ctx(), &log).await.unwrap(), 3);

        let statements = db.statements();
        assert_eq!(statements[0].params.len(), 10);
        assert!(statements[1].sql.starts_with("INSERT INTO direct_transfer_logs"));

        let (db, store) = fixture();
        db.fail_with(DbError::other("error"));
        assert!(store.create(&ctx(), &transfer).await.is_err());
        assert!(store.create_log(&ctx(), &log).await.is_err());
    }

    #[tokio::test]
    async fn test_update_status() {
        let (db, store) = fixture();
        let transfer = Transfer {
            id: 9,
            status: TransferStatus::CANCELLED,
            remark: "requested by sender".to_string(),
            ..Default::default()
        };
        store.update_status(&ctx(), &transfer).await.unwrap();
        let params = db.last_statement().unwrap().params;
        assert_eq!(params[0], SqlValue::Int(4));
        assert_eq!(params[3], SqlValue::Int(9));

        let (db, store) = fixture();
        db.fail_with(DbError::other("error"));
        assert!(store.update_status(&ctx(), &transfer).await.is_err());
    }

    #[tokio::test]
    async fn test_get_count() {
        let (db, store) = fixture();
        db.push_row(Row::new().with("total", 3));
        assert_eq!(store.get_count(&ctx(), "", &[]).await.unwrap(), 3);

        let (db, store) = fixture();
        db.fail_with(DbError::other("error"));
        assert!(store.get_count(&ctx(), "", &[]).await.is_err());
    }
}
