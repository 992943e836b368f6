use super::model::{Commission, CommissionDTO, SearchCommissionQuery, SearchCommissionResult};
use store_object::validation::ensure_id;
use store_object::{
    GenericStore, PageLimits, QueryBuilder, QueryContext, QueryFilter, SearchSource,
    SharedDatabase, SqlValue, StoreError,
};

const TABLE: &str = "commissions";

const DTO_COLUMNS: &str = "c.id, c.affiliate_id, COALESCE(af.login_name, '') AS login_name, c.uuid, \
     c.period, c.currency, c.net_revenue, c.amount, c.active_players, c.min_active_players, \
     c.payout_frequency, c.commission_status, c.payment_status, c.created_at, c.updated_at";

const SOURCE: SearchSource = SearchSource {
    columns: DTO_COLUMNS,
    from: "commissions c LEFT JOIN affiliates af ON af.id = c.affiliate_id",
    order_by: "c.id DESC",
};

#[derive(Debug, Clone)]
pub struct CommissionStore {
    base: GenericStore,
}

impl CommissionStore {
    pub fn new(db: SharedDatabase) -> Self {
        Self {
            base: GenericStore::new(db, TABLE),
        }
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.base = self.base.with_page_limits(limits);
        self
    }

    pub async fn create(
        &self,
        ctx: &QueryContext,
        commission: &Commission,
    ) -> Result<i64, StoreError> {
        let sql = "INSERT INTO commissions \
                   (affiliate_id, uuid, period, currency, net_revenue, amount, active_players, \
                   min_active_players, payout_frequency, commission_status, payment_status, \
                   created_at, updated_at) \
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING id";
        let params = [
            SqlValue::from(commission.affiliate_id),
            SqlValue::from(commission.uuid),
            SqlValue::from(&commission.period),
            SqlValue::from(&commission.currency),
            SqlValue::from(commission.net_revenue),
            SqlValue::from(commission.amount),
            SqlValue::from(commission.active_players),
            SqlValue::from(commission.min_active_players),
            SqlValue::from(&commission.payout_frequency),
            SqlValue::from(commission.commission_status),
            SqlValue::from(commission.payment_status),
            SqlValue::from(commission.created_at),
            SqlValue::from(commission.updated_at),
        ];
        self.base.insert(ctx, "create", sql, &params).await
    }

    pub async fn get_by_id(
        &self,
        ctx: &QueryContext,
        id: i64,
    ) -> Result<CommissionDTO, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE c.id = $1", DTO_COLUMNS, SOURCE.from);
        self.base
            .fetch_one(ctx, "get_by_id", &sql, &[SqlValue::from(id)])
            .await
    }

    /// Write both the review status and the payment status
    pub async fn update_status(
        &self,
        ctx: &QueryContext,
        commission: &Commission,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", commission.id)?;
        let sql = "UPDATE commissions SET commission_status = $1, payment_status = $2, \
                   updated_at = $3 WHERE id = $4";
        let params = [
            SqlValue::from(commission.commission_status),
            SqlValue::from(commission.payment_status),
            SqlValue::from(commission.updated_at),
            SqlValue::from(commission.id),
        ];
        self.base.execute(ctx, "update_status", sql, &params).await?;
        Ok(())
    }

    /// Search commissions, newest first.
    ///
    /// The page and the total are read by two statements outside a transaction.
    pub async fn search(
        &self,
        ctx: &QueryContext,
        query: &SearchCommissionQuery,
    ) -> Result<SearchCommissionResult, StoreError> {
        let builder = Self::filters(query).paginate(
            query.page,
            query.per_page,
            self.base.page_limits(),
        );
        self.base.search(ctx, "search", &SOURCE, &builder).await
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

    fn filters(query: &SearchCommissionQuery) -> QueryBuilder {
        QueryBuilder::new()
            .eq_if("c.affiliate_id", query.affiliate_id)
            .eq_if("c.uuid", query.uuid)
            .contains_if("af.login_name", query.login_name.as_deref())
            .eq_if("c.currency", query.currency.as_deref())
            .eq_if("c.commission_status", query.commission_status)
            .eq_if("c.payment_status", query.payment_status)
            .eq_if("c.payout_frequency", query.payout_frequency.as_deref())
            .filter_if(
                query.has_min_active_player_check,
                QueryFilter::expr("c.active_players >= c.min_active_players", vec![]),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::{CommissionPaymentStatus, CommissionStatus};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use store_object::testing::FakeDatabase;
    use store_object::{DbError, Row};
    use uuid::Uuid;

    fn fixture() -> (Arc<FakeDatabase>, CommissionStore) {
        let db = FakeDatabase::shared();
        let store = CommissionStore::new(db.clone());
        (db, store)
    }

    fn ctx() -> QueryContext {
        QueryContext::background()
    }

    fn dto(id: i64) -> CommissionDTO {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        CommissionDTO {
            id,
            affiliate_id: 3,
            login_name: "aff3".to_string(),
            uuid: Uuid::from_u128(0x1234),
            period: "2024-05".to_string(),
            currency: "EUR".to_string(),
            net_revenue: 1200.5,
            amount: 300.125,
            active_players: 12,
            min_active_players: 5,
            payout_frequency: "monthly".to_string(),
            commission_status: CommissionStatus::APPROVED,
            payment_status: CommissionPaymentStatus::UNPAID,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_search() {
        struct Case {
            name: &'static str,
            rows: Vec<CommissionDTO>,
            fail: Option<DbError>,
            expect_total: Option<i64>,
        }
        let cases = vec![
            Case {
                name: "search success empty",
                rows: vec![],
                fail: None,
                expect_total: Some(0),
            },
            Case {
                name: "search success",
                rows: vec![dto(2), dto(1)],
                fail: None,
                expect_total: Some(2),
            },
            Case {
                name: "search error",
                rows: vec![],
                fail: Some(DbError::other("error")),
                expect_total: None,
            },
        ];

        for case in cases {
            let (db, store) = fixture();
            match case.fail {
                Some(err) => db.fail_with(err),
                None => {
                    let total = case.rows.len() as i64;
                    db.push_rows(case.rows.iter().map(|r| Row::encode(r).unwrap()).collect());
                    db.push_row(Row::new().with("total", total));
                }
            }

            let result = store.search(&ctx(), &SearchCommissionQuery::default()).await;
            match case.expect_total {
                Some(total) => {
                    let result = result.unwrap();
                    assert_eq!(result.total_count, total, "{}", case.name);
                    assert_eq!(result.items, case.rows, "{}", case.name);
                }
                None => assert!(result.is_err(), "{}", case.name),
            }
        }
    }

    #[tokio::test]
    async fn test_search_min_active_player_check() {
        let (db, store) = fixture();
        let query = SearchCommissionQuery {
            uuid: Some(Uuid::from_u128(0x1234)),
            commission_status: Some(CommissionStatus::APPROVED),
            has_min_active_player_check: true,
            ..Default::default()
        };
        db.push_rows(vec![]);
        db.push_row(Row::new().with("total", 0));
        store.search(&ctx(), &query).await.unwrap();

        let statements = db.statements();
        assert!(statements[0].sql.contains(
            "WHERE c.uuid = $1 AND c.commission_status = $2 \
             AND c.active_players >= c.min_active_players ORDER BY c.id DESC"
        ));
        assert_eq!(
            statements[0].params,
            vec![SqlValue::Uuid(Uuid::from_u128(0x1234)), SqlValue::Int(2)]
        );
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let (db, store) = fixture();
        db.push_row(Row::new().with("id", 8));
        db.push_row(Row::encode(&dto(8)).unwrap());

        let commission = Commission {
            affiliate_id: 3,
            uuid: Uuid::from_u128(0x1234),
            ..Default::default()
        };
        let id = store.create(&ctx(), &commission).await.unwrap();
        assert_eq!(store.get_by_id(&ctx(), id).await.unwrap(), dto(8));
        assert_eq!(db.statements()[0].params.len(), 13);

        let (db, store) = fixture();
        db.push_error(DbError::NoRows);
        assert!(store.get_by_id(&ctx(), 99).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_status() {
        let (db, store) = fixture();
        let commission = Commission {
            id: 4,
            commission_status: CommissionStatus::REJECTED,
            payment_status: CommissionPaymentStatus::PAID,
            ..Default::default()
        };
        store.update_status(&ctx(), &commission).await.unwrap();
        let params = db.last_statement().unwrap().params;
        assert_eq!(params[0], SqlValue::Int(3));
        assert_eq!(params[1], SqlValue::Int(2));
        assert_eq!(params[3], SqlValue::Int(4));

        let (db, store) = fixture();
        db.fail_with(DbError::other("error"));
        assert!(store.update_status(&ctx(), &commission).await.is_err());
    }

    #[tokio::test]
    async fn test_get_count() {
        let (db, store) = fixture();
        db.push_row(Row::new().with("total", 4));
        let count = store
            .get_count(&ctx(), "WHERE c.currency = $1", &[SqlValue::from("EUR")])
            .await
            .unwrap();
        assert_eq!(count, 4);
    }
}
