use super::model::{Banner, BannerStatus, SearchBannerQuery, SearchBannersResult};
use store_object::validation::ensure_id;
use store_object::{
    GenericStore, PageLimits, QueryBuilder, QueryContext, SearchSource, SharedDatabase, SqlValue,
    StoreError,
};

const TABLE: &str = "banners";

const COLUMNS: &str = "b.id, b.name, b.image_url, b.link_url, b.language, b.width, b.height, \
                       b.sort_order, b.status, b.created_at, b.updated_at";

const SOURCE: SearchSource = SearchSource {
    columns: COLUMNS,
    from: "banners b",
    order_by: "b.id DESC",
};

#[derive(Debug, Clone)]
pub struct BannerStore {
    base: GenericStore,
}

impl BannerStore {
    pub fn new(db: SharedDatabase) -> Self {
        Self {
            base: GenericStore::new(db, TABLE),
        }
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.base = self.base.with_page_limits(limits);
        self
    }

    pub async fn create(&self, ctx: &QueryContext, banner: &Banner) -> Result<i64, StoreError> {
        let sql = "INSERT INTO banners \
                   (name, image_url, link_url, language, width, height, sort_order, status, created_at, updated_at) \
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id";
        let params = [
            SqlValue::from(&banner.name),
            SqlValue::from(&banner.image_url),
            SqlValue::from(&banner.link_url),
            SqlValue::from(&banner.language),
            SqlValue::from(banner.width),
            SqlValue::from(banner.height),
            SqlValue::from(banner.sort_order),
            SqlValue::from(banner.status),
            SqlValue::from(banner.created_at),
            SqlValue::from(banner.updated_at),
        ];
        self.base.insert(ctx, "create", sql, &params).await
    }

    /// Search banners, newest first.
    ///
    /// The page and the total are read by two statements outside a transaction.
    pub async fn search(
        &self,
        ctx: &QueryContext,
        query: &SearchBannerQuery,
    ) -> Result<SearchBannersResult, StoreError> {
        let builder = Self::filters(query).paginate(
            query.page,
            query.per_page,
            self.base.page_limits(),
        );
        self.base.search(ctx, "search", &SOURCE, &builder).await
    }

    /// COUNT over `banners b` for a rendered WHERE fragment
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

    pub async fn get_by_id(&self, ctx: &QueryContext, id: i64) -> Result<Banner, StoreError> {
        let sql = format!("SELECT {} FROM banners b WHERE b.id = $1", COLUMNS);
        self.base
            .fetch_one(ctx, "get_by_id", &sql, &[SqlValue::from(id)])
            .await
    }

    /// Rewrite every editable field; the status is left untouched
    pub async fn update(&self, ctx: &QueryContext, banner: &Banner) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", banner.id)?;
        let sql = "UPDATE banners SET name = $1, image_url = $2, link_url = $3, language = $4, \
                   width = $5, height = $6, sort_order = $7, updated_at = $8 WHERE id = $9";
        let params = [
            SqlValue::from(&banner.name),
            SqlValue::from(&banner.image_url),
            SqlValue::from(&banner.link_url),
            SqlValue::from(&banner.language),
            SqlValue::from(banner.width),
            SqlValue::from(banner.height),
            SqlValue::from(banner.sort_order),
            SqlValue::from(banner.updated_at),
            SqlValue::from(banner.id),
        ];
        self.base.execute(ctx, "update", sql, &params).await?;
        Ok(())
    }

    pub async fn update_status(
        &self,
        ctx: &QueryContext,
        banner: &Banner,
    ) -> Result<(), StoreError> {
        self.set_status(ctx, banner.id, banner.status, banner.updated_at)
            .await
    }

    async fn set_status(
        &self,
        ctx: &QueryContext,
        id: i64,
        status: BannerStatus,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", id)?;
        let sql = "UPDATE banners SET status = $1, updated_at = $2 WHERE id = $3";
        let params = [
            SqlValue::from(status),
            SqlValue::from(updated_at),
            SqlValue::from(id),
        ];
        self.base.execute(ctx, "update_status", sql, &params).await?;
        Ok(())
    }

    fn filters(query: &SearchBannerQuery) -> QueryBuilder {
        QueryBuilder::new()
            .contains_if("b.name", query.name.as_deref())
            .eq_if("b.language", query.language.as_deref())
            .eq_if("b.status", query.status)
    }
}
