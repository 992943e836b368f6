use super::model::{
    Annotation, AnnotationAttachment, AnnotationDTO, SearchAnnotationQuery, SearchAnnotationResult,
};
use serde::Deserialize;
use store_object::validation::{ensure_id, ensure_not_empty, ensure_time_range};
use store_object::{
    GenericStore, PageLimits, QueryBuilder, QueryContext, SearchSource, SharedDatabase, SqlValue,
    StoreError,
};

const TABLE: &str = "annotations";
const ATTACHMENT_TABLE: &str = "annotation_attachments";

const DTO_COLUMNS: &str = "a.id, a.affiliate_id, COALESCE(af.login_name, '') AS login_name, \
     a.title, a.content, a.status, a.created_by, a.created_at, a.updated_at, \
     COALESCE((SELECT json_agg(aa.file_name ORDER BY aa.id) FROM annotation_attachments aa \
     WHERE aa.annotation_id = a.id), '[]'::json) AS attachments";

const DTO_FROM: &str = "annotations a LEFT JOIN affiliates af ON af.id = a.affiliate_id";

const SOURCE: SearchSource = SearchSource {
    columns: DTO_COLUMNS,
    from: DTO_FROM,
    order_by: "a.id DESC",
};

#[derive(Deserialize)]
struct FileName {
    file_name: String,
}

#[derive(Debug, Clone)]
pub struct AnnotationStore {
    base: GenericStore,
    attachments: GenericStore,
}

impl AnnotationStore {
    pub fn new(db: SharedDatabase) -> Self {
        Self {
            base: GenericStore::new(db.clone(), TABLE),
            attachments: GenericStore::new(db, ATTACHMENT_TABLE),
        }
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.base = self.base.with_page_limits(limits);
        self
    }

    pub async fn create(
        &self,
        ctx: &QueryContext,
        annotation: &Annotation,
    ) -> Result<i64, StoreError> {
        let sql = "INSERT INTO annotations \
                   (affiliate_id, title, content, status, created_by, created_at, updated_at) \
                   VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id";
        let params = [
            SqlValue::from(annotation.affiliate_id),
            SqlValue::from(&annotation.title),
            SqlValue::from(&annotation.content),
            SqlValue::from(annotation.status),
            SqlValue::from(&annotation.created_by),
            SqlValue::from(annotation.created_at),
            SqlValue::from(annotation.updated_at),
        ];
        self.base.insert(ctx, "create", sql, &params).await
    }

    pub async fn create_attachment(
        &self,
        ctx: &QueryContext,
        attachment: &AnnotationAttachment,
    ) -> Result<i64, StoreError> {
        ensure_id(ATTACHMENT_TABLE, "annotation_id", attachment.annotation_id)?;
        ensure_not_empty(ATTACHMENT_TABLE, "file_name", &attachment.file_name)?;
        let sql = "INSERT INTO annotation_attachments (annotation_id, file_name, created_at) \
                   VALUES ($1, $2, $3) RETURNING id";
        let params = [
            SqlValue::from(attachment.annotation_id),
            SqlValue::from(&attachment.file_name),
            SqlValue::from(attachment.created_at),
        ];
        self.attachments
            .insert(ctx, "create_attachment", sql, &params)
            .await
    }

    /// Annotations of `affiliate_id` already using `title`, other than `exclude_id`.
    ///
    /// Titles compare case-insensitively. Pass 0 as `exclude_id` when creating.
    pub async fn annotation_taken(
        &self,
        ctx: &QueryContext,
        affiliate_id: i64,
        title: &str,
        exclude_id: i64,
    ) -> Result<Vec<AnnotationDTO>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE a.affiliate_id = $1 AND LOWER(a.title) = LOWER($2) \
             AND a.id <> $3 ORDER BY a.id",
            DTO_COLUMNS, DTO_FROM
        );
        let params = [
            SqlValue::from(affiliate_id),
            SqlValue::from(title),
            SqlValue::from(exclude_id),
        ];
        self.base
            .fetch_children(ctx, "annotation_taken", &sql, &params)
            .await
    }

    pub async fn update(
        &self,
        ctx: &QueryContext,
        annotation: &Annotation,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", annotation.id)?;
        let sql = "UPDATE annotations SET title = $1, content = $2, updated_at = $3 WHERE id = $4";
        let params = [
            SqlValue::from(&annotation.title),
            SqlValue::from(&annotation.content),
            SqlValue::from(annotation.updated_at),
            SqlValue::from(annotation.id),
        ];
        self.base.execute(ctx, "update", sql, &params).await?;
        Ok(())
    }

    pub async fn update_status(
        &self,
        ctx: &QueryContext,
        annotation: &Annotation,
    ) -> Result<(), StoreError> {
        ensure_id(TABLE, "id", annotation.id)?;
        let sql = "UPDATE annotations SET status = $1, updated_at = $2 WHERE id = $3";
        let params = [
            SqlValue::from(annotation.status),
            SqlValue::from(annotation.updated_at),
            SqlValue::from(annotation.id),
        ];
        self.base.execute(ctx, "update_status", sql, &params).await?;
        Ok(())
    }

    /// Hard-delete the attachment matching both the parent and the file name
    pub async fn delete_attachment_by_id(
        &self,
        ctx: &QueryContext,
        annotation_id: i64,
        file_name: &str,
    ) -> Result<(), StoreError> {
        ensure_id(ATTACHMENT_TABLE, "annotation_id", annotation_id)?;
        ensure_not_empty(ATTACHMENT_TABLE, "file_name", file_name)?;
        let sql = "DELETE FROM annotation_attachments WHERE annotation_id = $1 AND file_name = $2";
        let params = [SqlValue::from(annotation_id), SqlValue::from(file_name)];
        self.attachments
            .execute(ctx, "delete_attachment_by_id", sql, &params)
            .await?;
        Ok(())
    }

    pub async fn get_by_id(
        &self,
        ctx: &QueryContext,
        id: i64,
    ) -> Result<AnnotationDTO, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE a.id = $1", DTO_COLUMNS, DTO_FROM);
        self.base
            .fetch_one(ctx, "get_by_id", &sql, &[SqlValue::from(id)])
            .await
    }

    /// Attachments of an annotation, oldest first
    pub async fn get_attachments(
        &self,
        ctx: &QueryContext,
        annotation_id: i64,
    ) -> Result<Vec<AnnotationAttachment>, StoreError> {
        let sql = "SELECT id, annotation_id, file_name, created_at FROM annotation_attachments \
                   WHERE annotation_id = $1 ORDER BY id";
        self.attachments
            .fetch_children(ctx, "get_attachments", sql, &[SqlValue::from(annotation_id)])
            .await
    }

    /// Attachment file names of an annotation, oldest first
    pub async fn get_attachments_by_annotation_id(
        &self,
        ctx: &QueryContext,
        annotation_id: i64,
    ) -> Result<Vec<String>, StoreError> {
        let sql = "SELECT file_name FROM annotation_attachments WHERE annotation_id = $1 ORDER BY id";
        let names: Vec<FileName> = self
            .attachments
            .fetch_children(
                ctx,
                "get_attachments_by_annotation_id",
                sql,
                &[SqlValue::from(annotation_id)],
            )
            .await?;
        Ok(names.into_iter().map(|n| n.file_name).collect())
    }

    /// Search annotations, newest first.
    ///
    /// The page and the total are read by two statements outside a transaction.
    pub async fn search(
        &self,
        ctx: &QueryContext,
        query: &SearchAnnotationQuery,
    ) -> Result<SearchAnnotationResult, StoreError> {
        ensure_time_range(TABLE, query.created_from, query.created_to)?;
        let builder = QueryBuilder::new()
            .eq_if("a.affiliate_id", query.affiliate_id)
            .contains_if("af.login_name", query.login_name.as_deref())
            .contains_if("a.title", query.title.as_deref())
            .eq_if("a.status", query.status)
            .range_if("a.created_at", query.created_from, query.created_to)
            .paginate(query.page, query.per_page, self.base.page_limits());
        self.base.search(ctx, "search", &SOURCE, &builder).await
    }

    /// COUNT over the annotation join for a rendered WHERE fragment
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
}
