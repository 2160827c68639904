//! Complaint repository
//!
//! Every list/count query takes a [`ComplaintScope`]; ownership filtering is
//! not optional at this layer.

use crate::domain::{
    Complaint, ComplaintFilter, ComplaintStatus, CreateComplaintInput, StringUuid,
};
use crate::error::{AppError, Result};
use crate::policy::ComplaintScope;
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

const COMPLAINT_COLUMNS: &str = "id, title, description, category, location, images, status, \
     citizen_id, assigned_to, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    async fn create(&self, citizen_id: StringUuid, input: &CreateComplaintInput)
        -> Result<Complaint>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Complaint>>;
    async fn list(
        &self,
        scope: ComplaintScope,
        filter: &ComplaintFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Complaint>>;
    async fn count(&self, scope: ComplaintScope, filter: &ComplaintFilter) -> Result<i64>;
    async fn update_status(
        &self,
        id: StringUuid,
        status: ComplaintStatus,
        assigned_to: Option<StringUuid>,
    ) -> Result<Complaint>;
}

pub struct ComplaintRepositoryImpl {
    pool: MySqlPool,
}

impl ComplaintRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn push_predicates(
        builder: &mut QueryBuilder<'_, MySql>,
        scope: ComplaintScope,
        filter: &ComplaintFilter,
    ) {
        match scope {
            ComplaintScope::Unrestricted => {}
            ComplaintScope::Citizen(id) => {
                builder.push(" AND citizen_id = ").push_bind(id);
            }
            ComplaintScope::Agency(agency_id) => {
                builder.push(" AND assigned_to = ").push_bind(agency_id);
            }
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(category) = filter.category.clone() {
            builder.push(" AND category = ").push_bind(category);
        }
    }
}

#[async_trait]
impl ComplaintRepository for ComplaintRepositoryImpl {
    async fn create(
        &self,
        citizen_id: StringUuid,
        input: &CreateComplaintInput,
    ) -> Result<Complaint> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO complaints
                (id, title, description, category, location, images, status,
                 citizen_id, assigned_to, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 'pending', ?, NULL, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.location)
        .bind(sqlx::types::Json(&input.images))
        .bind(citizen_id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create complaint")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Complaint>> {
        let complaint = sqlx::query_as::<_, Complaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(complaint)
    }

    async fn list(
        &self,
        scope: ComplaintScope,
        filter: &ComplaintFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Complaint>> {
        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE 1 = 1"
        ));
        Self::push_predicates(&mut builder, scope, filter);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let complaints = builder
            .build_query_as::<Complaint>()
            .fetch_all(&self.pool)
            .await?;

        Ok(complaints)
    }

    async fn count(&self, scope: ComplaintScope, filter: &ComplaintFilter) -> Result<i64> {
        let mut builder =
            QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM complaints WHERE 1 = 1");
        Self::push_predicates(&mut builder, scope, filter);

        let row: (i64,) = builder.build_query_as().fetch_one(&self.pool).await?;
        Ok(row.0)
    }

    async fn update_status(
        &self,
        id: StringUuid,
        status: ComplaintStatus,
        assigned_to: Option<StringUuid>,
    ) -> Result<Complaint> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))?;

        let assigned_to = assigned_to.or(existing.assigned_to);

        sqlx::query(
            "UPDATE complaints SET status = ?, assigned_to = ?, updated_at = NOW() WHERE id = ?",
        )
        .bind(status)
        .bind(assigned_to)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))
    }
}
