use crate::domain::{Category, CreateCategoryInput, StringUuid, UpdateCategoryInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

const CATEGORY_COLUMNS: &str = "id, name, description, agency_id, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, input: &CreateCategoryInput) -> Result<Category>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Category>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>>;
    async fn list(&self, agency_id: Option<StringUuid>) -> Result<Vec<Category>>;
    async fn update(&self, id: StringUuid, input: &UpdateCategoryInput) -> Result<Category>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct CategoryRepositoryImpl {
    pool: MySqlPool,
}

impl CategoryRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for CategoryRepositoryImpl {
    async fn create(&self, input: &CreateCategoryInput) -> Result<Category> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, agency_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(StringUuid::from(input.agency_id))
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create category")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn list(&self, agency_id: Option<StringUuid>) -> Result<Vec<Category>> {
        let categories = match agency_id {
            Some(agency_id) => {
                sqlx::query_as::<_, Category>(&format!(
                    "SELECT {CATEGORY_COLUMNS} FROM categories WHERE agency_id = ? ORDER BY name"
                ))
                .bind(agency_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Category>(&format!(
                    "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(categories)
    }

    async fn update(&self, id: StringUuid, input: &UpdateCategoryInput) -> Result<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

        let name = input.name.clone().unwrap_or(existing.name);
        let description = input.description.clone().unwrap_or(existing.description);
        let agency_id = input
            .agency_id
            .map(StringUuid::from)
            .unwrap_or(existing.agency_id);

        sqlx::query(
            "UPDATE categories SET name = ?, description = ?, agency_id = ?, updated_at = NOW() \
             WHERE id = ?",
        )
        .bind(&name)
        .bind(&description)
        .bind(agency_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        Ok(())
    }
}
