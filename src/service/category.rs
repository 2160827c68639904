//! Category management. Writes are admin-tier only (enforced at the route
//! via `Guarded<AdminOrSuperAdmin>`); reads are open to any authenticated
//! principal.

use crate::domain::{Category, CreateCategoryInput, StringUuid, UpdateCategoryInput};
use crate::error::{AppError, Result};
use crate::repository::CategoryRepository;
use std::sync::Arc;
use validator::Validate;

pub struct CategoryService<C: CategoryRepository> {
    categories: Arc<C>,
}

impl<C: CategoryRepository> CategoryService<C> {
    pub fn new(categories: Arc<C>) -> Self {
        Self { categories }
    }

    pub async fn create(&self, input: CreateCategoryInput) -> Result<Category> {
        input.validate()?;

        if self.categories.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                input.name
            )));
        }

        let category = self.categories.create(&input).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn get(&self, id: StringUuid) -> Result<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn list(&self, agency_id: Option<StringUuid>) -> Result<Vec<Category>> {
        self.categories.list(agency_id).await
    }

    pub async fn update(&self, id: StringUuid, input: UpdateCategoryInput) -> Result<Category> {
        input.validate()?;
        self.categories.update(id, &input).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.categories.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::category::MockCategoryRepository;
    use chrono::Utc;

    fn category(name: &str) -> Category {
        let now = Utc::now();
        Category {
            id: StringUuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            agency_id: StringUuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_name_conflict() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_name()
            .returning(|name| Ok(Some(category(name))));

        let service = CategoryService::new(Arc::new(categories));

        let input = CreateCategoryInput {
            name: "Roads".to_string(),
            description: String::new(),
            agency_id: uuid::Uuid::new_v4(),
        };
        let result = service.create(input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_missing_not_found() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));

        let service = CategoryService::new(Arc::new(categories));
        let result = service.get(StringUuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
