//! Category business logic - creating, listing and seeding a user's categories.
//!
//! Categories are scoped to one user. Names are trimmed and must be unique per user;
//! the same name may exist for different users.

use crate::{
    config::settings::CategoryConfig,
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Lists the user's categories ordered by name.
#[instrument(skip(db))]
pub async fn list_categories<C>(db: &C, user_id: &str) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by id, returning None if it does not exist or belongs to another user.
pub async fn get_category_by_id<C>(
    db: &C,
    user_id: &str,
    category_id: i64,
) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .filter(category::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its exact name for this user.
pub async fn get_category_by_name<C>(
    db: &C,
    user_id: &str,
    name: &str,
) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a category after validating the name.
///
/// The name is trimmed; an empty result is rejected with [`Error::InvalidName`] and a
/// name the user already has is rejected with [`Error::DuplicateCategory`].
#[instrument(skip(db))]
pub async fn create_category<C>(
    db: &C,
    user_id: &str,
    name: &str,
    color: &str,
) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidName {
            message: "Category name cannot be empty".to_string(),
        });
    }

    if get_category_by_name(db, user_id, name).await?.is_some() {
        return Err(Error::DuplicateCategory {
            name: name.to_string(),
        });
    }

    let category = category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.to_string()),
        color: Set(color.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = category.insert(db).await?;
    debug!("Created category {} ({}) for {}", created.name, created.id, user_id);
    Ok(created)
}

/// Creates every configured category the user does not have yet.
///
/// # Returns
/// The number of categories created.
#[instrument(skip(db, configs))]
pub async fn seed_categories<C>(db: &C, user_id: &str, configs: &[CategoryConfig]) -> Result<usize>
where
    C: ConnectionTrait,
{
    let mut created = 0;
    for config in configs {
        if get_category_by_name(db, user_id, config.name.trim())
            .await?
            .is_some()
        {
            continue;
        }
        create_category(db, user_id, &config.name, &config.color).await?;
        created += 1;
    }
    info!("Seeded {} of {} configured categories", created, configs.len());
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_category_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_category(&db, TEST_USER, "", "#fff").await;
        assert!(matches!(result, Err(Error::InvalidName { message: _ })));

        let result = create_category(&db, TEST_USER, "   ", "#fff").await;
        assert!(matches!(result, Err(Error::InvalidName { message: _ })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let category = create_category(&db, TEST_USER, "  Food  ", "#22c55e").await?;
        assert_eq!(category.name, "Food");
        assert_eq!(category.color, "#22c55e");
        assert_eq!(category.user_id, TEST_USER);

        let found = get_category_by_id(&db, TEST_USER, category.id).await?;
        assert_eq!(found, Some(category));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_per_user_only() -> Result<()> {
        let db = setup_test_db().await?;
        create_category(&db, TEST_USER, "Food", "").await?;

        let duplicate = create_category(&db, TEST_USER, "Food", "#000").await;
        assert!(matches!(
            duplicate,
            Err(Error::DuplicateCategory { name }) if name == "Food"
        ));

        // Another user may use the same name
        let other = create_category(&db, OTHER_USER, "Food", "").await?;
        assert_eq!(other.user_id, OTHER_USER);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_categories_ordered_and_scoped() -> Result<()> {
        let db = setup_test_db().await?;
        create_category(&db, TEST_USER, "Rent", "").await?;
        create_category(&db, TEST_USER, "Food", "").await?;
        create_category(&db, OTHER_USER, "Books", "").await?;

        let names: Vec<String> = list_categories(&db, TEST_USER)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Food", "Rent"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_category_by_id_other_user() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_category(&db, OTHER_USER, "Books", "").await?;

        assert!(get_category_by_id(&db, TEST_USER, category.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_categories_skips_existing() -> Result<()> {
        let db = setup_test_db().await?;
        create_category(&db, TEST_USER, "Food", "#111").await?;

        let configs = vec![
            CategoryConfig {
                name: "Food".to_string(),
                color: "#222".to_string(),
            },
            CategoryConfig {
                name: "Travel".to_string(),
                color: String::new(),
            },
        ];

        assert_eq!(seed_categories(&db, TEST_USER, &configs).await?, 1);
        assert_eq!(seed_categories(&db, TEST_USER, &configs).await?, 0);

        let food = get_category_by_name(&db, TEST_USER, "Food").await?.unwrap();
        assert_eq!(food.color, "#111");
        assert_eq!(list_categories(&db, TEST_USER).await?.len(), 2);

        Ok(())
    }
}
