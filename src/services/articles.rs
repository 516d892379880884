//! Ownership-scoped article operations.
//!
//! Every operation takes the authenticated principal's user id as a
//! mandatory filter. A lookup that matches the id but not the author is
//! reported identically to "not found".

use std::sync::Arc;

use chrono::Utc;

use crate::config;
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::storage::{ArticleRecord, JsonStore};

pub struct ArticleService {
    store: Arc<JsonStore<ArticleRecord>>,
}

impl ArticleService {
    pub fn new(store: Arc<JsonStore<ArticleRecord>>) -> Self {
        Self { store }
    }

    /// Create an article owned by the principal. Author fields come from the
    /// principal only, never from client input.
    pub fn create(
        &self,
        principal: &Principal,
        title: &str,
        content: &str,
    ) -> Result<ArticleRecord, ApiError> {
        validate_title(title)?;
        validate_content(content)?;

        let now = Utc::now();
        let author_id = principal.user_id;
        let author_name = principal.username.clone();
        let title = title.trim().to_string();
        let content = content.trim().to_string();

        let record = self.store.update(move |articles| {
            // Id assignment happens under the store lock, so concurrent
            // creates always get unique monotonically increasing ids.
            let id = articles.iter().map(|a| a.id).max().unwrap_or(0) + 1;
            let record = ArticleRecord {
                id,
                title,
                content,
                author_id,
                author_name,
                create_time: now,
                update_time: now,
            };
            articles.push(record.clone());
            record
        })?;

        tracing::info!(article_id = record.id, author = %principal.username, "article created");
        Ok(record)
    }

    /// All articles owned by `user_id`.
    pub fn list(&self, user_id: i64) -> Result<Vec<ArticleRecord>, ApiError> {
        let articles = self.store.read()?;
        Ok(articles
            .into_iter()
            .filter(|article| article.author_id == user_id)
            .collect())
    }

    /// Single article by id, scoped to the owner.
    pub fn get(&self, article_id: i64, user_id: i64) -> Result<ArticleRecord, ApiError> {
        let articles = self.store.read()?;
        articles
            .into_iter()
            .find(|article| article.id == article_id && article.author_id == user_id)
            .ok_or(ApiError::NotFoundOrForbidden)
    }

    /// Update title and/or content of an owned article. Provided fields are
    /// re-validated; update_time advances, create_time never changes.
    pub fn update(
        &self,
        article_id: i64,
        user_id: i64,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<ArticleRecord, ApiError> {
        if let Some(title) = title {
            validate_title(title)?;
        }
        if let Some(content) = content {
            validate_content(content)?;
        }

        let updated = self.store.update(|articles| {
            let article = articles
                .iter_mut()
                .find(|article| article.id == article_id && article.author_id == user_id)
                .ok_or(ApiError::NotFoundOrForbidden)?;
            if let Some(title) = title {
                article.title = title.trim().to_string();
            }
            if let Some(content) = content {
                article.content = content.trim().to_string();
            }
            article.update_time = Utc::now();
            Ok::<_, ApiError>(article.clone())
        })??;

        tracing::info!(article_id, "article updated");
        Ok(updated)
    }

    /// Delete an owned article.
    pub fn delete(&self, article_id: i64, user_id: i64) -> Result<(), ApiError> {
        self.store.update(|articles| {
            let before = articles.len();
            articles.retain(|article| {
                !(article.id == article_id && article.author_id == user_id)
            });
            if articles.len() == before {
                return Err(ApiError::NotFoundOrForbidden);
            }
            Ok(())
        })??;

        tracing::info!(article_id, "article deleted");
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    let bounds = &config::config().article;
    let length = title.trim().chars().count();
    if length < bounds.title_min || length > bounds.title_max {
        return Err(ApiError::validation(format!(
            "title must be {}-{} characters",
            bounds.title_min, bounds.title_max
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), ApiError> {
    let bounds = &config::config().article;
    let length = content.trim().chars().count();
    if length < bounds.content_min || length > bounds.content_max {
        return Err(ApiError::validation(format!(
            "content must be {}-{} characters",
            bounds.content_min, bounds.content_max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ArticleService {
        let dir = std::env::temp_dir().join(format!("quill-articles-{}", uuid::Uuid::new_v4()));
        let store = Arc::new(JsonStore::open(dir.join("articles.json")).unwrap());
        ArticleService::new(store)
    }

    fn principal(user_id: i64, username: &str) -> Principal {
        Principal {
            user_id,
            username: username.to_string(),
        }
    }

    #[test]
    fn title_boundaries_are_inclusive() {
        let service = service();
        let alice = principal(1, "alice");

        assert!(service.create(&alice, &"t".repeat(2), "valid content").is_ok());
        assert!(service.create(&alice, &"t".repeat(50), "valid content").is_ok());

        let short = service.create(&alice, "t", "valid content");
        assert!(matches!(short, Err(ApiError::Validation(msg)) if msg.contains("2-50")));
        let long = service.create(&alice, &"t".repeat(51), "valid content");
        assert!(matches!(long, Err(ApiError::Validation(msg)) if msg.contains("2-50")));
    }

    #[test]
    fn content_boundaries_are_inclusive() {
        let service = service();
        let alice = principal(1, "alice");

        assert!(service.create(&alice, "title", &"c".repeat(5)).is_ok());
        assert!(service.create(&alice, "title", &"c".repeat(5000)).is_ok());

        let short = service.create(&alice, "title", &"c".repeat(4));
        assert!(matches!(short, Err(ApiError::Validation(msg)) if msg.contains("5-5000")));
        let long = service.create(&alice, "title", &"c".repeat(5001));
        assert!(matches!(long, Err(ApiError::Validation(msg)) if msg.contains("5-5000")));
    }

    #[test]
    fn bounds_apply_after_trimming() {
        let service = service();
        let alice = principal(1, "alice");
        // Two real characters padded with whitespace is still valid
        let article = service.create(&alice, "  ab  ", "  hello world  ").unwrap();
        assert_eq!(article.title, "ab");
        assert_eq!(article.content, "hello world");
        // Whitespace alone does not satisfy the minimum
        assert!(service.create(&alice, "  a  ", "valid content").is_err());
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let service = service();
        let alice = principal(1, "alice");
        let first = service.create(&alice, "first title", "first content").unwrap();
        let second = service.create(&alice, "second title", "second content").unwrap();
        assert!(second.id > first.id);

        service.delete(first.id, 1).unwrap();
        let third = service.create(&alice, "third title", "third content").unwrap();
        assert!(third.id > second.id);
    }

    #[test]
    fn other_users_articles_are_indistinguishable_from_missing() {
        let service = service();
        let alice = principal(1, "alice");
        let article = service.create(&alice, "alice title", "alice content").unwrap();

        let foreign = service.get(article.id, 2).unwrap_err();
        let missing = service.get(9999, 2).unwrap_err();
        assert_eq!(foreign.to_json(), missing.to_json());

        assert!(matches!(
            service.update(article.id, 2, Some("other title"), None),
            Err(ApiError::NotFoundOrForbidden)
        ));
        assert!(matches!(
            service.delete(article.id, 2),
            Err(ApiError::NotFoundOrForbidden)
        ));
        assert!(service.list(2).unwrap().is_empty());
    }

    #[test]
    fn update_title_keeps_content_and_advances_update_time() {
        let service = service();
        let alice = principal(1, "alice");
        let created = service.create(&alice, "old title", "the content").unwrap();

        let updated = service.update(created.id, 1, Some("new title"), None).unwrap();
        assert_eq!(updated.title, "new title");
        assert_eq!(updated.content, "the content");
        assert_eq!(updated.create_time, created.create_time);
        assert!(updated.update_time > created.create_time);
    }

    #[test]
    fn author_fields_come_from_the_principal() {
        let service = service();
        let alice = principal(7, "alice");
        let article = service.create(&alice, "a title", "some content").unwrap();
        assert_eq!(article.author_id, 7);
        assert_eq!(article.author_name, "alice");
    }
}
