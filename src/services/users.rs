use std::sync::Arc;
use uuid::Uuid;

use crate::database::Result;
use crate::events::{ActionType, UserEvent, UserEventPublisher};
use crate::schema::User;
use crate::store::{UserFilter, UserStore};
use crate::types::{Page, PageRequest};

/// Pairs every user mutation with its event publication.
///
/// | operation         | event  |
/// |-------------------|--------|
/// | `save_user`       | CREATE |
/// | `update_user`     | UPDATE |
/// | `update_password` | none   |
/// | `delete_user`     | DELETE |
///
/// The mutation is committed before anything is published. A failed
/// mutation publishes nothing. A failed publication is logged and the
/// committed mutation stays as it is, so delivery is at most once.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    publisher: Arc<dyn UserEventPublisher>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, publisher: Arc<dyn UserEventPublisher>) -> Self {
        Self { store, publisher }
    }

    pub async fn exists_by_username(&self, username: &str) -> Result<bool> {
        self.store.exists_by_username(username).await
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool> {
        self.store.exists_by_email(email).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.store.find_by_id(id).await
    }

    pub async fn find_all(&self, filter: &UserFilter, request: &PageRequest) -> Result<Page<User>> {
        self.store.find_all(filter, request).await
    }

    #[tracing::instrument(skip_all, fields(user.id = %user.user_id), name = "services.users.save")]
    pub async fn save_user(&self, user: &User) -> Result<User> {
        let user = self.store.insert(user).await?;
        self.publish(&user, ActionType::Create).await;
        Ok(user)
    }

    /// Returns `None` if the record disappeared before it could be
    /// written back.
    #[tracing::instrument(skip_all, fields(user.id = %user.user_id), name = "services.users.update")]
    pub async fn update_user(&self, user: &User) -> Result<Option<User>> {
        let updated = self.store.update(user).await?;
        if let Some(updated) = updated.as_ref() {
            self.publish(updated, ActionType::Update).await;
        }
        Ok(updated)
    }

    #[tracing::instrument(skip_all, fields(user.id = %user.user_id), name = "services.users.update_password")]
    pub async fn update_password(&self, user: &User) -> Result<Option<User>> {
        self.store.update(user).await
    }

    /// Returns `false` if the record was already gone.
    #[tracing::instrument(skip_all, fields(user.id = %user.user_id), name = "services.users.delete")]
    pub async fn delete_user(&self, user: &User) -> Result<bool> {
        let deleted = self.store.delete(user.user_id).await?;
        if deleted {
            self.publish(user, ActionType::Delete).await;
        }
        Ok(deleted)
    }

    async fn publish(&self, user: &User, action: ActionType) {
        let event = UserEvent::from(user).with_action(action);
        if let Err(error) = self.publisher.publish(&event).await {
            tracing::error!(
                ?error,
                user.id = %user.user_id,
                %action,
                "could not publish user event, it is lost"
            );
        }
    }
}
