use async_trait::async_trait;
use error_stack::Report;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::database::{self, Result};
use crate::events::{PublishError, UserEvent, UserEventPublisher};
use crate::schema::User;
use crate::store::{UserFilter, UserSortField, UserStore};
use crate::types::{Page, PageRequest, SortDirection};

/// [`UserStore`] backed by a map, enforcing the same unique
/// constraints as the `users` table.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<BTreeMap<Uuid, User>>,
    fail_writes: AtomicBool,
}

impl MemoryUserStore {
    /// Makes every following write fail as if the database went away.
    pub fn fail_writes(&self, value: bool) {
        self.fail_writes.store(value, AtomicOrdering::SeqCst);
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<User> {
        self.lock().get(&id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn put(&self, user: User) {
        self.lock().insert(user.user_id, user);
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Uuid, User>> {
        self.users
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(AtomicOrdering::SeqCst) {
            Err(Report::new(database::Error::Internal(sqlx::Error::PoolClosed)))
        } else {
            Ok(())
        }
    }

    fn check_unique(users: &BTreeMap<Uuid, User>, user: &User) -> Result<()> {
        let others = users.values().filter(|v| v.user_id != user.user_id);
        for other in others {
            if other.username == user.username {
                return Err(Report::new(database::Error::UniqueViolation(
                    "users_username_key".into(),
                )));
            }
            if other.email == user.email {
                return Err(Report::new(database::Error::UniqueViolation(
                    "users_email_key".into(),
                )));
            }
        }
        Ok(())
    }
}

fn compare(field: UserSortField, a: &User, b: &User) -> Ordering {
    match field {
        UserSortField::UserId => a.user_id.cmp(&b.user_id),
        UserSortField::Username => a.username.cmp(&b.username),
        UserSortField::Email => a.email.cmp(&b.email),
        UserSortField::FullName => a.full_name.cmp(&b.full_name),
        UserSortField::CreationDate => a.creation_date.cmp(&b.creation_date),
        UserSortField::LastUpdateDate => a.last_update_date.cmp(&b.last_update_date),
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        Ok(self.lock().values().any(|v| v.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.lock().values().any(|v| v.email == email))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_all(&self, filter: &UserFilter, request: &PageRequest) -> Result<Page<User>> {
        let field = UserSortField::resolve(request);
        let mut matched = self
            .lock()
            .values()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect::<Vec<_>>();

        matched.sort_by(|a, b| {
            let ordering = compare(field, a, b);
            let ordering = match request.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.user_id.cmp(&b.user_id))
        });

        let total = matched.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = matched
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn insert(&self, user: &User) -> Result<User> {
        self.check_writable()?;

        let mut users = self.lock();
        Self::check_unique(&users, user)?;
        users.insert(user.user_id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<Option<User>> {
        self.check_writable()?;

        let mut users = self.lock();
        if !users.contains_key(&user.user_id) {
            return Ok(None);
        }
        Self::check_unique(&users, user)?;
        users.insert(user.user_id, user.clone());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check_writable()?;
        Ok(self.lock().remove(&id).is_some())
    }
}

/// [`UserEventPublisher`] that keeps every event it accepted.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<UserEvent>>,
    fail: AtomicBool,
}

impl RecordingPublisher {
    /// Makes every following publication fail without recording it.
    pub fn fail_publishes(&self, value: bool) {
        self.fail.store(value, AtomicOrdering::SeqCst);
    }

    #[must_use]
    pub fn events(&self) -> Vec<UserEvent> {
        self.lock().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UserEvent>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl UserEventPublisher for RecordingPublisher {
    async fn publish(&self, event: &UserEvent) -> error_stack::Result<(), PublishError> {
        if self.fail.load(AtomicOrdering::SeqCst) {
            return Err(Report::new(PublishError).attach_printable("broker is unavailable"));
        }
        self.lock().push(event.clone());
        Ok(())
    }
}
