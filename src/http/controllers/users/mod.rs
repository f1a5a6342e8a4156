use uuid::Uuid;

use crate::{http::Error, schema::User, types, App};

mod courses;
mod image;
mod list;
mod password;
mod profile;
mod register;

pub use courses::courses;
pub use image::update_image;
pub use list::list;
pub use password::update_password;
pub use profile::{delete, get, update};
pub use register::register;

pub(crate) const USER_NOT_FOUND: &str = "User not found";

/// Loads the user or fails with `404`.
pub(crate) async fn find_user(app: &App, user_id: Uuid) -> Result<User, Error> {
    match app.users.find_by_id(user_id).await? {
        Some(user) => Ok(user),
        None => {
            tracing::warn!(%user_id, "user not found");
            Err(types::Error::not_found(USER_NOT_FOUND).into())
        }
    }
}
