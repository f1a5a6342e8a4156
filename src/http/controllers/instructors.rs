use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use chrono::{SubsecRound, Utc};

use super::users::{find_user, USER_NOT_FOUND};
use crate::{
    http::Error,
    types::{self, form::users::InstructorSubscription, UserType},
    App,
};

/// Promotes an existing user to [`UserType::Instructor`].
#[tracing::instrument(skip(app), name = "http.instructors.subscribe")]
pub async fn subscribe(
    app: web::Data<App>,
    form: Json<InstructorSubscription>,
) -> Result<HttpResponse, Error> {
    let mut user = find_user(&app, form.user_id).await?;
    user.user_type = UserType::Instructor;
    user.last_update_date = Utc::now().trunc_subsecs(6);

    let Some(user) = app.users.update_user(&user).await? else {
        return Err(types::Error::not_found(USER_NOT_FOUND).into());
    };

    tracing::info!(user.id = %user.user_id, "user subscribed as instructor");
    Ok(HttpResponse::Ok().json(user))
}
