use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use chrono::{SubsecRound, Utc};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{find_user, USER_NOT_FOUND};
use crate::{http::Error, types, types::form::users::UpdatePassword, App};

/// Replaces the password after checking the old one. Publishes nothing.
#[tracing::instrument(skip(app, form), name = "http.users.update_password")]
pub async fn update_password(
    app: web::Data<App>,
    path: web::Path<Uuid>,
    form: Json<UpdatePassword>,
) -> Result<HttpResponse, Error> {
    tracing::debug!("PUT updatePassword received");
    form.validate()?;

    let mut user = find_user(&app, path.into_inner()).await?;
    let form = form.into_inner();
    if user.password != form.old_password {
        tracing::warn!("mismatched old password");
        return Err(types::Error::conflict("Error: Mismatched old password").into());
    }

    user.password = form.password;
    user.last_update_date = Utc::now().trunc_subsecs(6);

    if app.users.update_password(&user).await?.is_none() {
        return Err(types::Error::not_found(USER_NOT_FOUND).into());
    }

    tracing::info!("password updated successfully");
    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}
