use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use chrono::{SubsecRound, Utc};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{find_user, USER_NOT_FOUND};
use crate::{http::Error, types, types::form::users::UpdateUser, App};

#[tracing::instrument(skip(app), name = "http.users.get")]
pub async fn get(app: web::Data<App>, path: web::Path<Uuid>) -> Result<HttpResponse, Error> {
    let user = find_user(&app, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(skip(app), name = "http.users.delete")]
pub async fn delete(app: web::Data<App>, path: web::Path<Uuid>) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();
    tracing::debug!("DELETE deleteUser received");

    let user = find_user(&app, user_id).await?;
    if !app.users.delete_user(&user).await? {
        return Err(types::Error::not_found(USER_NOT_FOUND).into());
    }

    tracing::info!("user deleted successfully");
    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}

#[tracing::instrument(skip(app, form), name = "http.users.update")]
pub async fn update(
    app: web::Data<App>,
    path: web::Path<Uuid>,
    form: Json<UpdateUser>,
) -> Result<HttpResponse, Error> {
    tracing::debug!(?form, "PUT updateUser received");
    form.validate()?;

    let mut user = find_user(&app, path.into_inner()).await?;
    let form = form.into_inner();
    user.full_name = form.full_name;
    user.phone_number = form.phone_number;
    user.national_id = form.national_id;
    user.last_update_date = Utc::now().trunc_subsecs(6);

    let Some(user) = app.users.update_user(&user).await? else {
        return Err(types::Error::not_found(USER_NOT_FOUND).into());
    };

    tracing::info!("user updated successfully");
    Ok(HttpResponse::Ok().json(user))
}
