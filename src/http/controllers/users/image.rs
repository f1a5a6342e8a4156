use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use chrono::{SubsecRound, Utc};
use uuid::Uuid;
use validator::Validate;

use super::{find_user, USER_NOT_FOUND};
use crate::{http::Error, types, types::form::users::UpdateImage, App};

#[tracing::instrument(skip(app, form), name = "http.users.update_image")]
pub async fn update_image(
    app: web::Data<App>,
    path: web::Path<Uuid>,
    form: Json<UpdateImage>,
) -> Result<HttpResponse, Error> {
    tracing::debug!(?form, "PUT updateImage received");
    form.validate()?;

    let mut user = find_user(&app, path.into_inner()).await?;
    user.image_url = Some(form.into_inner().image_url);
    user.last_update_date = Utc::now().trunc_subsecs(6);

    let Some(user) = app.users.update_user(&user).await? else {
        return Err(types::Error::not_found(USER_NOT_FOUND).into());
    };

    tracing::info!("image updated successfully");
    Ok(HttpResponse::Ok().json(user))
}
