use actix_web::{web, HttpResponse};
use uuid::Uuid;

use super::find_user;
use crate::{http::Error, types::page::PageQuery, App};

const DEFAULT_SORT: &str = "courseId";

/// Courses the user owns. An unreachable course service yields an
/// empty page, never an error.
#[tracing::instrument(skip(app), name = "http.users.courses")]
pub async fn courses(
    app: web::Data<App>,
    path: web::Path<Uuid>,
    page: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
    let user = find_user(&app, path.into_inner()).await?;
    let request = page.into_inner().into_request(DEFAULT_SORT);

    let courses = app
        .courses
        .get_all_courses_by_user(user.user_id, &request)
        .await;

    Ok(HttpResponse::Ok().json(courses))
}
