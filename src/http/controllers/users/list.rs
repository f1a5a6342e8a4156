use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::{
    http::Error,
    schema::User,
    store::{UserFilter, UserSortField},
    types::{self, page::PageQuery},
    App,
};

#[derive(Debug, Serialize)]
pub struct Link {
    pub rel: &'static str,
    pub href: String,
}

/// A listed user along with the link to its own resource.
#[derive(Debug, Serialize)]
pub struct UserResource {
    #[serde(flatten)]
    pub user: User,
    pub links: Vec<Link>,
}

#[tracing::instrument(skip(app, req), name = "http.users.list")]
pub async fn list(
    app: web::Data<App>,
    req: HttpRequest,
    filter: web::Query<UserFilter>,
    page: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
    let request = page.into_inner().into_request(UserSortField::DEFAULT_PROPERTY);
    if UserSortField::from_property(&request.sort.property).is_none() {
        return Err(types::Error::invalid_request(format!(
            "Cannot sort users by {:?}",
            request.sort.property
        ))
        .into());
    }

    let page = app.users.find_all(&filter, &request).await?;
    let page = page.map(|user| {
        let links = req
            .url_for("user", [user.user_id.to_string()])
            .map(|href| Link {
                rel: "self",
                href: href.to_string(),
            })
            .into_iter()
            .collect();

        UserResource { user, links }
    });

    Ok(HttpResponse::Ok().json(page))
}
