use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use chrono::{SubsecRound, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    http::Error,
    schema::User,
    types::{self, form::users::Register, UserStatus, UserType},
    App,
};

#[tracing::instrument(skip_all, fields(username = %form.username), name = "http.users.register")]
pub async fn register(app: web::Data<App>, form: Json<Register>) -> Result<HttpResponse, Error> {
    tracing::debug!(?form, "POST registerUser received");
    form.validate()?;

    if app.users.exists_by_username(&form.username).await? {
        tracing::warn!("username is already taken");
        return Err(types::Error::conflict("Error: Username is already taken.").into());
    }

    if app.users.exists_by_email(&form.email).await? {
        tracing::warn!("email is already taken");
        return Err(types::Error::conflict("Error: Email is already taken.").into());
    }

    // Postgres keeps microseconds
    let now = Utc::now().trunc_subsecs(6);
    let form = form.into_inner();
    let user = User {
        user_id: Uuid::new_v4(),
        username: form.username,
        email: form.email,
        password: form.password,
        full_name: form.full_name,
        user_status: UserStatus::Active,
        user_type: UserType::Student,
        phone_number: form.phone_number,
        national_id: form.national_id,
        image_url: None,
        creation_date: now,
        last_update_date: now,
    };

    let user = app.users.save_user(&user).await?;
    tracing::info!(user.id = %user.user_id, "user saved successfully");

    Ok(HttpResponse::Created().json(user))
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    use crate::events::ActionType;
    use crate::test_utils::{self, users};

    fn signup(body: &serde_json::Value) -> actix_web::test::TestRequest {
        test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(body)
    }

    fn body() -> serde_json::Value {
        json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "s3cret!",
            "fullName": "Carol Danvers",
            "phoneNumber": "555-0199",
        })
    }

    #[actix_web::test]
    async fn creates_active_student() {
        let (app, ctx) = test_utils::build_test_app();
        let service = test_utils::init_http_service!(app);

        let resp = test::call_service(&service, signup(&body()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let user: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(user["username"], "carol");
        assert_eq!(user["userStatus"], "ACTIVE");
        assert_eq!(user["userType"], "STUDENT");
        assert_eq!(user["creationDate"], user["lastUpdateDate"]);
        assert!(user.get("password").is_none());

        let events = ctx.publisher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action_type, Some(ActionType::Create));
        assert_eq!(ctx.store.len(), 1);
    }

    #[actix_web::test]
    async fn rejects_taken_username() {
        let (app, ctx) = test_utils::build_test_app();
        ctx.insert(users::alice());
        let service = test_utils::init_http_service!(app);

        let mut body = body();
        body["username"] = json!("alice");

        let resp = test::call_service(&service, signup(&body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let error: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            error,
            json!({ "type": "conflict", "message": "Error: Username is already taken." })
        );
        assert_eq!(ctx.store.len(), 1);
        assert_eq!(ctx.publisher.count(), 0);
    }

    #[actix_web::test]
    async fn rejects_taken_email() {
        let (app, ctx) = test_utils::build_test_app();
        ctx.insert(users::alice());
        let service = test_utils::init_http_service!(app);

        let mut body = body();
        body["email"] = json!("alice@example.com");

        let resp = test::call_service(&service, signup(&body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(ctx.store.len(), 1);
    }

    #[actix_web::test]
    async fn rejects_invalid_form() {
        let (app, ctx) = test_utils::build_test_app();
        let service = test_utils::init_http_service!(app);

        let mut body = body();
        body["username"] = json!("abc");
        body["password"] = json!("123");

        let resp = test::call_service(&service, signup(&body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(error["type"], "invalid_form_body");
        assert!(error["errors"].get("username").is_some());
        assert!(error["errors"].get("password").is_some());
        assert_eq!(ctx.store.len(), 0);
    }

    #[actix_web::test]
    async fn rejects_malformed_json() {
        let (app, _) = test_utils::build_test_app();
        let service = test_utils::init_http_service!(app);

        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"username\":")
            .to_request();

        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(error["type"], "invalid_request");
    }
}
