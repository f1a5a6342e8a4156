use actix_web::web;

pub mod instructors;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/signup", web::post().to(users::register))
        .route("/users", web::get().to(users::list))
        .service(
            web::resource("/users/{userId}")
                .name("user")
                .route(web::get().to(users::get))
                .route(web::put().to(users::update))
                .route(web::delete().to(users::delete)),
        )
        .route("/users/{userId}/password", web::put().to(users::update_password))
        .route("/users/{userId}/image", web::put().to(users::update_image))
        .route("/users/{userId}/courses", web::get().to(users::courses))
        .route(
            "/instructors/subscription",
            web::post().to(instructors::subscribe),
        );
}
