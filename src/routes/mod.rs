pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

/// Registers the API routes under the scope this is configured on
/// (`/api` in the binary and in the integration tests).
///
/// The `/auth` scope is registered before the task routes so that
/// `/auth/...` paths never fall through to the `/{user_id}/tasks` patterns.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::me)
            .service(auth::refresh)
            .service(auth::logout),
    )
    .service(tasks::list_tasks)
    .service(tasks::create_task)
    .service(tasks::get_task)
    .service(tasks::update_task)
    .service(tasks::complete_task)
    .service(tasks::delete_task);
}
