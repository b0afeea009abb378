use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;

use tasknest::auth::{AuthMiddleware, TokenService};
use tasknest::config::Config;
use tasknest::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    // The token settings are fixed here, once; nothing else reads them from
    // the environment.
    let token_service = web::Data::new(TokenService::new(
        &config.jwt_secret,
        config.token_ttl_minutes,
    ));

    info!("Starting TaskNest server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(token_service.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
