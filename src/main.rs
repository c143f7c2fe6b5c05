mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
mod response;

use actix_web::web::Data;
use actix_web::{App, HttpServer};
use config::Config;
use database::sqlx::PgSqlxManager;
use error::Error;
use impls::tokener::jwt::JWT;
use middlewares::session::Session;
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let secret = config.jwt_secret.clone().into_bytes();
    let bind = (config.bind_host.clone(), config.bind_port);
    let manager = Data::new(PgSqlxManager::new(pool));
    let tokener = Data::new(JWT::new(secret.clone()));
    let config = Data::new(config);
    log::info!("listening on {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .wrap(Session::<PgSqlxManager>::new(secret.clone()))
            .wrap(actix_web::middleware::Logger::default())
            .app_data(manager.clone())
            .app_data(tokener.clone())
            .app_data(config.clone())
            .configure(handlers::configure::<PgSqlxManager>)
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
