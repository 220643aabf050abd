use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use async_openai::{config::OpenAIConfig, Client};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod classifier;
mod config;
mod engine;
mod errors;
mod middleware;
mod models;
mod prompts;
mod routes;
mod types;
mod ws;

pub use config::AppConfig;

pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub llm_client: Client<OpenAIConfig>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(AppConfig::from_env()?);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let llm_client = Client::with_config(
        OpenAIConfig::new()
            .with_api_key(config.provider_api_key.clone())
            .with_api_base(config.provider_api_base.clone()),
    );

    let state = Arc::new(AppState {
        pool,
        config,
        llm_client,
    });
    let bind_addr = state.config.bind_addr.clone();

    info!("Listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .service(
                web::scope("/auth")
                    .service(routes::auth::register)
                    .service(routes::auth::login)
                    .service(routes::auth::logout)
                    .service(
                        web::scope("")
                            .wrap(middleware::auth::Authentication {
                                app_config: state.config.clone(),
                            })
                            .service(routes::auth::update_profile)
                            .service(routes::auth::reset_password)
                            .service(routes::auth::delete_account),
                    ),
            )
            .service(
                web::scope("/chat")
                    .wrap(middleware::auth::Authentication {
                        app_config: state.config.clone(),
                    })
                    .service(routes::chat::send_message)
                    .service(routes::chat::new_chat)
                    .service(routes::chat::history)
                    .service(routes::chat::messages),
            )
            .service(ws::connect)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
