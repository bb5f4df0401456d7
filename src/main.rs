use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::{Duration, Utc};
use log::{info, warn};
use sqlx::PgPool;
use std::io;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use todoflow::auth::{PasswordHasher, TokenIssuer};
use todoflow::config::Config;
use todoflow::mail::{HttpEmailSender, LogEmailSender};
use todoflow::models::EmailSender;
use todoflow::routes::{self, health};
use todoflow::store::{DocumentContext, DocumentUserManager};
use todoflow::{build_dispatch, time, Dependencies};

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    time::init(Utc::now);

    let config = Config::from_env().map_err(startup_error)?;

    let context = match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url).await.map_err(startup_error)?;
            DocumentContext::postgres(pool).await.map_err(startup_error)?
        }
        None => {
            warn!("DATABASE_URL is not set; data is kept in memory");
            DocumentContext::in_memory()
        }
    };

    let clients = Arc::new(context.client_store());
    if clients
        .seed_default_client(&CancellationToken::new())
        .await
        .map_err(startup_error)?
    {
        info!("Seeded the default web client");
    }

    let users = Arc::new(DocumentUserManager::new(
        context.users.clone(),
        PasswordHasher::new(config.bcrypt_cost),
        TokenIssuer::new(&config.token_secret, Duration::hours(config.token_ttl_hours)),
    ));

    let email: Arc<dyn EmailSender> = match config.mail.clone() {
        Some(settings) => Arc::new(HttpEmailSender::new(settings).map_err(startup_error)?),
        None => {
            warn!("Mail settings are incomplete; account emails are only logged");
            Arc::new(LogEmailSender)
        }
    };

    let todos = Arc::new(context.todo_store());
    let dispatch = build_dispatch(Dependencies {
        todo_finder: todos.clone(),
        todo_repository: todos,
        clients,
        users,
        email,
    })
    .map_err(startup_error)?;
    let dispatch = web::Data::new(dispatch);

    info!("Starting Todoflow server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(dispatch.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
