#![forbid(unsafe_code)]

mod config;
mod router;

use std::{net::SocketAddr, sync::Arc};

use diesel_async::pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager};
use dotenvy::dotenv;
use listenfd::ListenFd;
use redis::aio::ConnectionManager;
use web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let mut listenfd = ListenFd::from_env();

    let tcp_socket: Option<std::net::TcpListener> = match listenfd.take_tcp_listener(0) {
        Ok(socket) => socket,
        Err(_) => None,
    };

    let config = config::process_config()?;

    let manager = AsyncDieselConnectionManager::<diesel_async::AsyncPgConnection>::new(
        config.database.uri.clone(),
    );
    let db_pool = Pool::builder(manager).build()?;
    let mut connection = db_pool.get().await?;

    db::migrations::run_migrations(&mut connection).await?; // run all pending migrations
    drop(connection);

    let redis_client = redis::Client::open(config.redis.uri.clone())?;
    let state = Arc::new(AppState {
        db_pool,
        redis: ConnectionManager::new(redis_client).await?,
        config,
    });

    let app = router::app(Arc::clone(&state));

    match tcp_socket {
        // cargo-watch thing
        Some(listener) => {
            axum::Server::from_tcp(listener)?
                .serve(app.into_make_service())
                .await?
        }
        None => {
            let addr: SocketAddr =
                format!("{}:{}", state.config.web.host, state.config.web.port).parse()?;
            axum::Server::bind(&addr)
                .serve(app.into_make_service())
                .await?
        }
    };

    Ok(())
}
