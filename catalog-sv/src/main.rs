extern crate env_logger;
extern crate log;

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware};
use actix_web::web::Data;
use log::info;

use crate::config::{Config, StoreBackend};
use crate::db::{MovieStore, StoreHandle};
use crate::db::memory::InMemoryStore;
use crate::db::mongo::MongoStore;

mod api;
mod config;
mod core;
mod db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG",
      format!("{}actix_web=debug", std::env::var("RUST_LOG")
          .map_or_else(|_| "".to_string(), |ll| format!("{},", ll))
      ));
    env_logger::init();

    let cfg = Config::from_env().expect("Invalid configuration");

    let store: StoreHandle = match cfg.store {
        StoreBackend::Mongo => Arc::new(
            MongoStore::connect(&cfg.database_url, &cfg.database_name, &cfg.collection)
                .await
                .expect("Couldn't connect to database")
        ),
        StoreBackend::Memory => {
            info!("using in-memory movie store");
            Arc::new(InMemoryStore::new())
        }
    };

    let data: Data<dyn MovieStore> = Data::from(store.clone());

    info!("Starting server at: {}", &cfg.bind);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(&cfg.bind)?
    .client_request_timeout(cfg.read_timeout)
    .client_disconnect_timeout(cfg.write_timeout)
    .run()
    .await?;

    info!("server stopped");
    store.close().await;
    Ok(())
}
