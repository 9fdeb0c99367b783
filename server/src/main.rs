use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer};

use server::config::Config;
use server::handlers;
use server::presentation::ConvertClient;
use server::server::spawn_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let convert = ConvertClient::new(
        config.convert_api_url.clone(),
        config.convert_api_key.clone(),
    );
    let srv_tx = spawn_server(Duration::from_secs(config.room_ttl_secs));

    log::info!("Listening on {}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .data(srv_tx.clone())
            .data(convert.clone())
            .configure(handlers::root)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
