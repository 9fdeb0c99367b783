use actix_web::web::{self, HttpResponse};
use actix_web::{error, Responder, Result};
use tokio::sync::oneshot;

use crate::server::{ServerCommand, ServerTx};

pub fn configure_status_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/status").route(web::get().to(status)));
}

async fn status(srv_tx: web::Data<ServerTx>) -> Result<impl Responder> {
    let (tx, rx) = oneshot::channel();
    let mut srv_tx = srv_tx.get_ref().clone();
    srv_tx
        .send(ServerCommand::DescribeRooms { tx })
        .await
        .map_err(|_| error::ErrorInternalServerError("server loop is gone"))?;
    let rooms = rx
        .await
        .map_err(|_| error::ErrorInternalServerError("server loop dropped the request"))?;
    Ok(HttpResponse::Ok().json(rooms))
}
