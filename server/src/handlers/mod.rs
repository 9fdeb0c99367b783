use actix_web::web;

use crate::connection::ws_index;
use crate::handlers::presentation::configure_presentation_handlers;
use crate::handlers::status::configure_status_handlers;

mod presentation;
mod status;

pub fn root(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws/").route(web::get().to(ws_index)));

    configure_presentation_handlers(cfg);
    configure_status_handlers(cfg);
}
