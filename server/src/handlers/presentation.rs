use actix_multipart::Multipart;
use actix_web::web::{self, HttpResponse};
use actix_web::{error, Responder, Result};
use futures_util::{StreamExt, TryStreamExt};

use system::serde_json::json;
use system::RoomId;

use crate::presentation::ConvertClient;
use crate::server::{ServerCommand, ServerTx};

pub fn configure_presentation_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/uploadPresentation").route(web::post().to(upload_presentation)));
}

struct Upload {
    room_id: RoomId,
    file_name: String,
    data: Vec<u8>,
}

/// Proxies the uploaded deck to the conversion service, stores the manifest
/// as the room's presentation state, fans it out to the room and returns it
/// to the uploader. A conversion failure leaves the room untouched.
async fn upload_presentation(
    payload: Multipart,
    srv_tx: web::Data<ServerTx>,
    convert: web::Data<ConvertClient>,
) -> Result<impl Responder> {
    let upload = parse_upload(payload).await?;
    let manifest = convert.convert(&upload.file_name, upload.data).await?;

    let mut srv_tx = srv_tx.get_ref().clone();
    srv_tx
        .send(ServerCommand::ApplyPresentation {
            room_id: upload.room_id,
            manifest: manifest.clone(),
        })
        .await
        .map_err(|_| error::ErrorInternalServerError("server loop is gone"))?;

    Ok(HttpResponse::Ok().json(json!({
        "slideUrls": manifest.slide_urls,
        "pdfUrl": manifest.pdf_url,
    })))
}

async fn parse_upload(mut payload: Multipart) -> Result<Upload> {
    let mut room_id: Option<RoomId> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(str::to_owned));
        match name.as_deref() {
            Some("roomId") => {
                room_id = Some(String::from_utf8_lossy(&read_field(&mut field).await?).into_owned());
            }
            Some("file") => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(str::to_owned))
                    .unwrap_or_else(|| "presentation".to_owned());
                file = Some((file_name, read_field(&mut field).await?));
            }
            _ => (),
        }
    }

    assemble_upload(room_id, file)
}

async fn read_field(field: &mut actix_multipart::Field) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        data.extend_from_slice(&chunk?);
    }
    Ok(data)
}

fn assemble_upload(room_id: Option<RoomId>, file: Option<(String, Vec<u8>)>) -> Result<Upload> {
    let room_id = room_id.ok_or_else(|| error::ErrorBadRequest("missing roomId field"))?;
    let (file_name, data) = file.ok_or_else(|| error::ErrorBadRequest("missing file field"))?;
    Ok(Upload {
        room_id,
        file_name,
        data,
    })
}
