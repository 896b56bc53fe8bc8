//! HTTP routes. Preprocessing and the gateway round-trip are synchronous,
//! so they run on the blocking thread pool.

use super::protocol::{PredictForm, PredictResponse};
use super::{AppState, WebError};
use actix_web::{get, post, web, Responder};
use tracing::{debug, info, warn};

type Result<T> = std::result::Result<T, WebError>;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(predict).service(status);
}

#[post("/predict")]
pub async fn predict(
    form: web::Form<PredictForm>,
    state: web::Data<AppState>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    debug!("got prediction request {form:?}");

    let labels = web::block(move || state.classify(&form.image))
        .await?
        .map_err(|e| {
            warn!("prediction failed: {e}");
            e
        })?;

    info!("finished serving prediction request: {labels:?}");
    Ok(web::Json(PredictResponse { result: labels }))
}

/// What the server is configured to serve
#[get("/status")]
pub async fn status(state: web::Data<AppState>) -> impl Responder {
    web::Json(state.status())
}
