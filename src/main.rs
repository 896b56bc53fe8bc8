use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::{env, io, process};
use symbolize::gateway::{HttpGateway, InferenceGateway};
use symbolize::labels::ClassNames;
use symbolize::preprocess::Preprocessor;
use symbolize::server::{routes, AppState};
use symbolize::settings::{ServerSettings, Settings};
use symbolize::util::init_tracing;
use tracing::info;

const USAGE: &str = "usage: ./symbolize [config file]";

fn get_args() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        println!("{USAGE}");
        process::exit(1);
    }

    args.get(1).cloned()
}

fn main() -> Result<()> {
    let config_file = get_args();
    let settings = Settings::load(config_file.as_deref())?;
    init_tracing(&settings.log.filter);

    let classes = Arc::new(ClassNames::load(&settings.model.classes_path)?);
    let gateway: Arc<dyn InferenceGateway> = Arc::new(
        HttpGateway::from_settings(&settings.gateway)
            .context("failed to build inference gateway client")?,
    );
    info!(
        "forwarding {}x{} tensors to {} ({} classes)",
        settings.model.target_size,
        settings.model.target_size,
        gateway.endpoint(),
        classes.len()
    );

    let state = web::Data::new(AppState::new(
        Preprocessor::new(settings.model.target_size),
        classes,
        gateway,
        settings.model.top_k,
    ));

    // The blocking gateway client must be dropped outside the async runtime:
    // the runtime is started here instead of through #[actix_web::main], and
    // `state` keeps the last reference until it has shut down
    actix_web::rt::System::new()
        .block_on(serve(settings.server, state.clone()))
        .context("http server failed")?;
    Ok(())
}

async fn serve(server: ServerSettings, state: web::Data<AppState>) -> io::Result<()> {
    let cors = server.cors;
    let limit = server.max_payload_bytes;
    info!("listening on {}:{}", server.host, server.port);

    HttpServer::new(move || {
        let cors = if cors {
            Cors::permissive()
        } else {
            Cors::default()
        };

        App::new()
            .app_data(state.clone())
            .app_data(web::FormConfig::default().limit(limit))
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
