use std::{error::Error, sync::Arc};

use axum::{
    extract::Request,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    ServiceExt,
};
use jsonwebtoken::{DecodingKey, EncodingKey};
use tokio::{fs, net, task};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{
    layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};

use cinema_backend::{db, http, mail, spoiler, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = fs::read_to_string("config.toml").await?;
    let config = toml::from_str::<Config>(&config)?;

    let (db_client, db_connection) = db::connect(config.db).await?;

    task::spawn(async move {
        if let Err(e) = db_connection.await {
            panic!("database connection failed: {e}");
        }
    });

    let origins = config
        .http
        .cors
        .allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(origins);

    let mailer =
        mail::TicketMailer::new(config.mail).map_err(|e| e.to_string())?;
    let spoiler_threshold = config.spoiler.threshold;

    let app = http::router(Arc::new(http::AppState {
        db_client,
        jwt_expiration_time: config.jwt.expiration_time,
        jwt_decoding_key: DecodingKey::from_secret(
            config.jwt.secret.as_bytes(),
        ),
        jwt_encoding_key: EncodingKey::from_secret(
            config.jwt.secret.as_bytes(),
        ),
        classifier: Box::new(spoiler::HttpClassifier::new(config.spoiler)),
        spoiler_threshold,
        mailer,
    }))
    .layer(cors);
    let app = http::trim_trailing_slash(app);

    let listener = net::TcpListener::bind(config.http.server.addr).await?;
    tracing::info!(addr = %config.http.server.addr, "listening");
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await?;

    Ok(())
}
