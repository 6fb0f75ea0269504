use std::sync::Arc;

use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use labeldesk_backend::api::{AdminApi, AuthApi, HealthApi};
use labeldesk_backend::app_data::AppData;
use labeldesk_backend::config::{init_logging, DatabaseConnections, Settings};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(settings.log_dir.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let connections = match DatabaseConnections::init(&settings).await {
        Ok(connections) => connections,
        Err(e) => {
            tracing::error!("Database connection failed: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = connections.migrate().await {
        tracing::error!("Database migration failed: {}", e);
        std::process::exit(1);
    }

    let app_data = match AppData::init(&settings, connections) {
        Ok(app_data) => Arc::new(app_data),
        Err(e) => {
            tracing::error!("Application wiring failed: {}", e);
            std::process::exit(1);
        }
    };

    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(app_data.clone()),
            AdminApi::new(app_data.clone()),
        ),
        "LabelDesk Backend",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}:{}/api", settings.host, settings.port));

    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    let bind_addr = format!("{}:{}", settings.host, settings.port);
    tracing::info!("Starting server on http://{}", bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger", bind_addr);

    Server::new(TcpListener::bind(bind_addr)).run(app).await
}
