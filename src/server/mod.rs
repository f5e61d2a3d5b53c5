//! HTTP surface of the sentiment service.
//!
//! | route                 | purpose                                   |
//! |-----------------------|-------------------------------------------|
//! | `GET /`               | service metadata                          |
//! | `GET /health`         | readiness (`model_loaded`)                |
//! | `POST /analyze`       | score one text                            |
//! | `POST /analyze/batch` | score up to 100 texts, in order           |
//! | `GET /examples`       | sample reviews per sentiment level        |
//! | `GET /sentiment-scale`| the 7-point scale with labels and emojis  |

pub mod catalog;
pub mod error;
pub mod routes;
pub mod state;

pub use catalog::ExampleCatalog;
pub use error::{ApiError, ErrorBody};
pub use routes::{router, BatchTextInput, HealthCheck, ServiceInfo, TextInput};
pub use state::{AppState, ModelState};

use crate::core::ModelConfig;
use crate::pipelines::SentimentAnalysisPipelineBuilder;
use tokio::net::TcpListener;

/// Loads the model once. A failure is logged and yields an uninitialized
/// state so the service can still come up and report itself degraded.
pub async fn load_state(config: ModelConfig) -> AppState {
    let model_id = config.model_id.clone();
    match SentimentAnalysisPipelineBuilder::new(config).build().await {
        Ok(pipeline) => AppState::ready(pipeline),
        Err(e) => {
            tracing::error!(model = %model_id, error = %e, "failed to load sentiment model");
            AppState::uninitialized(Some(e.to_string()))
        }
    }
}

/// Serves the router on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, model_loaded = state.is_ready(), "listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
