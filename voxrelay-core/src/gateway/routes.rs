use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{self, HeaderName};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::error::GatewayError;
use super::header::encode_phonetic;
use super::service::{GatewayRequest, SynthesisGateway};
use crate::catalog::VoiceCatalog;
use crate::synthesis::AUDIO_MPEG;

/// Paths accepted for synthesis. The second one is kept for front-ends that
/// address the vendor-specific route.
pub const SYNTHESIS_ROUTES: [&str; 2] = ["/api/text-to-speech", "/api/azure/text-to-speech"];

pub fn router(gateway: Arc<SynthesisGateway>) -> Router {
    let mut router = Router::new();
    for path in SYNTHESIS_ROUTES {
        router = router.route(path, post(synthesize));
    }

    router
        .route("/api/voices", get(list_voices))
        .route("/health", get(health))
        .with_state(gateway)
}

/// Serve the gateway until `shutdown` resolves
pub async fn serve<F>(
    listener: TcpListener,
    gateway: Arc<SynthesisGateway>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = ?listener.local_addr()?, "Synthesis gateway listening");
    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn synthesize(
    State(gateway): State<Arc<SynthesisGateway>>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let request: GatewayRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected malformed synthesis request");
        GatewayError::Validation(format!("Malformed request body: {e}"))
    })?;

    let result = gateway.synthesize(request).await?;
    let phonetic = encode_phonetic(result.phonetic.as_deref());

    let headers = [
        (header::CONTENT_TYPE, AUDIO_MPEG.to_string()),
        (HeaderName::from_static("x-pinyin"), phonetic),
    ];
    Ok((headers, result.audio).into_response())
}

async fn list_voices(State(gateway): State<Arc<SynthesisGateway>>) -> Json<VoiceCatalog> {
    Json(gateway.catalog().clone())
}

async fn health() -> &'static str {
    "ok"
}
