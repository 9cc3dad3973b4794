//! Wiring & DI. Entry point: bootstrap adapters, inject into the service, run UI.
//!
//! No business logic here; the pipeline lives in ChatService.

use dotenv::dotenv;
use invoice_chat::adapters::ai::{GeminiAdapter, MockAiAdapter};
use invoice_chat::adapters::storage::{DriveStorageAdapter, ServiceAccountKey};
use invoice_chat::adapters::ui::TuiInputPort;
use invoice_chat::domain::DomainError;
use invoice_chat::ports::{AiPort, InputPort, OcrPort, StorageGateway};
use invoice_chat::shared::config::{AppConfig, DOWNLOADS_DIR, UPLOADS_DIR};
use invoice_chat::usecases::{ensure_data_dirs, ChatService};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found"),
    }

    invoice_chat::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_default();

    // Explicit idempotent setup: both data directories exist before the
    // first interaction can write into them.
    let uploads = PathBuf::from(UPLOADS_DIR);
    let downloads = PathBuf::from(DOWNLOADS_DIR);
    ensure_data_dirs(&uploads, &downloads)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    // The resolver cannot serve remote mode without the service-account
    // file; fail loudly before the UI becomes interactive.
    let credentials_path = cfg.credentials_path_or_default();
    let key = ServiceAccountKey::from_file(Path::new(&credentials_path))
        .map_err(|e| anyhow::anyhow!("{} (set INVOICE_CHAT_CREDENTIALS_PATH)", e))?;
    let storage: Arc<dyn StorageGateway> =
        Arc::new(DriveStorageAdapter::new(key).map_err(|e| anyhow::anyhow!("{}", e))?);

    let ocr = build_ocr(&cfg).map_err(|e| anyhow::anyhow!("{}", e))?;

    let ai: Arc<dyn AiPort> = if cfg.is_ai_configured() {
        info!(model = %cfg.ai_model_or_default(), "Gemini answering enabled");
        Arc::new(GeminiAdapter::new(
            cfg.ai_api_key().unwrap_or_default(),
            cfg.ai_model_or_default(),
        ))
    } else {
        warn!("INVOICE_CHAT_AI_API_KEY not set, using mock AI adapter");
        Arc::new(MockAiAdapter::new())
    };

    let service = Arc::new(ChatService::new(storage, ocr, ai, uploads, downloads));
    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(service));

    input_port.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}

/// OCR engine selection: real Tesseract when built with the `tesseract`
/// feature, mock recognizer otherwise. Engine options are validated here so
/// a missing language pack fails at startup.
#[cfg(feature = "tesseract")]
fn build_ocr(cfg: &AppConfig) -> Result<Arc<dyn OcrPort>, DomainError> {
    use invoice_chat::adapters::ocr::TesseractOcr;
    let languages = cfg.ocr_languages_or_default();
    info!(%languages, "Tesseract OCR enabled");
    Ok(Arc::new(TesseractOcr::new(&languages)?))
}

#[cfg(not(feature = "tesseract"))]
fn build_ocr(_cfg: &AppConfig) -> Result<Arc<dyn OcrPort>, DomainError> {
    use invoice_chat::adapters::ocr::MockOcrAdapter;
    warn!("built without the `tesseract` feature, using mock OCR adapter");
    Ok(Arc::new(MockOcrAdapter::new()))
}
