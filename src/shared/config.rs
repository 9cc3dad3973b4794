//! Application configuration. API credentials, paths.

use serde::Deserialize;

/// Directory where user-picked local images are stored. Fixed name; created
/// once at startup if absent. Files accumulate — cleanup is external.
pub const UPLOADS_DIR: &str = "uploads";

/// Directory where Drive downloads land. Same lifecycle as `UPLOADS_DIR`.
pub const DOWNLOADS_DIR: &str = "downloads";

/// Default Tesseract language set: Latin script + Arabic script.
pub const DEFAULT_OCR_LANGUAGES: &str = "eng+ara";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Gemini API key. Read from INVOICE_CHAT_AI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Gemini model id. Defaults to "gemini-1.5-flash". Read from INVOICE_CHAT_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Path to the Drive service-account JSON. Defaults to "credentials.json".
    /// Read from INVOICE_CHAT_CREDENTIALS_PATH.
    #[serde(default)]
    pub credentials_path: Option<String>,

    /// Tesseract language string (e.g. "eng+ara"). Read from INVOICE_CHAT_OCR_LANGUAGES.
    #[serde(default)]
    pub ocr_languages: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("INVOICE_CHAT"));
        if let Ok(path) = std::env::var("INVOICE_CHAT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let cfg: Self = c.build()?.try_deserialize()?;
        Ok(cfg)
    }

    /// Returns the Gemini API key if configured. Reads from config or INVOICE_CHAT_AI_API_KEY env.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| std::env::var("INVOICE_CHAT_AI_API_KEY").ok())
    }

    /// Returns the Gemini model id. Defaults to "gemini-1.5-flash".
    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .or_else(|| std::env::var("INVOICE_CHAT_AI_MODEL").ok())
            .unwrap_or_else(|| "gemini-1.5-flash".to_string())
    }

    /// Returns the service-account credential file path. Defaults to "credentials.json".
    pub fn credentials_path_or_default(&self) -> String {
        self.credentials_path
            .clone()
            .or_else(|| std::env::var("INVOICE_CHAT_CREDENTIALS_PATH").ok())
            .unwrap_or_else(|| "credentials.json".to_string())
    }

    /// Returns the OCR language string. Defaults to DEFAULT_OCR_LANGUAGES.
    pub fn ocr_languages_or_default(&self) -> String {
        self.ocr_languages
            .clone()
            .or_else(|| std::env::var("INVOICE_CHAT_OCR_LANGUAGES").ok())
            .unwrap_or_else(|| DEFAULT_OCR_LANGUAGES.to_string())
    }

    /// Returns true if the AI endpoint is configured (API key present).
    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key().is_some()
    }
}
