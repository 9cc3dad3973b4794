//! Implements StorageGateway using the Google Drive v3 REST API.
//!
//! Authenticates with a service-account JWT grant (full Drive scope). The
//! access token is cached until near expiry so repeated listings within one
//! session don't re-run the grant.

use crate::adapters::storage::credentials::ServiceAccountKey;
use crate::domain::{DomainError, RemoteFile};
use crate::ports::StorageGateway;
use async_trait::async_trait;
use futures_util::StreamExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_LEEWAY: Duration = Duration::from_secs(60);

/// JWT-bearer grant claims (RFC 7523 as Google applies it).
#[derive(Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: SystemTime,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Deserialize)]
struct FileEntry {
    id: String,
    name: String,
}

/// Google Drive gateway adapter.
pub struct DriveStorageAdapter {
    client: reqwest::Client,
    key: ServiceAccountKey,
    /// Cache the access token so each interaction doesn't redo the grant.
    token_cache: Mutex<Option<CachedToken>>,
}

impl DriveStorageAdapter {
    /// Create the adapter from an already-validated service-account key.
    /// The signing key is checked here so a broken `private_key` field fails
    /// at startup, not on the first listing.
    pub fn new(key: ServiceAccountKey) -> Result<Self, DomainError> {
        EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            DomainError::Credentials(format!("invalid service-account private key: {}", e))
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            key,
            token_cache: Mutex::new(None),
        })
    }

    /// Return a valid access token, running the JWT grant if the cached one
    /// is absent or about to expire.
    async fn access_token(&self) -> Result<String, DomainError> {
        let mut cache = self.token_cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if SystemTime::now() + EXPIRY_LEEWAY < cached.expires_at {
                return Ok(cached.token.clone());
            }
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let claims = GrantClaims {
            iss: &self.key.client_email,
            scope: DRIVE_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + 3600,
        };

        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| DomainError::Credentials(format!("invalid private key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| DomainError::Credentials(format!("JWT signing failed: {}", e)))?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::Storage(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "token endpoint returned error");
            return Err(DomainError::Storage(format!(
                "token exchange error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Storage(format!("parse token response: {}", e)))?;

        debug!(expires_in = token.expires_in, "obtained Drive access token");

        let expires_at = SystemTime::now() + Duration::from_secs(token.expires_in);
        let access = token.access_token.clone();
        *cache = Some(CachedToken {
            token: token.access_token,
            expires_at,
        });
        Ok(access)
    }
}

#[async_trait]
impl StorageGateway for DriveStorageAdapter {
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<RemoteFile>, DomainError> {
        let token = self.access_token().await?;
        let query = format!("'{}' in parents", folder_id);

        let response = self
            .client
            .get(DRIVE_FILES_URL)
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("spaces", "drive"),
                ("fields", "files(id, name)"),
            ])
            .send()
            .await
            .map_err(|e| DomainError::Storage(format!("list request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DomainError::Storage(format!(
                "Drive list error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let listing: ListResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Storage(format!("parse listing: {}", e)))?;

        Ok(listing
            .files
            .into_iter()
            .map(|f| RemoteFile {
                id: f.id,
                name: f.name,
            })
            .collect())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), DomainError> {
        let token = self.access_token().await?;
        let url = format!("{}/{}", DRIVE_FILES_URL, file_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| DomainError::Storage(format!("download request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DomainError::Storage(format!(
                "Drive download error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| DomainError::Io(format!("create {}: {}", dest.display(), e)))?;

        // Loop until the transfer reports completion. A failed chunk aborts
        // the interaction; there is no retry.
        let mut written = 0usize;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| DomainError::Storage(format!("chunk download failed: {}", e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DomainError::Io(format!("write {}: {}", dest.display(), e)))?;
            written += chunk.len();
        }
        file.flush()
            .await
            .map_err(|e| DomainError::Io(format!("flush {}: {}", dest.display(), e)))?;

        info!(file_id, path = %dest.display(), bytes = written, "download complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_with_files() {
        let json = r#"{ "files": [ { "id": "1aB", "name": "invoice.png" } ] }"#;
        let parsed: ListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.files.len(), 1);
        assert_eq!(parsed.files[0].name, "invoice.png");
    }

    #[test]
    fn empty_folder_listing_deserializes_to_empty_vec() {
        // Drive omits "files" entirely for folders with no children.
        let parsed: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.files.is_empty());
    }

    #[test]
    fn grant_claims_serialize_shape() {
        let claims = GrantClaims {
            iss: "svc@project.iam.gserviceaccount.com",
            scope: DRIVE_SCOPE,
            aud: "https://oauth2.googleapis.com/token",
            iat: 1000,
            exp: 4600,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["scope"], DRIVE_SCOPE);
        assert_eq!(json["exp"], 4600);
    }
}
