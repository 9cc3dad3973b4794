//! Invoice chat pipeline: resolve source -> extract text -> compose -> answer.
//!
//! - Resolver writes uploaded bytes / downloads Drive files into fixed dirs
//! - Extractor joins OCR fragments in native scan order
//! - Blank questions never reach the AI endpoint
//! - Every stage failure aborts only the current interaction

use crate::domain::{DomainError, ImageSource, LocalImage, RemoteFile};
use crate::ports::{AiPort, OcrPort, StorageGateway};
use crate::usecases::prompt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Create the `uploads` and `downloads` directories if absent. Idempotent;
/// called once during startup before the UI becomes interactive.
pub async fn ensure_data_dirs(uploads: &Path, downloads: &Path) -> Result<(), DomainError> {
    for dir in [uploads, downloads] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DomainError::Io(format!("create {}: {}", dir.display(), e)))?;
    }
    Ok(())
}

/// Chat service. Coordinates storage, OCR, and AI ports for one interaction
/// at a time. Ports are constructed once at startup and shared.
pub struct ChatService {
    storage: Arc<dyn StorageGateway>,
    ocr: Arc<dyn OcrPort>,
    ai: Arc<dyn AiPort>,
    uploads_dir: PathBuf,
    downloads_dir: PathBuf,
}

impl ChatService {
    pub fn new(
        storage: Arc<dyn StorageGateway>,
        ocr: Arc<dyn OcrPort>,
        ai: Arc<dyn AiPort>,
        uploads_dir: PathBuf,
        downloads_dir: PathBuf,
    ) -> Self {
        Self {
            storage,
            ocr,
            ai,
            uploads_dir,
            downloads_dir,
        }
    }

    /// List files in a remote folder. Empty folder => empty vec (valid state,
    /// the UI shows nothing selectable).
    pub async fn list_remote_files(
        &self,
        folder_id: &str,
    ) -> Result<Vec<RemoteFile>, DomainError> {
        let files = self.storage.list_folder(folder_id).await?;
        info!(folder_id, count = files.len(), "listed remote folder");
        Ok(files)
    }

    /// Resolve an image source into a validated local file.
    ///
    /// Uploaded bytes are written verbatim under `uploads/` (same name
    /// overwrites silently, last write wins). Remote files must appear in a
    /// fresh listing of their folder before being stream-downloaded into
    /// `downloads/`. The resulting file is decode-validated: an unreadable or
    /// undecodable image fails the interaction with a clear diagnostic.
    pub async fn resolve(&self, source: ImageSource) -> Result<LocalImage, DomainError> {
        let path = match source {
            ImageSource::Uploaded { bytes, filename } => {
                // Strip any directory components from the client-supplied name.
                let name = Path::new(&filename)
                    .file_name()
                    .ok_or_else(|| DomainError::Input(format!("invalid filename: {filename}")))?;
                let dest = self.uploads_dir.join(name);
                tokio::fs::write(&dest, &bytes)
                    .await
                    .map_err(|e| DomainError::Io(format!("write {}: {}", dest.display(), e)))?;
                info!(path = %dest.display(), size = bytes.len(), "stored uploaded image");
                dest
            }
            ImageSource::Remote { folder_id, file } => {
                let listing = self.storage.list_folder(&folder_id).await?;
                if !listing.iter().any(|f| f.id == file.id) {
                    return Err(DomainError::Storage(format!(
                        "file '{}' ({}) not present in folder {} listing",
                        file.name, file.id, folder_id
                    )));
                }
                let dest = self.downloads_dir.join(&file.name);
                self.storage.download_file(&file.id, &dest).await?;
                info!(path = %dest.display(), file_id = %file.id, "downloaded remote image");
                dest
            }
        };

        let img = image::open(&path)
            .map_err(|e| DomainError::InvalidImage(format!("{}: {}", path.display(), e)))?;
        Ok(LocalImage {
            path,
            width: img.width(),
            height: img.height(),
        })
    }

    /// Run OCR over a resolved image and join the recognized fragments with
    /// single spaces, in the engine's native detection order, trimmed.
    ///
    /// Confidence scores and regions are discarded; no filtering. Zero
    /// detections yield an empty string, which is a valid result.
    pub async fn extract_text(&self, image: &LocalImage) -> Result<String, DomainError> {
        let detections = self.ocr.recognize(&image.path).await?;
        if detections.is_empty() {
            warn!(path = %image.path.display(), "no text recognized in image");
        }
        let text = detections
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        info!(
            path = %image.path.display(),
            fragments = detections.len(),
            chars = text.len(),
            "text extraction complete"
        );
        Ok(text)
    }

    /// Ask a question about the extracted text. A blank question is a silent
    /// no-op: `Ok(None)` without invoking the AI endpoint. Otherwise the
    /// composed prompt makes one full round trip — no caching, identical
    /// questions re-invoke the endpoint.
    pub async fn ask(
        &self,
        extracted_text: &str,
        question: &str,
    ) -> Result<Option<String>, DomainError> {
        if question.trim().is_empty() {
            return Ok(None);
        }
        let prompt = prompt::compose(extracted_text, question);
        let answer = self.ai.ask(&prompt).await?;
        Ok(Some(answer.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Region, TextDetection};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn detection(text: &str) -> TextDetection {
        TextDetection {
            region: Region {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    /// OCR stub returning preset fragments in order.
    struct StubOcr {
        fragments: Vec<String>,
    }

    #[async_trait::async_trait]
    impl crate::ports::OcrPort for StubOcr {
        async fn recognize(&self, _path: &Path) -> Result<Vec<TextDetection>, DomainError> {
            Ok(self.fragments.iter().map(|f| detection(f)).collect())
        }
    }

    /// AI stub counting invocations.
    struct CountingAi {
        calls: AtomicUsize,
        answer: String,
    }

    impl CountingAi {
        fn new(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                answer: answer.to_string(),
            })
        }
    }

    #[async_trait::async_trait]
    impl crate::ports::AiPort for CountingAi {
        async fn ask(&self, _prompt: &str) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    /// Storage stub with a fixed listing.
    struct StubStorage {
        files: Vec<RemoteFile>,
    }

    #[async_trait::async_trait]
    impl crate::ports::StorageGateway for StubStorage {
        async fn list_folder(&self, _folder_id: &str) -> Result<Vec<RemoteFile>, DomainError> {
            Ok(self.files.clone())
        }

        async fn download_file(&self, _file_id: &str, dest: &Path) -> Result<(), DomainError> {
            tokio::fs::write(dest, png_bytes())
                .await
                .map_err(|e| DomainError::Io(e.to_string()))
        }
    }

    /// A tiny valid PNG for decode-validation paths.
    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::new(2, 2);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn service_with(
        dir: &Path,
        storage: Arc<dyn StorageGateway>,
        ocr: Arc<dyn OcrPort>,
        ai: Arc<dyn AiPort>,
    ) -> ChatService {
        ChatService::new(
            storage,
            ocr,
            ai,
            dir.join("uploads"),
            dir.join("downloads"),
        )
    }

    fn default_service(dir: &Path, fragments: &[&str], ai: Arc<CountingAi>) -> ChatService {
        service_with(
            dir,
            Arc::new(StubStorage { files: Vec::new() }),
            Arc::new(StubOcr {
                fragments: fragments.iter().map(|s| s.to_string()).collect(),
            }),
            ai,
        )
    }

    #[tokio::test]
    async fn ensure_data_dirs_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let up = tmp.path().join("uploads");
        let down = tmp.path().join("downloads");
        ensure_data_dirs(&up, &down).await.unwrap();
        ensure_data_dirs(&up, &down).await.unwrap();
        assert!(up.is_dir());
        assert!(down.is_dir());
    }

    #[tokio::test]
    async fn uploaded_bytes_round_trip_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = default_service(tmp.path(), &[], CountingAi::new(""));
        ensure_data_dirs(&tmp.path().join("uploads"), &tmp.path().join("downloads"))
            .await
            .unwrap();

        let bytes = png_bytes();
        let local = svc
            .resolve(ImageSource::Uploaded {
                bytes: bytes.clone(),
                filename: "invoice.png".to_string(),
            })
            .await
            .unwrap();

        let stored = tokio::fs::read(&local.path).await.unwrap();
        assert_eq!(stored, bytes);
        assert_eq!(local.width, 2);
        assert_eq!(local.height, 2);
    }

    #[tokio::test]
    async fn upload_with_same_name_overwrites_silently() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = default_service(tmp.path(), &[], CountingAi::new(""));
        ensure_data_dirs(&tmp.path().join("uploads"), &tmp.path().join("downloads"))
            .await
            .unwrap();

        let first = png_bytes();
        let second = {
            let img = image::RgbImage::from_pixel(3, 3, image::Rgb([255, 0, 0]));
            let mut buf = std::io::Cursor::new(Vec::new());
            img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
            buf.into_inner()
        };
        assert_ne!(first, second);

        for bytes in [&first, &second] {
            svc.resolve(ImageSource::Uploaded {
                bytes: bytes.clone(),
                filename: "same.png".to_string(),
            })
            .await
            .unwrap();
        }

        let tail = tokio::fs::read(tmp.path().join("uploads").join("same.png"))
            .await
            .unwrap();
        assert_eq!(tail, second);
    }

    #[tokio::test]
    async fn undecodable_upload_fails_with_invalid_image() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = default_service(tmp.path(), &[], CountingAi::new(""));
        ensure_data_dirs(&tmp.path().join("uploads"), &tmp.path().join("downloads"))
            .await
            .unwrap();

        let err = svc
            .resolve(ImageSource::Uploaded {
                bytes: b"not an image at all".to_vec(),
                filename: "garbage.png".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn remote_file_must_be_present_in_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service_with(
            tmp.path(),
            Arc::new(StubStorage {
                files: vec![RemoteFile {
                    id: "abc".into(),
                    name: "a.png".into(),
                }],
            }),
            Arc::new(StubOcr { fragments: vec![] }),
            CountingAi::new(""),
        );

        let err = svc
            .resolve(ImageSource::Remote {
                folder_id: "folder1".into(),
                file: RemoteFile {
                    id: "missing".into(),
                    name: "b.png".into(),
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[tokio::test]
    async fn empty_folder_listing_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = default_service(tmp.path(), &[], CountingAi::new(""));
        let files = svc.list_remote_files("empty-folder").await.unwrap();
        assert_eq!(files.len(), 0);
    }

    #[tokio::test]
    async fn extract_joins_fragments_in_detection_order() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = default_service(
            tmp.path(),
            &["INVOICE", "#102", "TOTAL", "$45.00"],
            CountingAi::new(""),
        );
        let image = LocalImage {
            path: tmp.path().join("x.png"),
            width: 2,
            height: 2,
        };
        let text = svc.extract_text(&image).await.unwrap();
        assert_eq!(text, "INVOICE #102 TOTAL $45.00");
    }

    #[tokio::test]
    async fn extract_with_no_detections_yields_empty_string() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = default_service(tmp.path(), &[], CountingAi::new(""));
        let image = LocalImage {
            path: tmp.path().join("blank.png"),
            width: 2,
            height: 2,
        };
        let text = svc.extract_text(&image).await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn blank_question_never_invokes_the_ai() {
        let tmp = tempfile::tempdir().unwrap();
        let ai = CountingAi::new("ignored");
        let svc = default_service(tmp.path(), &[], Arc::clone(&ai));

        assert!(svc.ask("some text", "").await.unwrap().is_none());
        assert!(svc.ask("some text", "   \t ").await.unwrap().is_none());
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repeated_questions_are_not_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let ai = CountingAi::new("  The total is $45.00.  ");
        let svc = default_service(tmp.path(), &[], Arc::clone(&ai));

        for _ in 0..2 {
            let answer = svc
                .ask("INVOICE #102 TOTAL $45.00", "What is the total amount?")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(answer, "The total is $45.00.");
        }
        assert_eq!(ai.calls.load(Ordering::SeqCst), 2);
    }
}
