//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Two modes: chat about a local image, or about a file picked from a Google
//! Drive folder. Each expensive stage runs behind an explicit prompt
//! submission; stage failures print an error and drop back to the menu.

use crate::domain::{DomainError, ImageSource, LocalImage};
use crate::usecases::ChatService;
use async_trait::async_trait;
use indicatif::ProgressBar;
use inquire::{Confirm, InquireError, Select, Text};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const MENU_LOCAL: &str = "Chat with a local invoice image";
const MENU_DRIVE: &str = "Chat with a Google Drive file";
const MENU_QUIT: &str = "Quit";

/// Image types accepted from the local-file prompt, by extension.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

fn is_supported_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Map an inquire result into `Ok(None)` on Esc/Ctrl-C (back to menu) and a
/// DomainError on real prompt failures.
fn prompt_or_back<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// TUI adapter. Inquire prompts over the chat service.
pub struct TuiInputPort {
    service: Arc<ChatService>,
}

impl TuiInputPort {
    pub fn new(service: Arc<ChatService>) -> Self {
        Self { service }
    }

    async fn run_local_flow(&self) -> Result<(), DomainError> {
        let Some(input) = prompt_or_back(
            Text::new("Path to an invoice image (jpg/jpeg/png):").prompt(),
        )?
        else {
            return Ok(());
        };
        let input = input.trim().to_string();
        if input.is_empty() {
            return Ok(());
        }
        if !is_supported_image(&input) {
            return Err(DomainError::Input(format!(
                "unsupported file type (expected one of: {})",
                SUPPORTED_EXTENSIONS.join(", ")
            )));
        }

        let bytes = tokio::fs::read(&input)
            .await
            .map_err(|e| DomainError::Io(format!("read {}: {}", input, e)))?;
        let filename = Path::new(&input)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DomainError::Input(format!("invalid path: {input}")))?
            .to_string();

        let pb = spinner("Storing image...");
        let image = self
            .service
            .resolve(ImageSource::Uploaded { bytes, filename })
            .await;
        pb.finish_and_clear();
        let image = image?;

        self.show_image(&image);
        self.chat_about(&image).await
    }

    async fn run_drive_flow(&self) -> Result<(), DomainError> {
        let Some(folder_id) = prompt_or_back(Text::new("Google Drive folder ID:").prompt())? else {
            return Ok(());
        };
        let folder_id = folder_id.trim().to_string();
        if folder_id.is_empty() {
            return Ok(());
        }

        let pb = spinner("Listing folder...");
        let files = self.service.list_remote_files(&folder_id).await;
        pb.finish_and_clear();
        let files = files?;

        // Empty folder is a valid terminal state, not an error.
        if files.is_empty() {
            println!("No files found in this folder.");
            return Ok(());
        }

        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        let Some(picked) = prompt_or_back(Select::new("Select a file", names).prompt())? else {
            return Ok(());
        };
        let file = files
            .iter()
            .find(|f| f.name == picked)
            .cloned()
            .ok_or_else(|| DomainError::Input(format!("selected file '{picked}' not in list")))?;

        let Some(confirmed) = prompt_or_back(
            Confirm::new("Process the selected file?")
                .with_default(true)
                .prompt(),
        )?
        else {
            return Ok(());
        };
        if !confirmed {
            return Ok(());
        }

        let pb = spinner("Downloading file...");
        let image = self
            .service
            .resolve(ImageSource::Remote { folder_id, file })
            .await;
        pb.finish_and_clear();
        let image = image?;

        self.show_image(&image);
        self.chat_about(&image).await
    }

    fn show_image(&self, image: &LocalImage) {
        println!(
            "Image ready: {} ({}x{})",
            image.path.display(),
            image.width,
            image.height
        );
    }

    /// Extract text, display it, then run the question loop. Answer-stage
    /// failures are printed and leave the loop ready for another attempt;
    /// the extracted text stays on screen.
    async fn chat_about(&self, image: &LocalImage) -> Result<(), DomainError> {
        let pb = spinner("Recognizing text...");
        let text = self.service.extract_text(image).await;
        pb.finish_and_clear();
        let text = text?;

        println!("\nExtracted text:");
        if text.is_empty() {
            println!("(no text recognized)");
        } else {
            println!("{text}");
        }
        println!();

        loop {
            let Some(question) = prompt_or_back(
                Text::new("Ask a question about the invoice (empty to finish):").prompt(),
            )?
            else {
                return Ok(());
            };
            if question.trim().is_empty() {
                return Ok(());
            }

            let pb = spinner("Asking Gemini...");
            let answer = self.service.ask(&text, &question).await;
            pb.finish_and_clear();

            match answer {
                Ok(Some(answer)) => println!("\n{answer}\n"),
                Ok(None) => {}
                Err(e) => eprintln!("Error: {e}"),
            }
        }
    }
}

#[async_trait]
impl crate::ports::InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = prompt_or_back(
                Select::new(
                    "What would you like to do?",
                    vec![MENU_LOCAL, MENU_DRIVE, MENU_QUIT],
                )
                .prompt(),
            )?;

            let result = match choice {
                Some(MENU_LOCAL) => self.run_local_flow().await,
                Some(MENU_DRIVE) => self.run_drive_flow().await,
                _ => return Ok(()),
            };

            // Interaction-scoped failure: report and keep the menu alive.
            if let Err(e) = result {
                eprintln!("Error: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_extensions() {
        assert!(is_supported_image("invoice.png"));
        assert!(is_supported_image("scan.JPG"));
        assert!(is_supported_image("dir/photo.jpeg"));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_supported_image("invoice.pdf"));
        assert!(!is_supported_image("archive.tar.gz"));
        assert!(!is_supported_image("noextension"));
    }
}
