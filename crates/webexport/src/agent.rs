//! The content-side agent: one per page.

use serde_json::Value;
use tracing::{debug, warn};
use webexport_dom::Node;
use webexport_markdown::MarkdownService;

use crate::config::{ExportConfig, ExportFormat};
use crate::error::{ExportError, Result};
use crate::markdown_export::export_markdown;
use crate::messages::{parse_command, Ack, Command};
use crate::png::{export_png, CaptureHost};
use crate::print::{export_pdf, PrintHost, PrintSurface};
use crate::selection::{EventOutcome, ExportRequest, PickEvent, SelectionController, SelectionHost};

/// Everything the agent needs from the page
pub trait ExportHost: SelectionHost + PrintHost + CaptureHost {}

impl<T> ExportHost for T where T: SelectionHost + PrintHost + CaptureHost {}

/// What a finished export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Printed(PrintSurface),
    /// Downloaded file name
    Markdown(String),
    /// Number of PNG files downloaded
    Png(usize),
}

/// Routes popup commands and page events to the picker, and runs exports
pub struct ContentAgent<H: ExportHost> {
    host: H,
    controller: SelectionController<H::Element>,
    markdown: MarkdownService,
    config: ExportConfig,
}

impl<H> ContentAgent<H>
where
    H: ExportHost + 'static,
{
    pub fn new(host: H) -> Self {
        Self::with_config(host, ExportConfig::default())
    }

    pub fn with_config(host: H, config: ExportConfig) -> Self {
        Self {
            controller: SelectionController::new(config.strings.clone()),
            markdown: MarkdownService::new(),
            host,
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn is_selecting(&self) -> bool {
        self.controller.is_active()
    }

    /// Answer a runtime message
    pub fn handle_message(&mut self, message: &Value) -> Ack {
        match parse_command(message) {
            Ok(Command::StartSelection(config)) => {
                self.controller.start(&self.host, config);
                Ack::ok()
            }
            Ok(Command::CancelSelection) => {
                self.controller.stop(&self.host);
                Ack::ok()
            }
            Err(err) => {
                debug!(error = %err, "rejected message");
                Ack::from(err)
            }
        }
    }

    pub fn handle_event(&mut self, event: PickEvent<H::Element>) -> EventOutcome<H::Element> {
        self.controller.handle_event(&self.host, event)
    }

    /// Feed an event to the picker and run the export it confirms, if any
    pub async fn dispatch(
        &mut self,
        event: PickEvent<H::Element>,
    ) -> Option<Result<ExportOutcome>> {
        let request = self.handle_event(event).export?;
        Some(self.export(&request).await)
    }

    /// Run one export. Failures are also reported to the user with an alert.
    pub async fn export(&self, request: &ExportRequest<H::Element>) -> Result<ExportOutcome> {
        let config = &request.config;
        let result = match config.export_format {
            ExportFormat::Markdown => {
                export_markdown(&self.host, &request.targets, &self.markdown, &self.config)
                    .map(ExportOutcome::Markdown)
            }
            ExportFormat::Pdf => {
                let sources: Vec<Node> = request
                    .targets
                    .iter()
                    .map(|target| self.host.describe(target))
                    .collect();
                export_pdf(
                    &self.host,
                    &sources,
                    config.preserve_styles,
                    config.enhanced_image_loading,
                    &self.config,
                )
                .await
                .map(ExportOutcome::Printed)
            }
            ExportFormat::Png => export_png(&self.host, &request.targets, &self.config)
                .await
                .map(ExportOutcome::Png),
        };

        if let Err(err) = &result {
            warn!(error = %err, format = ?config.export_format, "export failed");
            self.host.alert(&self.failure_message(err));
        }
        result
    }

    fn failure_message(&self, err: &ExportError) -> String {
        let strings = &self.config.strings;
        match err {
            ExportError::PopupBlocked => strings.print_blocked.clone(),
            ExportError::NotVisible => strings.png_not_visible.clone(),
            ExportError::Capture(detail) | ExportError::CaptureData(detail) => {
                format!("{} {}", strings.capture_failed, detail)
            }
            ExportError::Image(err) => format!("{} {}", strings.capture_failed, err),
            other => other.to_string(),
        }
    }
}
