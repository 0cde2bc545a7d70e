//! Markdown export: convert each target and download the joined document.

use tracing::info;
use webexport_markdown::MarkdownService;

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::filename::sanitize_filename;
use crate::host::{Download, PageHost};

pub const MARKDOWN_MIME: &str = "text/markdown;charset=utf-8";

/// Convert `targets` in order and download the result as `<title>.md`.
///
/// Returns the downloaded file name.
pub fn export_markdown<H>(
    host: &H,
    targets: &[H::Element],
    service: &MarkdownService,
    config: &ExportConfig,
) -> Result<String>
where
    H: PageHost,
{
    if targets.is_empty() {
        return Err(ExportError::NoTargets);
    }
    let nodes: Vec<_> = targets.iter().map(|target| host.describe(target)).collect();
    let markdown = service.convert_all(&nodes);

    let filename = format!(
        "{}.md",
        sanitize_filename(&host.title(), &config.strings.default_file_stem)
    );
    host.download(Download::new(
        filename.as_str(),
        MARKDOWN_MIME,
        markdown.into_bytes(),
    ))?;
    info!(%filename, targets = targets.len(), "markdown exported");
    Ok(filename)
}
