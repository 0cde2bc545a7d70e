//! Configuration: what the popup asks for, timing bounds and user-facing texts.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Markdown,
    Png,
}

impl ExportFormat {
    /// Unknown names fall back to PDF
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "markdown" => ExportFormat::Markdown,
            "png" => ExportFormat::Png,
            _ => ExportFormat::Pdf,
        }
    }
}

impl<'de> Deserialize<'de> for ExportFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.map(|n| ExportFormat::from_name(&n)).unwrap_or_default())
    }
}

/// Options carried by the start-selection command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    pub preserve_styles: bool,
    pub export_format: ExportFormat,
    pub enhanced_image_loading: bool,
}

/// Bounds on waiting for assets before printing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaitConfig {
    /// Image wait bound
    pub timeout_ms: u64,
    /// Image wait bound in enhanced image mode
    pub enhanced_timeout_ms: u64,
    /// Delay between assets settling and `print()` in a fallback window
    pub print_settle_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            enhanced_timeout_ms: 8000,
            print_settle_ms: 50,
        }
    }
}

impl WaitConfig {
    pub fn image_timeout(&self, enhanced_images: bool) -> Duration {
        Duration::from_millis(if enhanced_images {
            self.enhanced_timeout_ms
        } else {
            self.timeout_ms
        })
    }

    pub fn print_settle(&self) -> Duration {
        Duration::from_millis(self.print_settle_ms)
    }
}

/// User-visible texts. Translation tables live with the extension shell; these are
/// the English defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Strings {
    pub select_prompt: String,
    /// `{count}` is replaced with the number of selected elements
    pub selected_count: String,
    pub png_not_visible: String,
    pub print_blocked: String,
    pub capture_failed: String,
    pub print_window_title: String,
    pub default_file_stem: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            select_prompt: "Click to select an element, Ctrl/Command to multi-select, Enter to export, Esc to cancel".to_string(),
            selected_count: "Selected: {count}".to_string(),
            png_not_visible: "The selected area is not visible. Scroll it into view before exporting.".to_string(),
            print_blocked: "Unable to open the print window. Please check your popup settings.".to_string(),
            capture_failed: "Screenshot capture failed. Check extension permissions and try again.".to_string(),
            print_window_title: "Exported Selection".to_string(),
            default_file_stem: "exported-selection".to_string(),
        }
    }
}

impl Strings {
    /// Overlay text for the current multi-selection size
    pub fn overlay_text(&self, selected: usize) -> String {
        if selected == 0 {
            self.select_prompt.clone()
        } else {
            format!(
                "{} ({})",
                self.select_prompt,
                self.selected_count.replace("{count}", &selected.to_string())
            )
        }
    }
}

/// Everything configurable about the exporter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    pub wait: WaitConfig,
    pub strings: Strings,
}

impl ExportConfig {
    /// Load from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
