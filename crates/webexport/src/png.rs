//! PNG export: screenshot the visible tab and crop it to each target.
//!
//! Targets are processed strictly in order. Each one is scrolled into view and
//! captured with a fresh whole-viewport screenshot, so captures must not overlap.

use std::io::Cursor;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{imageops, DynamicImage, ImageFormat};
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::error::{ExportError, HostError, Result};
use crate::filename::sanitize_filename;
use crate::host::{Download, PageHost};
use crate::messages::CaptureResponse;

pub const PNG_MIME: &str = "image/png";

/// A rectangle in CSS pixels, relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// The overlapping area, `None` when it is empty
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Size of the layout viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn as_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Page operations the PNG path needs
#[async_trait(?Send)]
pub trait CaptureHost: PageHost {
    fn scroll_into_view(&self, element: &Self::Element);

    /// `getBoundingClientRect()`
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    fn viewport(&self) -> Viewport;

    /// Round trip to the background worker. `Err` when the message could not be
    /// delivered at all.
    async fn capture_visible_tab(&self) -> std::result::Result<CaptureResponse, HostError>;
}

/// Bytes of a base64 `data:` URL
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| ExportError::CaptureData("not a data URL".to_string()))?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(ExportError::CaptureData(format!(
            "unsupported data URL header {:?}",
            header
        )));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|err| ExportError::CaptureData(err.to_string()))
}

/// Cut `rect` out of a screenshot of `viewport`.
///
/// The screenshot is in device pixels, so the rect is scaled by the ratio of bitmap
/// width to viewport width and clamped to the bitmap.
pub fn crop_to_rect(bitmap: &DynamicImage, rect: Rect, viewport: Viewport) -> Result<DynamicImage> {
    let scale = if viewport.width > 0.0 {
        bitmap.width() as f64 / viewport.width
    } else {
        1.0
    };
    let clamp = |value: f64, max: u32| (value * scale).round().clamp(0.0, max as f64) as u32;

    let left = clamp(rect.left, bitmap.width());
    let top = clamp(rect.top, bitmap.height());
    let right = clamp(rect.right(), bitmap.width());
    let bottom = clamp(rect.bottom(), bitmap.height());
    if right <= left || bottom <= top {
        return Err(ExportError::NotVisible);
    }

    let cropped = imageops::crop_imm(bitmap, left, top, right - left, bottom - top).to_image();
    Ok(DynamicImage::ImageRgba8(cropped))
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// `<stem>.png`, or `<stem>-N.png` (1-based) when several targets are exported
pub fn png_filename(stem: &str, index: usize, total: usize) -> String {
    if total > 1 {
        format!("{}-{}.png", stem, index + 1)
    } else {
        format!("{}.png", stem)
    }
}

/// Capture and download every target.
///
/// A target outside the viewport, or too small to cover a device pixel, is skipped
/// with an alert. A failed capture aborts
/// the remaining targets. Returns the number of files downloaded.
pub async fn export_png<H>(host: &H, targets: &[H::Element], config: &ExportConfig) -> Result<usize>
where
    H: CaptureHost,
{
    if targets.is_empty() {
        return Err(ExportError::NoTargets);
    }
    let stem = sanitize_filename(&host.title(), &config.strings.default_file_stem);

    let mut saved = 0;
    for (index, target) in targets.iter().enumerate() {
        host.scroll_into_view(target);
        let viewport = host.viewport();
        let rect = host.bounding_rect(target);
        let Some(visible) = rect.intersect(&viewport.as_rect()) else {
            warn!(index, ?rect, "target not visible, skipping");
            host.alert(&config.strings.png_not_visible);
            continue;
        };

        let data_url = host
            .capture_visible_tab()
            .await
            .map_err(|err| ExportError::Capture(err.to_string()))?
            .into_result()
            .map_err(ExportError::Capture)?;
        let bitmap = image::load_from_memory(&decode_data_url(&data_url)?)?;
        debug!(
            index,
            width = bitmap.width(),
            height = bitmap.height(),
            "captured viewport"
        );

        let cropped = match crop_to_rect(&bitmap, visible, viewport) {
            Err(ExportError::NotVisible) => {
                warn!(index, ?visible, "target rounds to no device pixels, skipping");
                host.alert(&config.strings.png_not_visible);
                continue;
            }
            cropped => cropped?,
        };
        let filename = png_filename(&stem, index, targets.len());
        host.download(Download::new(filename.as_str(), PNG_MIME, encode_png(&cropped)?))?;
        info!(%filename, "png exported");
        saved += 1;
    }
    Ok(saved)
}
