//! Print orchestration.
//!
//! An export first tries to print in page. The snapshot is mounted in a full
//! viewport overlay, and a print-media style hides everything else. If that fails,
//! the snapshot is printed from a fresh window instead. Only one print container
//! and style pair exists at a time: every attempt starts by removing the
//! previous one.

use async_trait::async_trait;
use tracing::{debug, info, warn};
use webexport_dom::{Document, Node};
use webexport_snapshot::{build_selection_snapshot, PrintPayload, SnapshotOptions};

use crate::assets::{wait_for_assets, AssetScope};
use crate::config::ExportConfig;
use crate::error::{ExportError, HostError, Result};
use crate::host::PageHost;
use crate::ids::{PRINT_CONTAINER_ID, PRINT_STYLE_ID};

/// Page operations the in-page print path needs
#[async_trait(?Send)]
pub trait PrintHost: PageHost {
    /// Append to `document.head`, or the document element when there is no head
    fn append_to_head(&self, node: Node);

    fn append_to_body(&self, node: Node);

    /// Remove the element with `id`. Returns whether one was found.
    fn remove_element_by_id(&self, id: &str) -> bool;

    /// Run `callback` once, on the next `afterprint` event
    fn on_after_print(&self, callback: Box<dyn FnOnce(&Self)>);

    /// Fonts plus the images mounted under the element with `id`
    fn assets_in(&self, id: &str) -> Box<dyn AssetScope>;

    /// `window.print()`
    async fn print(&self) -> std::result::Result<(), HostError>;

    /// A new, unconnected, no-referrer window. `None` when the popup is blocked.
    fn open_print_window(&self) -> Option<Box<dyn PrintWindow>>;
}

/// A window opened to host a standalone print document
#[async_trait(?Send)]
pub trait PrintWindow: AssetScope {
    /// Replace the window's document
    fn load(&self, document: Document);

    /// Resolves once the window's document is complete
    async fn loaded(&self);

    fn print(&self) -> std::result::Result<(), HostError>;

    /// Close the window on its `afterprint` event
    fn close_after_print(&self);
}

/// Where an export ended up being printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintSurface {
    InPage,
    Window,
}

/// Stages of one print export, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintPhase {
    SnapshotBuilt,
    Mounted,
    AssetsReady,
    Printed,
    CleanedUp,
}

/// Remove the print container and style, if present. Safe to call at any time.
pub fn cleanup_print_artifacts<H>(host: &H)
where
    H: PrintHost + ?Sized,
{
    let container = host.remove_element_by_id(PRINT_CONTAINER_ID);
    let style = host.remove_element_by_id(PRINT_STYLE_ID);
    if container || style {
        debug!(phase = ?PrintPhase::CleanedUp, "print artifacts removed");
    }
}

/// The full-viewport overlay holding the snapshot
pub fn print_container(snapshot: Node) -> Node {
    Node::element_with_attrs(
        "div",
        vec![
            ("id", PRINT_CONTAINER_ID),
            (
                "style",
                "position:fixed;inset:0;overflow:auto;background:#ffffff;padding:16px;z-index:2147483647;",
            ),
        ],
    )
    .with_child(snapshot)
}

/// Print-media rules that show only the container. Without preserved styles the
/// container is also reset to browser defaults.
pub fn print_style(preserve_styles: bool) -> Node {
    let container = format!("#{}", PRINT_CONTAINER_ID);
    let reset = if preserve_styles {
        String::new()
    } else {
        format!(
            "{c}, {c} * {{ all: revert; }} \
             {c} {{ font-family: Arial, sans-serif; font-size: 14px; color: #111111; }} ",
            c = container
        )
    };
    let css = format!(
        "{reset}@media print {{ \
         body > *:not({c}) {{ display: none !important; }} \
         {c} {{ position: static !important; inset: auto !important; overflow: visible !important; padding: 0 !important; }} \
         }}",
        reset = reset,
        c = container
    );
    Node::element_with_attrs("style", vec![("id", PRINT_STYLE_ID)]).with_child(Node::text(&css))
}

/// Build the standalone document for a fallback print window
pub fn populate_print_document(payload: &PrintPayload, title: &str) -> Document {
    let mut document = Document::new(&payload.base_href);
    document.title = title.to_string();

    let head = &mut document.head;
    head.add_child(Node::element_with_attrs("meta", vec![("charset", "utf-8")]));
    head.add_child(Node::element_with_attrs(
        "meta",
        vec![
            ("name", "viewport"),
            ("content", "width=device-width, initial-scale=1"),
        ],
    ));
    if !payload.base_href.is_empty() {
        head.add_child(Node::element_with_attrs(
            "base",
            vec![("href", payload.base_href.as_str())],
        ));
    }
    let css = format!(
        "@page {{ margin: 12mm; }} body {{ {} }} * {{ box-sizing: border-box; }}",
        payload.body_style
    );
    head.add_child(Node::element("style").with_child(Node::text(&css)));

    document.body.add_child(payload.clone.clone());
    document
}

/// Print `sources` in page, falling back to a print window.
///
/// Returns the surface that was printed. `PopupBlocked` means both paths failed.
pub async fn export_pdf<H>(
    host: &H,
    sources: &[Node],
    preserve_styles: bool,
    enhanced_images: bool,
    config: &ExportConfig,
) -> Result<PrintSurface>
where
    H: PrintHost + 'static,
{
    match print_in_page(host, sources, preserve_styles, enhanced_images, config).await {
        Ok(()) => Ok(PrintSurface::InPage),
        Err(err) => {
            warn!(error = %err, "in-page print failed, falling back to a print window");
            cleanup_print_artifacts(host);
            print_in_window(host, sources, preserve_styles, enhanced_images, config).await?;
            Ok(PrintSurface::Window)
        }
    }
}

async fn print_in_page<H>(
    host: &H,
    sources: &[Node],
    preserve_styles: bool,
    enhanced_images: bool,
    config: &ExportConfig,
) -> Result<()>
where
    H: PrintHost + 'static,
{
    cleanup_print_artifacts(host);

    let options = SnapshotOptions::for_print(preserve_styles, enhanced_images);
    let snapshot = build_selection_snapshot(sources, host, &options)?;
    debug!(phase = ?PrintPhase::SnapshotBuilt, targets = sources.len());

    host.append_to_head(print_style(preserve_styles));
    host.append_to_body(print_container(snapshot));
    host.on_after_print(Box::new(|host: &H| cleanup_print_artifacts(host)));
    debug!(phase = ?PrintPhase::Mounted);

    let scope = host.assets_in(PRINT_CONTAINER_ID);
    wait_for_assets(scope.as_ref(), enhanced_images, &config.wait).await;
    debug!(phase = ?PrintPhase::AssetsReady);

    host.print().await?;
    info!(phase = ?PrintPhase::Printed, surface = ?PrintSurface::InPage, "print dialog opened");
    Ok(())
}

async fn print_in_window<H>(
    host: &H,
    sources: &[Node],
    preserve_styles: bool,
    enhanced_images: bool,
    config: &ExportConfig,
) -> Result<()>
where
    H: PrintHost,
{
    let options = SnapshotOptions::for_print(preserve_styles, enhanced_images);
    let snapshot = build_selection_snapshot(sources, host, &options)?;
    let payload = PrintPayload::new(snapshot, &host.base_uri(), preserve_styles);
    debug!(phase = ?PrintPhase::SnapshotBuilt, targets = sources.len());

    let window = host.open_print_window().ok_or(ExportError::PopupBlocked)?;
    window.load(populate_print_document(
        &payload,
        &config.strings.print_window_title,
    ));
    window.close_after_print();
    window.loaded().await;
    debug!(phase = ?PrintPhase::Mounted, surface = ?PrintSurface::Window);

    wait_for_assets(window.as_ref(), enhanced_images, &config.wait).await;
    debug!(phase = ?PrintPhase::AssetsReady);

    tokio::time::sleep(config.wait.print_settle()).await;
    // print() throws when the user disabled printing; there is nothing left to fall back to
    if let Err(err) = window.print() {
        warn!(error = %err, "print window refused to print");
        return Ok(());
    }
    info!(phase = ?PrintPhase::Printed, surface = ?PrintSurface::Window, "print dialog opened");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_print_style_reset_only_without_preserved_styles() {
        let plain = print_style(false).text_content();
        assert!(plain.contains("all: revert;"));
        assert!(plain.contains("font-family: Arial, sans-serif;"));
        assert!(plain.contains("body > *:not(#__web_exporter_print_container__)"));

        let preserved = print_style(true).text_content();
        assert!(!preserved.contains("all: revert;"));
        assert!(preserved.starts_with("@media print"));
        assert_eq!(print_style(true).attr("id"), Some(PRINT_STYLE_ID));
    }

    #[test]
    fn test_print_container_wraps_snapshot() {
        let container = print_container(Node::element("article"));
        assert_eq!(container.attr("id"), Some(PRINT_CONTAINER_ID));
        assert!(container.attr("style").unwrap().contains("z-index:2147483647"));
        assert_eq!(container.element_children().next().unwrap().tag_name(), "article");
    }

    #[test]
    fn test_populate_print_document() {
        let clone = Node::element("p").with_child(Node::text("hi"));
        let payload = PrintPayload::new(clone, "https://example.com/docs/", false);
        let document = populate_print_document(&payload, "Exported Selection");

        assert_eq!(
            document.to_html(),
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
             <base href=\"https://example.com/docs/\">\
             <style>@page { margin: 12mm; } body { margin:0;padding:16px;font-family:Arial, sans-serif;background:#ffffff; } * { box-sizing: border-box; }</style>\
             <title>Exported Selection</title></head><body><p>hi</p></body></html>"
        );
    }

    #[test]
    fn test_populate_without_base() {
        let payload = PrintPayload::new(Node::element("div"), "", true);
        let document = populate_print_document(&payload, "t");
        assert!(document.head.descendants_by_tag("base").is_empty());
    }
}
