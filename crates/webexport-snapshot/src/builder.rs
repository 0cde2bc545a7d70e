//! Snapshot building.
//!
//! The source subtree and its detached clone are enumerated with the same pre-order
//! walk. The Nth source element corresponds to the Nth clone element: live state is
//! read from the former and written into the latter.

use tracing::{debug, warn};
use webexport_dom::Node;

use crate::error::{Result, SnapshotError};
use crate::forms::sync_form_state;
use crate::host::RenderHost;
use crate::images::{materialize_background, sync_image_source};
use crate::options::SnapshotOptions;

/// Gap between stacked targets in a multi-target snapshot
pub const MULTI_TARGET_GAP: &str = "24px";

/// Clone `source` and freeze its presentation.
pub fn build_snapshot<H>(source: &Node, host: &H, options: &SnapshotOptions) -> Result<Node>
where
    H: RenderHost + ?Sized,
{
    let mut clone = source.detached_clone();
    prepare_clone(source, &mut clone, host, options)?;
    Ok(clone)
}

/// Snapshot every target, in order. A single target is returned as is; several are
/// stacked in one vertical flex container.
pub fn build_selection_snapshot<H>(
    sources: &[Node],
    host: &H,
    options: &SnapshotOptions,
) -> Result<Node>
where
    H: RenderHost + ?Sized,
{
    match sources {
        [] => Err(SnapshotError::NoTargets),
        [single] => build_snapshot(single, host, options),
        many => {
            let style = format!(
                "display:flex;flex-direction:column;gap:{};",
                MULTI_TARGET_GAP
            );
            let mut container = Node::element_with_attrs("div", vec![("style", style.as_str())]);
            for source in many {
                container.add_child(build_snapshot(source, host, options)?);
            }
            Ok(container)
        }
    }
}

fn prepare_clone<H>(source: &Node, clone: &mut Node, host: &H, options: &SnapshotOptions) -> Result<()>
where
    H: RenderHost + ?Sized,
{
    let source_paths = source.element_paths();
    let clone_paths = clone.element_paths();
    if source_paths.len() != clone_paths.len() {
        return Err(SnapshotError::TraversalMismatch {
            source_count: source_paths.len(),
            clone_count: clone_paths.len(),
        });
    }

    let mut canvases = 0usize;
    let mut backgrounds = 0usize;
    for (source_path, clone_path) in source_paths.iter().zip(&clone_paths) {
        let Some(source_node) = source.at_path(source_path) else {
            continue;
        };
        // Descendants of a canvas replaced earlier in this pass no longer resolve
        let Some(clone_node) = clone.at_path_mut(clone_path) else {
            continue;
        };

        if source_node.is_tag("canvas") {
            *clone_node = canvas_replacement(source_node, host, options.inline_styles);
            canvases += 1;
            continue;
        }

        if prepare_node(source_node, clone_node, host, options) {
            backgrounds += 1;
        }
    }

    let scripts = clone.remove_descendants_by_tag("script");
    debug!(
        elements = source_paths.len(),
        canvases, backgrounds, scripts, "snapshot prepared"
    );
    Ok(())
}

/// Per-node freezing; returns whether a background image was materialized
fn prepare_node<H>(source: &Node, clone: &mut Node, host: &H, options: &SnapshotOptions) -> bool
where
    H: RenderHost + ?Sized,
{
    strip_event_handlers(clone);
    if options.strip_presentation {
        strip_presentation(clone);
    }
    if options.sync_images {
        sync_image_source(source, clone, options.enhanced_images);
    }
    sync_form_state(source, clone);

    let materialize = options.sync_images && options.enhanced_images;
    if !options.inline_styles && !materialize {
        return false;
    }
    let Some(computed) = host.computed_style(source) else {
        return false;
    };
    if options.inline_styles {
        clone.append_style(&computed.css_text());
    }
    // After inlining, so the cleared background wins over the frozen one
    materialize && materialize_background(source, clone, &computed)
}

/// Remove every `on*` attribute
pub fn strip_event_handlers(node: &mut Node) {
    node.retain_attrs(|name| !name.to_lowercase().starts_with("on"));
}

/// Remove `style`, `class` and `id`
pub fn strip_presentation(node: &mut Node) {
    for name in ["style", "class", "id"] {
        node.remove_attr(name);
    }
}

/// An `<img>` carrying the canvas pixels, or a placeholder when they cannot be read
fn canvas_replacement<H>(canvas: &Node, host: &H, inline_styles: bool) -> Node
where
    H: RenderHost + ?Sized,
{
    let mut image = Node::element("img");
    image.set_attr("width", canvas.attr("width").unwrap_or("300"));
    image.set_attr("height", canvas.attr("height").unwrap_or("150"));

    match host.canvas_data_url(canvas) {
        Ok(data_url) => image.set_attr("src", &data_url),
        Err(err) => {
            warn!(error = %err, "canvas could not be rasterized, using placeholder");
            image.set_attr("alt", "[canvas]");
        }
    }

    if inline_styles {
        if let Some(computed) = host.computed_style(canvas) {
            image.append_style(&computed.css_text());
        }
    }
    image
}
