//! Image handling: pinning the displayed source, lazy-load promotion and
//! background-image materialization.

use webexport_dom::{is_void, ComputedStyle, Node};

/// Pin `target` to the source `source` currently displays and force a synchronous decode.
///
/// The live `currentSrc` is absolute. Without one the raw `src` attribute is copied
/// as-is and resolves against the page, or against the `<base>` of the print window.
pub fn sync_image_source(source: &Node, target: &mut Node, enhanced: bool) {
    if !source.is_tag("img") || !target.is_tag("img") {
        return;
    }

    if enhanced {
        promote_lazy_attributes(target);
    }

    let current = source
        .state
        .as_ref()
        .and_then(|state| state.current_src.clone())
        .filter(|src| !src.is_empty())
        .or_else(|| source.attr("src").filter(|src| !src.is_empty()).map(str::to_string));
    if let Some(src) = current {
        target.set_attr("src", &src);
        target.remove_attr("srcset");
        target.remove_attr("sizes");
    }
    target.remove_attr("loading");
    target.set_attr("decoding", "sync");
}

/// `data-src`/`data-srcset` become the real attributes when those are missing
pub fn promote_lazy_attributes(target: &mut Node) {
    for (lazy, real) in [("data-src", "src"), ("data-srcset", "srcset")] {
        if target.has_attr(real) {
            continue;
        }
        if let Some(value) = target.attr(lazy).map(str::to_string) {
            target.set_attr(real, &value);
        }
    }
}

/// Replace a single `url(...)` background on an empty element with a filling `<img>`.
///
/// Elements with visible content are left alone so nothing is shown twice.
/// Returns whether an image was added.
pub fn materialize_background(source: &Node, target: &mut Node, style: &ComputedStyle) -> bool {
    let tag = source.tag_name();
    if !source.is_element() || is_void(&tag) || tag == "canvas" || !source.is_visually_empty() {
        return false;
    }
    let Some(url) = style.background_image_url() else {
        return false;
    };

    let fit_style = format!(
        "width:100%;height:100%;object-fit:{};display:block;",
        style.object_fit()
    );
    let image = Node::element_with_attrs(
        "img",
        vec![("src", url.as_str()), ("alt", ""), ("style", fit_style.as_str())],
    );
    target.append_style("background-image:none;");
    target.add_child(image);
    true
}
