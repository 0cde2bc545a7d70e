//! Freezing live form-control state into static markup.

use webexport_dom::Node;

fn live_value(node: &Node) -> Option<String> {
    node.state
        .as_ref()
        .and_then(|state| state.value.clone())
        .or_else(|| node.attr("value").map(str::to_string))
}

fn live_checked(node: &Node) -> bool {
    node.state
        .as_ref()
        .and_then(|state| state.checked)
        .unwrap_or_else(|| node.has_attr("checked"))
}

fn live_selected(option: &Node) -> bool {
    option
        .state
        .as_ref()
        .and_then(|state| state.selected)
        .unwrap_or_else(|| option.has_attr("selected"))
}

/// Copy the current value/checked/selected state of `source` onto `target`.
pub fn sync_form_state(source: &Node, target: &mut Node) {
    if source.is_tag("input") {
        if let Some(value) = live_value(source) {
            target.set_attr("value", &value);
        }
        let input_type = source.attr("type").unwrap_or("text").to_lowercase();
        if input_type == "checkbox" || input_type == "radio" {
            if live_checked(source) {
                target.set_attr("checked", "checked");
            } else {
                target.remove_attr("checked");
            }
        }
    } else if source.is_tag("textarea") {
        let value = live_value(source).unwrap_or_else(|| source.text_content());
        target.set_text_content(&value);
    } else if source.is_tag("select") {
        sync_select(source, target);
    }
}

/// Options are matched by index, as `select.options` enumerates them
fn sync_select(source: &Node, target: &mut Node) {
    let option_paths = |node: &Node| -> Vec<Vec<usize>> {
        node.element_paths()
            .into_iter()
            .filter(|path| node.at_path(path).map(|n| n.is_tag("option")).unwrap_or(false))
            .collect()
    };
    let source_options = option_paths(source);
    let target_options = option_paths(target);

    for (source_path, target_path) in source_options.iter().zip(&target_options) {
        let Some(option) = source.at_path(source_path) else {
            continue;
        };
        let selected = live_selected(option);
        let Some(target_option) = target.at_path_mut(target_path) else {
            continue;
        };
        if selected {
            target_option.set_attr("selected", "selected");
        } else {
            target_option.remove_attr("selected");
        }
    }
}
