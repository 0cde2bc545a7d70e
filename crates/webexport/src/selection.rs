//! The element picker.
//!
//! While a session is active, hovering highlights the element under the pointer, a
//! modifier click toggles an element in the multi-selection, a plain click exports
//! that one element, Enter exports the multi-selection and Escape gives up. Leaving
//! the session by any path removes every listener and decoration the picker added.

use std::fmt;

use tracing::{debug, info};

use crate::config::{SelectionConfig, Strings};
use crate::host::PageHost;
use crate::ids::{HIGHLIGHT_CLASS, SELECTED_CLASS};

/// Page operations the picker needs
pub trait SelectionHost: PageHost {
    /// Register capturing pointer-over, click and key-down listeners
    fn listen(&self);

    fn unlisten(&self);

    /// Insert the picker's style element unless it is already present
    fn ensure_picker_style(&self);

    fn decorate(&self, element: &Self::Element, class: &str);

    fn undecorate(&self, element: &Self::Element, class: &str);

    /// Show the status overlay, creating it on first use
    fn show_overlay(&self, text: &str);

    fn remove_overlay(&self);

    /// Whether `element` is the overlay or inside it
    fn is_overlay(&self, element: &Self::Element) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

impl Key {
    /// From `KeyboardEvent.key`
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            _ => Key::Other,
        }
    }
}

/// Input events the picker listens to
#[derive(Debug, Clone, PartialEq)]
pub enum PickEvent<E> {
    PointerOver(E),
    /// `modifier` is Ctrl, or Command on macOS
    Click { target: E, modifier: bool },
    KeyDown(Key),
}

/// Targets to export, in click order, with the options the session started with
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest<E> {
    pub targets: Vec<E>,
    pub config: SelectionConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome<E> {
    /// The page must not see the event: prevent its default and stop propagation
    pub consumed: bool,
    pub export: Option<ExportRequest<E>>,
}

impl<E> EventOutcome<E> {
    fn ignored() -> Self {
        Self {
            consumed: false,
            export: None,
        }
    }

    fn consumed() -> Self {
        Self {
            consumed: true,
            export: None,
        }
    }

    fn export(targets: Vec<E>, config: SelectionConfig) -> Self {
        Self {
            consumed: true,
            export: Some(ExportRequest { targets, config }),
        }
    }
}

/// State of one active picking session
#[derive(Debug, Clone)]
pub struct SelectionSession<E> {
    config: SelectionConfig,
    highlighted: Option<E>,
    selected: Vec<E>,
}

impl<E> SelectionSession<E> {
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn highlighted(&self) -> Option<&E> {
        self.highlighted.as_ref()
    }

    /// Multi-selected elements, in click order
    pub fn selected(&self) -> &[E] {
        &self.selected
    }
}

/// Owns the picking session. No session means inactive, and nothing is decorated.
pub struct SelectionController<E> {
    session: Option<SelectionSession<E>>,
    strings: Strings,
}

impl<E> SelectionController<E>
where
    E: Clone + PartialEq + fmt::Debug,
{
    pub fn new(strings: Strings) -> Self {
        Self {
            session: None,
            strings,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SelectionSession<E>> {
        self.session.as_ref()
    }

    /// Enter the picking state. Returns `false`, changing nothing, when already active.
    pub fn start<H>(&mut self, host: &H, config: SelectionConfig) -> bool
    where
        H: SelectionHost<Element = E>,
    {
        if self.session.is_some() {
            return false;
        }
        host.ensure_picker_style();
        host.show_overlay(&self.strings.overlay_text(0));
        host.listen();
        self.session = Some(SelectionSession {
            config,
            highlighted: None,
            selected: Vec::new(),
        });
        info!(format = ?config.export_format, preserve_styles = config.preserve_styles, "selection started");
        true
    }

    /// Leave the picking state, discarding any multi-selection. Returns `false` when
    /// there was nothing to stop.
    pub fn stop<H>(&mut self, host: &H) -> bool
    where
        H: SelectionHost<Element = E>,
    {
        match self.session.take() {
            Some(session) => {
                self.teardown(host, session);
                true
            }
            None => false,
        }
    }

    pub fn handle_event<H>(&mut self, host: &H, event: PickEvent<E>) -> EventOutcome<E>
    where
        H: SelectionHost<Element = E>,
    {
        let Some(session) = self.session.as_mut() else {
            return EventOutcome::ignored();
        };

        match event {
            PickEvent::PointerOver(target) => {
                if host.is_overlay(&target) || session.highlighted.as_ref() == Some(&target) {
                    return EventOutcome::ignored();
                }
                if let Some(previous) = session.highlighted.take() {
                    host.undecorate(&previous, HIGHLIGHT_CLASS);
                }
                host.decorate(&target, HIGHLIGHT_CLASS);
                session.highlighted = Some(target);
                EventOutcome::ignored()
            }
            PickEvent::Click { target, .. } if host.is_overlay(&target) => EventOutcome::ignored(),
            PickEvent::Click {
                target,
                modifier: true,
            } => {
                toggle(host, session, target);
                let count = session.selected.len();
                host.show_overlay(&self.strings.overlay_text(count));
                EventOutcome::consumed()
            }
            PickEvent::Click {
                target,
                modifier: false,
            } => {
                let config = session.config;
                self.stop(host);
                debug!(?target, "single target picked");
                EventOutcome::export(vec![target], config)
            }
            PickEvent::KeyDown(Key::Escape) => {
                self.stop(host);
                debug!("selection cancelled");
                EventOutcome::ignored()
            }
            PickEvent::KeyDown(Key::Enter) if !session.selected.is_empty() => {
                let config = session.config;
                let targets = session.selected.clone();
                self.stop(host);
                debug!(count = targets.len(), "multi-selection confirmed");
                EventOutcome::export(targets, config)
            }
            PickEvent::KeyDown(_) => EventOutcome::ignored(),
        }
    }

    fn teardown<H>(&self, host: &H, session: SelectionSession<E>)
    where
        H: SelectionHost<Element = E>,
    {
        host.unlisten();
        if let Some(highlighted) = &session.highlighted {
            host.undecorate(highlighted, HIGHLIGHT_CLASS);
        }
        for element in &session.selected {
            host.undecorate(element, SELECTED_CLASS);
        }
        host.remove_overlay();
        info!("selection stopped");
    }
}

fn toggle<H>(host: &H, session: &mut SelectionSession<H::Element>, target: H::Element)
where
    H: SelectionHost,
{
    match session.selected.iter().position(|element| *element == target) {
        Some(index) => {
            session.selected.remove(index);
            host.undecorate(&target, SELECTED_CLASS);
        }
        None => {
            host.decorate(&target, SELECTED_CLASS);
            session.selected.push(target);
        }
    }
}
