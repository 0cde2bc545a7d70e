//! An in-memory page implementing every host trait.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Cursor;
use std::rc::Rc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use webexport::messages::CaptureResponse;
use webexport::{
    AssetScope, CaptureHost, Document, Download, HostError, ImageResource, Node, PageHost,
    PrintHost, PrintWindow, Rect, RenderHost, SelectionHost, Viewport,
};
use webexport::ids::{OVERLAY_ID, STYLE_ID};
use webexport_dom::{parse_document, ComputedStyle, NodeId};
use webexport_snapshot::CanvasError;

pub const OVERLAY_NODE: NodeId = NodeId(u64::MAX);

/// How images mounted for printing behave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageBehavior {
    Loaded,
    /// Never fires load or error
    Stuck,
}

#[derive(Default)]
pub struct WindowState {
    pub document: RefCell<Option<Document>>,
    pub printed: Cell<bool>,
    pub closes_after_print: Cell<bool>,
}

struct Inner {
    document: RefCell<Document>,
    styles: RefCell<HashMap<NodeId, ComputedStyle>>,
    rects: RefCell<HashMap<NodeId, Rect>>,
    downloads: RefCell<Vec<Download>>,
    alerts: RefCell<Vec<String>>,
    scrolled: RefCell<Vec<NodeId>>,
    listening: Cell<bool>,
    print_blocked: Cell<bool>,
    popups_blocked: Cell<bool>,
    prints: Cell<usize>,
    image_behavior: Cell<ImageBehavior>,
    after_print: RefCell<Vec<Box<dyn FnOnce(&FakePage)>>>,
    windows: RefCell<Vec<Rc<WindowState>>>,
    capture: RefCell<CaptureResponse>,
}

/// Cheap to clone; clones share the page
#[derive(Clone)]
pub struct FakePage {
    inner: Rc<Inner>,
}

impl FakePage {
    /// Parse `html` and give every element in the body a node id
    pub fn new(html: &str) -> Self {
        let mut document = parse_document(html, "https://example.com/articles/page.html");
        let mut next = 1;
        number(&mut document.body, &mut next);
        Self {
            inner: Rc::new(Inner {
                document: RefCell::new(document),
                styles: RefCell::default(),
                rects: RefCell::default(),
                downloads: RefCell::default(),
                alerts: RefCell::default(),
                scrolled: RefCell::default(),
                listening: Cell::new(false),
                print_blocked: Cell::new(false),
                popups_blocked: Cell::new(false),
                prints: Cell::new(0),
                image_behavior: Cell::new(ImageBehavior::Loaded),
                after_print: RefCell::default(),
                windows: RefCell::default(),
                capture: RefCell::new(CaptureResponse::success(screenshot_data_url(200, 100))),
            }),
        }
    }

    /// Handle of the element with the given `id` attribute
    pub fn element(&self, id: &str) -> NodeId {
        self.inner
            .document
            .borrow()
            .get_element_by_id(id)
            .and_then(|node| node.node_id)
            .unwrap_or_else(|| panic!("no element #{}", id))
    }

    pub fn document(&self) -> Document {
        self.inner.document.borrow().clone()
    }

    pub fn set_style(&self, id: &str, style: ComputedStyle) {
        let node = self.element(id);
        self.inner.styles.borrow_mut().insert(node, style);
    }

    pub fn set_rect(&self, id: &str, rect: Rect) {
        let node = self.element(id);
        self.inner.rects.borrow_mut().insert(node, rect);
    }

    pub fn set_capture(&self, response: CaptureResponse) {
        *self.inner.capture.borrow_mut() = response;
    }

    pub fn block_print(&self) {
        self.inner.print_blocked.set(true);
    }

    pub fn block_popups(&self) {
        self.inner.popups_blocked.set(true);
    }

    pub fn set_image_behavior(&self, behavior: ImageBehavior) {
        self.inner.image_behavior.set(behavior);
    }

    pub fn downloads(&self) -> Vec<Download> {
        self.inner.downloads.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.inner.alerts.borrow().clone()
    }

    pub fn scrolled(&self) -> Vec<NodeId> {
        self.inner.scrolled.borrow().clone()
    }

    pub fn is_listening(&self) -> bool {
        self.inner.listening.get()
    }

    pub fn prints(&self) -> usize {
        self.inner.prints.get()
    }

    pub fn windows(&self) -> Vec<Rc<WindowState>> {
        self.inner.windows.borrow().clone()
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.inner.document.borrow().get_element_by_id(id).is_some()
    }

    pub fn classes(&self, id: &str) -> String {
        let node = self.element(id);
        let document = self.inner.document.borrow();
        find(&document.body, node)
            .and_then(|node| node.attr("class"))
            .unwrap_or_default()
            .to_string()
    }

    /// Fire `afterprint`
    pub fn fire_after_print(&self) {
        let callbacks: Vec<_> = self.inner.after_print.borrow_mut().drain(..).collect();
        for callback in callbacks {
            callback(self);
        }
    }

    fn with_node<F>(&self, id: NodeId, f: F)
    where
        F: FnOnce(&mut Node),
    {
        let mut document = self.inner.document.borrow_mut();
        if let Some(node) = find_mut(&mut document.body, id) {
            f(node);
        }
    }
}

fn number(node: &mut Node, next: &mut u64) {
    if node.is_element() {
        node.node_id = Some(NodeId(*next));
        *next += 1;
    }
    for child in node.child_nodes_mut() {
        number(child, next);
    }
}

fn find(node: &Node, id: NodeId) -> Option<&Node> {
    if node.node_id == Some(id) {
        return Some(node);
    }
    node.children().find_map(|child| find(child, id))
}

fn find_mut(node: &mut Node, id: NodeId) -> Option<&mut Node> {
    if node.node_id == Some(id) {
        return Some(node);
    }
    node.child_nodes_mut()
        .iter_mut()
        .find_map(|child| find_mut(child, id))
}

/// A PNG screenshot whose red channel is the x coordinate
pub fn screenshot_data_url(width: u32, height: u32) -> String {
    let bitmap = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(bitmap)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

impl RenderHost for FakePage {
    fn computed_style(&self, node: &Node) -> Option<ComputedStyle> {
        let id = node.node_id?;
        self.inner.styles.borrow().get(&id).cloned()
    }

    fn canvas_data_url(&self, _canvas: &Node) -> Result<String, CanvasError> {
        Err(CanvasError::Tainted)
    }
}

impl PageHost for FakePage {
    type Element = NodeId;

    fn title(&self) -> String {
        self.inner.document.borrow().title.clone()
    }

    fn base_uri(&self) -> String {
        self.inner.document.borrow().base_uri().to_string()
    }

    fn describe(&self, element: &NodeId) -> Node {
        let document = self.inner.document.borrow();
        find(&document.body, *element)
            .cloned()
            .unwrap_or_else(|| Node::element("div"))
    }

    fn download(&self, download: Download) -> Result<(), HostError> {
        self.inner.downloads.borrow_mut().push(download);
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.inner.alerts.borrow_mut().push(message.to_string());
    }
}

impl SelectionHost for FakePage {
    fn listen(&self) {
        self.inner.listening.set(true);
    }

    fn unlisten(&self) {
        self.inner.listening.set(false);
    }

    fn ensure_picker_style(&self) {
        let mut document = self.inner.document.borrow_mut();
        if document.get_element_by_id(STYLE_ID).is_none() {
            document
                .head
                .add_child(Node::element_with_attrs("style", vec![("id", STYLE_ID)]));
        }
    }

    fn decorate(&self, element: &NodeId, class: &str) {
        self.with_node(*element, |node| node.add_class(class));
    }

    fn undecorate(&self, element: &NodeId, class: &str) {
        self.with_node(*element, |node| node.remove_class(class));
    }

    fn show_overlay(&self, text: &str) {
        let mut document = self.inner.document.borrow_mut();
        match document.get_element_by_id_mut(OVERLAY_ID) {
            Some(overlay) => overlay.set_text_content(text),
            None => {
                let overlay = Node::element_with_attrs("div", vec![("id", OVERLAY_ID)])
                    .with_id(OVERLAY_NODE)
                    .with_child(Node::text(text));
                document.body.add_child(overlay);
            }
        }
    }

    fn remove_overlay(&self) {
        self.inner.document.borrow_mut().remove_element_by_id(OVERLAY_ID);
    }

    fn is_overlay(&self, element: &NodeId) -> bool {
        *element == OVERLAY_NODE
    }
}

pub struct FakeImage {
    behavior: ImageBehavior,
}

#[async_trait(?Send)]
impl ImageResource for FakeImage {
    fn is_complete(&self) -> bool {
        self.behavior == ImageBehavior::Loaded
    }

    fn natural_width(&self) -> u32 {
        match self.behavior {
            ImageBehavior::Loaded => 64,
            ImageBehavior::Stuck => 0,
        }
    }

    fn set_attribute(&self, _name: &str, _value: &str) {}

    fn supports_decode(&self) -> bool {
        false
    }

    async fn decode(&self) -> Result<(), HostError> {
        Err(HostError::Unavailable("decode".to_string()))
    }

    async fn settled(&self) {
        if self.behavior == ImageBehavior::Stuck {
            futures::future::pending::<()>().await;
        }
    }
}

pub struct FakeScope {
    images: Vec<Rc<dyn ImageResource>>,
}

impl FakeScope {
    fn over(root: Option<&Node>, behavior: ImageBehavior) -> Self {
        let count = root.map_or(0, |root| root.descendants_by_tag("img").len());
        let images = (0..count)
            .map(|_| Rc::new(FakeImage { behavior }) as Rc<dyn ImageResource>)
            .collect();
        Self { images }
    }
}

#[async_trait(?Send)]
impl AssetScope for FakeScope {
    async fn fonts_ready(&self) -> Result<(), HostError> {
        Ok(())
    }

    fn images(&self) -> Vec<Rc<dyn ImageResource>> {
        self.images.clone()
    }
}

#[async_trait(?Send)]
impl PrintHost for FakePage {
    fn append_to_head(&self, node: Node) {
        self.inner.document.borrow_mut().head.add_child(node);
    }

    fn append_to_body(&self, node: Node) {
        self.inner.document.borrow_mut().body.add_child(node);
    }

    fn remove_element_by_id(&self, id: &str) -> bool {
        self.inner
            .document
            .borrow_mut()
            .remove_element_by_id(id)
            .is_some()
    }

    fn on_after_print(&self, callback: Box<dyn FnOnce(&Self)>) {
        self.inner.after_print.borrow_mut().push(callback);
    }

    fn assets_in(&self, id: &str) -> Box<dyn AssetScope> {
        let document = self.inner.document.borrow();
        Box::new(FakeScope::over(
            document.get_element_by_id(id),
            self.inner.image_behavior.get(),
        ))
    }

    async fn print(&self) -> Result<(), HostError> {
        if self.inner.print_blocked.get() {
            return Err(HostError::Blocked("window.print".to_string()));
        }
        self.inner.prints.set(self.inner.prints.get() + 1);
        Ok(())
    }

    fn open_print_window(&self) -> Option<Box<dyn PrintWindow>> {
        if self.inner.popups_blocked.get() {
            return None;
        }
        let state = Rc::new(WindowState::default());
        self.inner.windows.borrow_mut().push(state.clone());
        Some(Box::new(FakeWindow {
            state,
            behavior: self.inner.image_behavior.get(),
        }))
    }
}

pub struct FakeWindow {
    state: Rc<WindowState>,
    behavior: ImageBehavior,
}

#[async_trait(?Send)]
impl AssetScope for FakeWindow {
    async fn fonts_ready(&self) -> Result<(), HostError> {
        Err(HostError::Unavailable("document.fonts".to_string()))
    }

    fn images(&self) -> Vec<Rc<dyn ImageResource>> {
        let document = self.state.document.borrow();
        FakeScope::over(document.as_ref().map(|document| &document.body), self.behavior).images
    }
}

#[async_trait(?Send)]
impl PrintWindow for FakeWindow {
    fn load(&self, document: Document) {
        *self.state.document.borrow_mut() = Some(document);
    }

    async fn loaded(&self) {}

    fn print(&self) -> Result<(), HostError> {
        self.state.printed.set(true);
        Ok(())
    }

    fn close_after_print(&self) {
        self.state.closes_after_print.set(true);
    }
}

#[async_trait(?Send)]
impl CaptureHost for FakePage {
    fn scroll_into_view(&self, element: &NodeId) {
        self.inner.scrolled.borrow_mut().push(*element);
    }

    fn bounding_rect(&self, element: &NodeId) -> Rect {
        self.inner
            .rects
            .borrow()
            .get(element)
            .copied()
            .unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: 100.0,
            height: 50.0,
        }
    }

    async fn capture_visible_tab(&self) -> Result<CaptureResponse, HostError> {
        Ok(self.inner.capture.borrow().clone())
    }
}
