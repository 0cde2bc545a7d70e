//! # webexport
//!
//! Pick elements on a page and export them as a PDF (through the print dialog), a
//! Markdown file or a PNG screenshot.
//!
//! The browser is reached only through host traits: [`PageHost`] and its
//! extensions [`SelectionHost`], [`PrintHost`] and [`CaptureHost`]. Everything
//! runs on one thread; the traits are `?Send` and hosts typically share page state
//! through `Rc<RefCell<..>>`.
//!
//! ## Flow
//!
//! 1. The popup sends `START_SELECTION`; [`ContentAgent::handle_message`] starts
//!    the picker.
//! 2. Pointer and key events go through [`ContentAgent::handle_event`]. A plain
//!    click, or Enter after modifier clicks, yields an [`ExportRequest`].
//! 3. [`ContentAgent::export`] routes the request by format.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use webexport::messages::{parse_command, Command};
//! use webexport::ExportFormat;
//!
//! let message = json!({"type": "START_SELECTION", "exportFormat": "png"});
//! match parse_command(&message) {
//!     Ok(Command::StartSelection(config)) => assert_eq!(config.export_format, ExportFormat::Png),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

mod agent;
pub mod assets;
pub mod background;
mod config;
mod error;
mod filename;
mod host;
pub mod ids;
mod markdown_export;
pub mod messages;
pub mod png;
pub mod print;
pub mod selection;

pub use agent::{ContentAgent, ExportHost, ExportOutcome};
pub use assets::{wait_for_assets, AssetScope, ImageResource};
pub use config::{ExportConfig, ExportFormat, SelectionConfig, Strings, WaitConfig};
pub use error::{ExportError, HostError, Result};
pub use filename::sanitize_filename;
pub use host::{Download, PageHost};
pub use markdown_export::{export_markdown, MARKDOWN_MIME};
pub use png::{export_png, CaptureHost, Rect, Viewport};
pub use print::{export_pdf, PrintHost, PrintSurface, PrintWindow};
pub use selection::{EventOutcome, ExportRequest, Key, PickEvent, SelectionController, SelectionHost};

pub use webexport_dom::{Document, Node};
pub use webexport_markdown::MarkdownService;
pub use webexport_snapshot::{RenderHost, SnapshotOptions};
