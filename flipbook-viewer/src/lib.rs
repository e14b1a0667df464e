//! Page-flipping viewer for PDF documents and image sequences.
//!
//! The sizing ([`layout`]), gesture ([`gesture`]) and navigation ([`flip`])
//! logic is plain state with no dependency on a running window; [`shell`]
//! wires it into iced.

pub mod book;
pub mod chrome;
pub mod config;
pub mod document;
pub mod error;
pub mod flip;
pub mod gesture;
pub mod layout;
pub mod platform;
pub mod renderer;
pub mod shell;
pub mod video;
pub mod viewport;

pub use error::{Result, ViewerError};
pub use shell::{FlipbookViewer, Message, ViewerSettings};
