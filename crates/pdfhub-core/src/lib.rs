//! PDF Hub service layer
//!
//! File-path based PDF operations for the desktop app, built on lopdf:
//! - `merge` / `split`: page level restructuring
//! - `compress`: image re-encoding plus stream compression
//! - `images`: one page per image at a fixed page size
//! - `text`: per-page text extraction
//!
//! The UI reaches all of them through [`Bridge`], which turns every outcome
//! into a serializable [`BridgeResponse`].

pub mod bridge;
pub mod command;
pub mod compress;
pub mod config;
pub mod error;
pub mod images;
pub mod info;
pub mod io;
pub mod merge;
pub mod page_tree;
pub mod ranges;
pub mod raster;
pub mod service;
pub mod split;
pub mod text;

#[cfg(test)]
mod fixtures;

pub use bridge::Bridge;
pub use command::{BridgeResponse, OperationRequest};
pub use compress::CompressionReport;
pub use config::{CompressionQuality, PageSize, ServiceConfig};
pub use error::{ErrorKind, PdfHubError};
pub use info::PdfInfo;
pub use ranges::{parse_selection, PageRange, PageSelection};
pub use service::PdfService;
