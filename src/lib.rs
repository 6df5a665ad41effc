//! Selective page transfer between content deployments.
//!
//! [`ExportBuilder`] packages chosen pages together with the blocks they
//! reference and the media they embed. [`Importer`] applies such a package
//! to another deployment, matching entities by slug and rewriting block
//! references and media URLs on the way in.

pub mod errors;
pub mod export;
pub mod import;
pub mod package;
pub mod scanner;
pub mod settings;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use errors::{TransferError, TransferResult, ValidationError};
pub use export::{list_exportable_pages, ExportBuilder};
pub use import::{ImportReport, Importer};
pub use package::{parse_package, Package, PackageSummary};
pub use storage::{ContentStore, FileMediaStore, FileStorage, MediaStore};
