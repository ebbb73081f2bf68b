//! Document sources for the synthesis pipeline configuration loader
//!
//! Provides normalized path handling, bounded text reads, format detection
//! and the [`DocumentSource`] abstraction the loader reads documents through.

pub mod error;
pub mod format;
pub mod io;
pub mod path;
pub mod source;

pub use error::{Error, Result};
pub use format::DocumentFormat;
pub use io::MAX_DOCUMENT_SIZE;
pub use path::NormalizedPath;
pub use source::{DirectorySource, DocumentId, DocumentSource, MemorySource, RawDocument};
