//! Content pipeline: naming, dates, front matter, storage and the site build.

pub mod build;
pub mod date;
pub mod front_matter;
pub mod naming;
pub mod store;

pub use build::{BuildError, CommandBuilder, SiteBuilder};
pub use date::{resolve_date, DateError, DATE_PATTERN};
pub use front_matter::FrontMatter;
pub use naming::{ensure_markdown_ext, resolve_filename, sanitize_title};
pub use store::StoreError;
