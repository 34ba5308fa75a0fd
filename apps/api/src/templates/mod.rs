pub mod builtin;
pub mod handlers;
pub mod store;

pub use store::{CatalogStore, PgTemplateStore, StoreError, TemplateStore};
