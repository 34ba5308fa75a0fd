//! Template-driven resume rendering.
//!
//! A [`Template`](crate::models::template::Template) plus
//! [`ResumeData`](crate::models::resume::ResumeData) go in; a [`RenderNode`] tree comes
//! out, which [`html::to_html`] turns into static markup.

pub mod engine;
pub mod handlers;
pub mod html;
pub mod node;
pub mod path;
pub mod style;
pub mod substitute;

pub use engine::render;
pub use node::RenderNode;
