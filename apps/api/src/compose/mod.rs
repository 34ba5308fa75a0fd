pub mod augment;
pub mod blocks;
pub mod defaults;

pub use augment::augment_template;
pub use blocks::{compose_resume_data, Basics, ContentBlock};
