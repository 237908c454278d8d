mod attribute;
mod element;

pub use attribute::{AttributeAction, AttributeParams, AttributeProcessor, AttributeSpec};
pub use element::{ElementAction, ElementParams, ElementProcessor};
