//! Event-driven HTML rewriting.
//!
//! A [`HtmlPipeline`] parses a document with [`arbor_html::HtmlParser`] and
//! hands every parser event to an ordered list of [`Processor`]s, which
//! rewrite the tree while it is still being built. The result is the
//! serialized document element.
//!
//! Two processors ship with the crate, both configured from JSON:
//!
//! - `"attribute"` ([`AttributeProcessor`]): add or delete one attribute on
//!   every element matching a selector.
//! - `"element"` ([`ElementProcessor`]): remove matching elements, or remove
//!   everything except them.
//!
//! ```
//! use arbor_pipeline::HtmlPipeline;
//!
//! let mut pipeline = HtmlPipeline::from_json(
//!     r#"[{ "processor": "element", "params": { "selectors": "script", "action": "remove" } }]"#,
//! )
//! .unwrap();
//! let html = pipeline.process("<p>hi<script>x()</script></p>").unwrap();
//! assert_eq!(html, "<html><body><p>hi</p></body></html>");
//! ```

/// Pipeline errors.
pub mod error;
/// Parameter helpers shared by the processors.
pub mod params;
/// The pipeline driver.
pub mod pipeline;
/// The processor trait and the registry of built-in processors.
pub mod processor;
/// Built-in processors.
pub mod processors;

pub use error::PipelineError;
pub use pipeline::HtmlPipeline;
pub use processor::{Processor, ProcessorKind, ProcessorOption};
pub use processors::{AttributeProcessor, ElementProcessor};
