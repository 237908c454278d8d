use arbor_css::SelectorError;
use arbor_html::ParseError;
use thiserror::Error;

use crate::processor::ProcessorKind;

/// Errors raised while configuring or running a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration named a processor that does not exist.
    #[error("unknown processor {0:?}")]
    UnknownProcessor(String),

    /// A processor's `params` did not fit its schema.
    #[error("invalid parameters for the {kind} processor")]
    InvalidParams {
        /// The processor being configured.
        kind: ProcessorKind,
        /// What serde rejected.
        #[source]
        source: serde_json::Error,
    },

    /// The pipeline configuration was not valid JSON of the expected shape.
    #[error("invalid pipeline configuration")]
    Config(#[source] serde_json::Error),

    /// The input could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A selector could not be evaluated during processing.
    #[error(transparent)]
    Selector(#[from] SelectorError),
}
