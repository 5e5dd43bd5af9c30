// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for logger construction and level parsing.

use thiserror::Error;

/// Logger construction was missing a required piece of configuration.
///
/// Construction fails fast: there is no usable partially-configured logger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required builder field was never supplied.
    #[error("missing required `{0}` for logger construction")]
    MissingField(&'static str),
}

/// A level name could not be recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log level `{0}`")]
pub struct ParseLevelError(pub(crate) String);
