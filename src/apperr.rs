// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{fmt, io, result};

pub type Result<T> = result::Result<T, Error>;

/// The pipeline stage an [`Error`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Categories,
    Widths,
    Classification,
    Optimizer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Stage::Fetch => "fetch",
            Stage::Categories => "category table",
            Stage::Widths => "width table",
            Stage::Classification => "width classification",
            Stage::Optimizer => "interval optimizer",
        })
    }
}

#[derive(Debug)]
pub enum Error {
    /// The source could not be retrieved or decoded.
    Retrieval { source: String, message: String },
    /// A record did not have the expected shape or a field failed to parse.
    Format { stage: Stage, line: usize, text: String, message: String },
    /// An internal consistency check failed. This is always a logic defect.
    InvariantViolation { stage: Stage, code_point: Option<u32>, message: String },
    /// The optimizer was handed zero intervals.
    EmptyInput { stage: Stage },
}

impl Error {
    pub fn retrieval(source: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Retrieval { source: source.into(), message: message.to_string() }
    }

    pub fn format(stage: Stage, line: usize, text: &str, message: impl fmt::Display) -> Self {
        Error::Format { stage, line, text: text.to_string(), message: message.to_string() }
    }

    pub fn invariant(stage: Stage, code_point: Option<u32>, message: impl fmt::Display) -> Self {
        Error::InvariantViolation { stage, code_point, message: message.to_string() }
    }

    pub fn stage(&self) -> Stage {
        match *self {
            Error::Retrieval { .. } => Stage::Fetch,
            Error::Format { stage, .. }
            | Error::InvariantViolation { stage, .. }
            | Error::EmptyInput { stage } => stage,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Retrieval { source, message } => {
                write!(f, "{}: failed to retrieve {source}: {message}", Stage::Fetch)
            }
            Error::Format { stage, line, text, message } => {
                write!(f, "{stage}: line {line}: {message} in {text:?}")
            }
            Error::InvariantViolation { stage, code_point: Some(cp), message } => {
                write!(f, "{stage}: invariant violated at U+{cp:04X}: {message}")
            }
            Error::InvariantViolation { stage, code_point: None, message } => {
                write!(f, "{stage}: invariant violated: {message}")
            }
            Error::EmptyInput { stage } => write!(f, "{stage}: no intervals to process"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::retrieval("input", err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let source = err.url().map(|u| u.to_string()).unwrap_or_else(|| "request".to_string());
        Error::retrieval(source, err)
    }
}
