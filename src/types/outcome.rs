use std::fmt;

use serde::Serialize;

use crate::error::ItineraryError;

/// One of the four sequential pipeline steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "day", rename_all = "snake_case")]
pub enum Stage {
    Summary,
    Daily(u32),
    Dining,
    Map,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Summary => f.write_str("summary"),
            Stage::Daily(day) => write!(f, "day {}", day),
            Stage::Dining => f.write_str("dining"),
            Stage::Map => f.write_str("map"),
        }
    }
}

/// Why a stage produced no usable section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_excerpt: Option<String>,
}

impl StageFailure {
    pub fn from_error(stage: Stage, error: &ItineraryError) -> Self {
        Self {
            stage,
            code: error.error_code(),
            message: error.to_string(),
            raw_excerpt: error.raw_excerpt().map(str::to_string),
        }
    }

    pub fn new(stage: Stage, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            code,
            message: message.into(),
            raw_excerpt: None,
        }
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed [{}]: {}", self.stage, self.code, self.message)
    }
}

/// A generated section, or the error tag that replaced it.
///
/// Consumers must check for `Failed` before trusting the content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ready(T),
    Failed(StageFailure),
}

impl<T> Outcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Outcome::Ready(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            Outcome::Ready(_) => None,
            Outcome::Failed(failure) => Some(failure),
        }
    }
}
