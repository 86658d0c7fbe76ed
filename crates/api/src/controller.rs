//! Stage results for handlers that run as a fixed pipeline
//! (validate input, check permissions, act, respond).
//!
//! A stage either hands its output to the next stage or ends the request
//! with a finished response, e.g. a redirect. Errors still travel through
//! `AppResult`.

use axum::response::{IntoResponse, Response};

/// Outcome of one pipeline stage.
#[derive(Debug)]
pub enum Flow<T> {
    /// Carry on with the next stage.
    Continue(T),
    /// Stop here and send this response.
    Terminal(Response),
}

impl<T> Flow<T> {
    /// End the pipeline with `response`.
    pub fn terminal(response: impl IntoResponse) -> Self {
        Flow::Terminal(response.into_response())
    }

    /// Transform the carried value, leaving a terminal response untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Flow<U> {
        match self {
            Flow::Continue(value) => Flow::Continue(f(value)),
            Flow::Terminal(response) => Flow::Terminal(response),
        }
    }
}

/// Unwrap a [`Flow`], returning its terminal response from the enclosing
/// handler.
#[macro_export]
macro_rules! proceed {
    ($flow:expr) => {
        match $flow {
            $crate::controller::Flow::Continue(value) => value,
            $crate::controller::Flow::Terminal(response) => return Ok(response),
        }
    };
}
