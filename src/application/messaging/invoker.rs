//! Handler invocation - runs a handler and classifies how it ended

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::application::errors::HandlerError;
use crate::domain::entities::{Args, Descriptor, Principal};

/// How a handler call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The handler returned its success flag
    Returned(bool),
    /// The handler raised a user-facing command error
    CommandError(String),
    /// Anything else, including a panic inside the handler
    Unexpected(String),
}

/// Call the descriptor's handler, catching panics
pub fn invoke(descriptor: &Descriptor, principal: &Principal, args: &Args) -> Invocation {
    let handler = &descriptor.handler;
    match panic::catch_unwind(AssertUnwindSafe(|| handler(principal, args))) {
        Ok(Ok(result)) => Invocation::Returned(result),
        Ok(Err(HandlerError::Command(text))) => Invocation::CommandError(text),
        Ok(Err(HandlerError::Internal(detail))) => Invocation::Unexpected(detail),
        Err(payload) => Invocation::Unexpected(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("handler panicked: {}", s)
    } else {
        "handler panicked".to_string()
    }
}
