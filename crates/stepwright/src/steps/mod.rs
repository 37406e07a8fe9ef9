// Step phrases - Natural-language sentences bound to behavior

pub mod dispatcher;
pub mod pattern;

pub use dispatcher::{StepDispatcher, StepFuture, StepHandler};
pub use pattern::StepPattern;
