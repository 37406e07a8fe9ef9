// Public API types module
//
// Configuration types consumed by session providers. These carry no behavior
// of their own beyond validation and conversion.

pub mod launch_options;

pub use launch_options::{BrowserKind, LaunchOptions, WindowSize};
