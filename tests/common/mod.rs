//! Integration test common infrastructure.
//!
//! Provides a runtime with the builtin handlers wired to a capturing output
//! sink, and an observer queue for asserting on published events.

pub mod observer;
pub mod runtime;

#[allow(unused_imports)]
pub use observer::Observer;
#[allow(unused_imports)]
pub use runtime::{Captured, TestRuntime};
