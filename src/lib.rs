//! Reference-counted resources and per-instance objects for PPAPI plugins.
//!
//! [`Resource`] owns one host reference and keeps the host's count in step
//! with Rust ownership. [`Instance`] keeps the interface-name registry that
//! lets host callbacks, which only carry a [`PpInstance`](ffi::PpInstance),
//! find the object implementing them. Both reach the host through services
//! injected by the [`Module`].

pub mod browser;
pub mod config;
pub mod entry;
pub mod error;
pub mod instance;
pub mod invariant;
pub mod macros;
pub mod module;
pub mod resource;
pub mod service;

#[cfg(test)]
mod testing;

pub use pp_ffi as ffi;

pub use browser::{BrowserCore, Core, ResourceCounter};
pub use config::{FaultAttitude, PluginConfig};
pub use error::{PpError, PpResult, Violation};
pub use instance::{Instance, InstanceHandler, ObjectRef, PerInstanceObject};
pub use module::{InstanceDirectory, Module};
pub use resource::Resource;
