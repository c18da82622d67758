//! Modulo Plugin System
//!
//! Provides the pieces that make functions pluggable:
//! - `CalcFunction`: the capability contract every callable function meets
//! - `RunPlugin` + `FunctionAdapter`: metadata-plus-`run` plugins bridged to that contract
//! - `Extensions`: the explicit extension area that discovery scans
//! - `FunctionRegistry`: unique-name registration, discovery, hot reload

mod adapter;
mod checked;
mod config;
mod extensions;
mod registry;
mod traits;

pub use adapter::{FunctionAdapter, RUN};
pub use config::{RegistryConfig, DISABLED_FUNCTIONS_ENV};
pub use extensions::{Candidate, Extensions};
pub use registry::{DiscoveryFailure, DiscoveryReport, FunctionRegistry, FunctionSet};
pub use traits::{CalcFunction, FunctionDescriptor, FunctionMeta, Operation, RunPlugin};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        CalcFunction, Candidate, Extensions, FunctionAdapter, FunctionDescriptor, FunctionMeta,
        FunctionRegistry, FunctionSet, Operation, RunPlugin, RUN,
    };
    pub use modulo_core::prelude::*;
}
