//! Modulo Standard Library

pub mod functions;

use modulo_plugin::{Candidate, Extensions, FunctionRegistry, RegistryConfig};
use std::sync::Arc;

/// Install the standard functions into an extension area.
///
/// Direct implementations come first, run-style plugins after them, which
/// fixes precedence if a later extension reuses one of these names.
pub fn install_standard_library(extensions: &Extensions) -> &Extensions {
    extensions
        .install(Candidate::direct("SinFunction", || functions::Sin))
        .install(Candidate::direct("CosFunction", || functions::Cos))
        .install(Candidate::direct("TanFunction", || functions::Tan))
        .install(Candidate::direct("SqrtFunction", || functions::Sqrt))
        .install(Candidate::direct("LogFunction", || functions::Log))
        .install(Candidate::direct("LnFunction", || functions::Ln))
        .install(Candidate::direct("CubeFunction", || functions::Cube))
        .install(Candidate::direct("AbsFunction", || functions::Abs))
        .install(Candidate::direct("SumFunction", || functions::Sum))
        .install(Candidate::direct("PrimeNumbers", || functions::NPrime))
        .install(Candidate::annotated("MaxFunction", || functions::Max))
        .install(Candidate::annotated("MinFunction", || functions::Min))
        .install(Candidate::annotated("AvgFunction", || functions::Avg))
        .install(Candidate::annotated("PowFunction", || functions::Pow))
        .install(Candidate::annotated("NthPrime", || functions::NthPrime))
}

/// Extension area holding only the standard library
pub fn standard_extensions() -> Arc<Extensions> {
    let extensions = Arc::new(Extensions::new());
    install_standard_library(&extensions);
    extensions
}

/// Registry over the standard library, already discovered
pub fn standard_registry() -> FunctionRegistry {
    standard_registry_with(RegistryConfig::default())
}

pub fn standard_registry_with(config: RegistryConfig) -> FunctionRegistry {
    let registry = FunctionRegistry::new(standard_extensions(), config);
    let report = registry.discover();
    tracing::debug!(functions = report.registered.len(), "standard library loaded");
    registry
}
