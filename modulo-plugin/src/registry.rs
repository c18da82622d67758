//! Function Registry
//!
//! Holds the ordered set of registered functions. Every change builds a new
//! [`FunctionSet`] privately and publishes it with a single atomic swap, so a
//! reader that took a snapshot keeps a consistent view for its whole call and
//! never sees a half-populated list.

use crate::checked::CheckedFunction;
use crate::{CalcFunction, Extensions, FunctionDescriptor, RegistryConfig};
use arc_swap::ArcSwap;
use modulo_core::{CalcError, ErrorKind};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Immutable, insertion-ordered set of functions with unique names
#[derive(Clone, Default)]
pub struct FunctionSet {
    functions: Vec<FunctionDescriptor>,
}

impl FunctionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `function` unless its name is taken. The existing entry always wins.
    ///
    /// The stored entry checks the argument count and catches panics on every
    /// `invoke`, whoever calls it.
    pub fn insert(&mut self, function: FunctionDescriptor) -> Result<(), CalcError> {
        validate_name(function.name())?;
        if self.contains(function.name()) {
            return Err(CalcError::duplicate(function.name()));
        }
        self.functions.push(CheckedFunction::wrap(function));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name()).collect()
    }

    pub fn to_vec(&self) -> Vec<FunctionDescriptor> {
        self.functions.clone()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A name must work as the call prefix `name(`
fn validate_name(name: &str) -> Result<(), CalcError> {
    if name.is_empty() {
        return Err(CalcError::configuration(name, "function name is empty"));
    }
    if name.chars().any(|c| c.is_whitespace() || matches!(c, '(' | ')' | ',')) {
        return Err(CalcError::configuration(
            name,
            "function name must not contain whitespace, parentheses or commas",
        ));
    }
    Ok(())
}

/// A candidate that could not be loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryFailure {
    pub candidate: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of one discovery pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscoveryReport {
    /// Newly registered names, in registration order
    pub registered: Vec<String>,
    /// Names rejected because an earlier registration holds them
    pub duplicates: Vec<String>,
    /// Names skipped by configuration
    pub disabled: Vec<String>,
    pub failures: Vec<DiscoveryFailure>,
}

/// Central function registry
pub struct FunctionRegistry {
    extensions: Arc<Extensions>,
    config: RegistryConfig,
    current: ArcSwap<FunctionSet>,
    generation: AtomicU64,
    /// Serializes writers; readers never take it
    writer: Mutex<()>,
}

impl FunctionRegistry {
    /// Create an empty registry over `extensions`. Nothing is registered until
    /// [`discover`](Self::discover) or [`register`](Self::register) runs.
    pub fn new(extensions: Arc<Extensions>, config: RegistryConfig) -> Self {
        Self {
            extensions,
            config,
            current: ArcSwap::from_pointee(FunctionSet::new()),
            generation: AtomicU64::new(0),
            writer: Mutex::new(()),
        }
    }

    pub fn extensions(&self) -> &Arc<Extensions> {
        &self.extensions
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register every candidate of the extension area on top of the current set
    pub fn discover(&self) -> DiscoveryReport {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut set = FunctionSet::clone(&self.current.load());
        let report = self.scan(&mut set);
        self.publish(set, &report);
        report
    }

    /// Drop all registrations and discover again, published as one swap
    pub fn reload(&self) -> DiscoveryReport {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut set = FunctionSet::new();
        let report = self.scan(&mut set);
        self.publish(set, &report);
        report
    }

    /// Register a single function. A name collision keeps the existing entry
    /// and returns `DuplicateName`, which callers treat as a warning.
    pub fn register(&self, function: FunctionDescriptor) -> Result<(), CalcError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut set = FunctionSet::clone(&self.current.load());
        let name = function.name().to_string();
        let arity = function.arity();

        if let Err(err) = set.insert(function) {
            tracing::warn!(function = %name, error = %err, "registration rejected");
            return Err(err);
        }

        self.current.store(Arc::new(set));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(function = %name, %arity, generation, "registered function");
        Ok(())
    }

    /// Registered functions in registration order
    pub fn list(&self) -> Vec<FunctionDescriptor> {
        self.current.load().to_vec()
    }

    /// The currently published set. Evaluation captures this once per call.
    pub fn snapshot(&self) -> Arc<FunctionSet> {
        self.current.load_full()
    }

    /// Incremented on every publish
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn scan(&self, set: &mut FunctionSet) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();

        for candidate in self.extensions.candidates() {
            let function = match candidate.instantiate() {
                Ok(f) => f,
                Err(err) => {
                    tracing::warn!(candidate = candidate.label(), error = %err, "failed loading plugin");
                    report.failures.push(DiscoveryFailure {
                        candidate: candidate.label().to_string(),
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let name = function.name().to_string();
            if self.config.is_disabled(&name) {
                tracing::debug!(function = %name, "function disabled by configuration");
                report.disabled.push(name);
                continue;
            }

            let arity = function.arity();
            match set.insert(function) {
                Ok(()) => {
                    tracing::debug!(function = %name, %arity, candidate = candidate.label(), "registered function");
                    report.registered.push(name);
                }
                Err(CalcError::DuplicateName { .. }) => {
                    tracing::warn!(
                        function = %name,
                        candidate = candidate.label(),
                        "duplicate function name, keeping the earlier registration"
                    );
                    report.duplicates.push(name);
                }
                Err(err) => {
                    tracing::warn!(candidate = candidate.label(), error = %err, "failed loading plugin");
                    report.failures.push(DiscoveryFailure {
                        candidate: candidate.label().to_string(),
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                }
            }
        }

        report
    }

    fn publish(&self, set: FunctionSet, report: &DiscoveryReport) {
        let total = set.len();
        self.current.store(Arc::new(set));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(
            total,
            registered = report.registered.len(),
            duplicates = report.duplicates.len(),
            failures = report.failures.len(),
            generation,
            "function discovery complete"
        );
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(Extensions::new()), RegistryConfig::default())
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &*self.current.load())
            .field("generation", &self.generation())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalcFunction, Candidate, FunctionMeta, Operation, RunPlugin};
    use modulo_core::{Arity, Value};
    use std::thread;

    struct Scaled {
        name: &'static str,
        factor: f64,
    }

    impl CalcFunction for Scaled {
        fn name(&self) -> &str {
            self.name
        }

        fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
            Ok(args[0] * self.factor)
        }
    }

    struct Panicky;

    impl CalcFunction for Panicky {
        fn name(&self) -> &str {
            "panicky"
        }

        fn invoke(&self, _args: &[f64]) -> Result<f64, CalcError> {
            panic!("integer division by zero")
        }
    }

    struct Max;

    impl RunPlugin for Max {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta::new("max", "max(")
        }

        fn operations(&self) -> Vec<Operation> {
            vec![Operation::new("run", &["a", "b"], |args| Ok(Value::from(args[0].max(args[1]))))]
        }
    }

    struct Runless;

    impl RunPlugin for Runless {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta::new("runless", "runless(")
        }

        fn operations(&self) -> Vec<Operation> {
            Vec::new()
        }
    }

    fn scaled(name: &'static str, factor: f64) -> Candidate {
        Candidate::direct(name, move || Scaled { name, factor })
    }

    fn registry_with(candidates: Vec<Candidate>) -> FunctionRegistry {
        let ext = Arc::new(Extensions::new());
        for c in candidates {
            ext.install(c);
        }
        FunctionRegistry::new(ext, RegistryConfig::default())
    }

    #[test]
    fn test_created_empty() {
        let registry = registry_with(vec![scaled("double", 2.0)]);
        assert!(registry.is_empty());
        assert_eq!(registry.generation(), 0);
    }

    #[test]
    fn test_discover_registers_both_shapes_in_order() {
        let registry = registry_with(vec![
            scaled("double", 2.0),
            Candidate::annotated("Max", || Max),
            scaled("triple", 3.0),
        ]);
        let report = registry.discover();

        assert_eq!(report.registered, vec!["double", "max", "triple"]);
        assert_eq!(registry.snapshot().names(), vec!["double", "max", "triple"]);
        assert_eq!(registry.snapshot().get("max").unwrap().arity(), Arity::Fixed(2));
    }

    #[test]
    fn test_first_registered_wins() {
        let registry = registry_with(vec![scaled("twice", 2.0), scaled("twice", 20.0)]);
        let report = registry.discover();

        assert_eq!(report.registered, vec!["twice"]);
        assert_eq!(report.duplicates, vec!["twice"]);

        let list = registry.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].invoke(&[1.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let registry = FunctionRegistry::default();
        registry.register(Arc::new(Scaled { name: "half", factor: 0.5 })).unwrap();

        let err = registry
            .register(Arc::new(Scaled { name: "half", factor: 99.0 }))
            .unwrap_err();
        assert_eq!(err, CalcError::duplicate("half"));

        let list = registry.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].invoke(&[4.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_listed_functions_check_arguments() {
        let registry = registry_with(vec![scaled("double", 2.0), Candidate::annotated("Max", || Max)]);
        registry.discover();

        let list = registry.list();
        assert_eq!(
            list[0].invoke(&[]).unwrap_err(),
            CalcError::arity_mismatch("double", Arity::Fixed(1), 0)
        );
        assert_eq!(
            list[1].invoke(&[]).unwrap_err(),
            CalcError::arity_mismatch("max", Arity::Fixed(2), 0)
        );
        assert_eq!(list[0].invoke(&[4.0]).unwrap(), 8.0);
    }

    #[test]
    fn test_panicking_function_fails_the_call_only() {
        let registry = FunctionRegistry::default();
        registry.register(Arc::new(Scaled { name: "double", factor: 2.0 })).unwrap();
        registry.register(Arc::new(Panicky)).unwrap();

        let snapshot = registry.snapshot();
        let err = snapshot.get("panicky").unwrap().invoke(&[1.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvocationFailure);
        assert!(err.to_string().contains("division by zero"));
        assert_eq!(snapshot.get("double").unwrap().invoke(&[3.0]).unwrap(), 6.0);
    }

    #[test]
    fn test_register_rejects_unusable_names() {
        let registry = FunctionRegistry::default();
        for name in ["", "two words", "f(x)", "a,b"] {
            let err = registry.register(Arc::new(Scaled { name, factor: 1.0 })).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigurationError, "name {:?}", name);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_prefix_names_do_not_collide() {
        let registry = registry_with(vec![scaled("sin", 1.0), scaled("sint", 1.0)]);
        registry.discover();
        assert_eq!(registry.snapshot().names(), vec!["sin", "sint"]);
    }

    #[test]
    fn test_bad_candidates_do_not_abort_discovery() {
        let registry = registry_with(vec![
            scaled("double", 2.0),
            Candidate::annotated("Runless", || Runless),
            Candidate::try_direct("Panicky", || panic!("cannot construct")),
            scaled("triple", 3.0),
        ]);
        let report = registry.discover();

        assert_eq!(report.registered, vec!["double", "triple"]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].candidate, "Runless");
        assert_eq!(report.failures[0].kind, ErrorKind::ConfigurationError);
        assert_eq!(report.failures[1].candidate, "Panicky");
    }

    #[test]
    fn test_disabled_functions_are_skipped() {
        let ext = Arc::new(Extensions::new());
        ext.install(scaled("double", 2.0)).install(scaled("triple", 3.0));
        let registry = FunctionRegistry::new(ext, RegistryConfig::with_disabled_list("double"));

        let report = registry.discover();
        assert_eq!(report.disabled, vec!["double"]);
        assert_eq!(registry.snapshot().names(), vec!["triple"]);
    }

    #[test]
    fn test_reload_is_idempotent() {
        let registry = registry_with(vec![
            scaled("double", 2.0),
            Candidate::annotated("Max", || Max),
            scaled("double", 5.0),
        ]);

        registry.reload();
        let first: Vec<String> = registry.list().iter().map(|f| f.name().to_string()).collect();
        registry.reload();
        let second: Vec<String> = registry.list().iter().map(|f| f.name().to_string()).collect();

        assert_eq!(first, vec!["double", "max"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_discover_twice_reports_duplicates_but_reload_does_not() {
        let registry = registry_with(vec![scaled("double", 2.0)]);
        registry.discover();

        let again = registry.discover();
        assert!(again.registered.is_empty());
        assert_eq!(again.duplicates, vec!["double"]);
        assert_eq!(registry.len(), 1);

        let reloaded = registry.reload();
        assert_eq!(reloaded.registered, vec!["double"]);
        assert!(reloaded.duplicates.is_empty());
    }

    #[test]
    fn test_reload_picks_up_extension_changes() {
        let registry = registry_with(vec![scaled("double", 2.0)]);
        registry.reload();
        assert_eq!(registry.snapshot().names(), vec!["double"]);

        registry.extensions().install(Candidate::annotated("Max", || Max));
        registry.extensions().uninstall("double");
        registry.reload();
        assert_eq!(registry.snapshot().names(), vec!["max"]);
    }

    #[test]
    fn test_reload_drops_manual_registrations() {
        let registry = registry_with(vec![scaled("double", 2.0)]);
        registry.register(Arc::new(Scaled { name: "half", factor: 0.5 })).unwrap();
        registry.discover();
        assert_eq!(registry.snapshot().names(), vec!["half", "double"]);

        registry.reload();
        assert_eq!(registry.snapshot().names(), vec!["double"]);
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let registry = registry_with(vec![scaled("double", 2.0)]);
        registry.reload();
        let before = registry.snapshot();
        let generation = registry.generation();

        registry.extensions().uninstall("double");
        registry.reload();

        assert_eq!(before.names(), vec!["double"]);
        assert!(registry.snapshot().is_empty());
        assert_eq!(registry.generation(), generation + 1);
    }

    #[test]
    fn test_readers_never_see_partial_lists() {
        let candidates: Vec<Candidate> = (0..20)
            .map(|i| {
                let name: &'static str = Box::leak(format!("f{}", i).into_boxed_str());
                scaled(name, i as f64)
            })
            .collect();
        let registry = registry_with(candidates);
        registry.reload();

        thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..50 {
                    registry.reload();
                }
            });
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..200 {
                        assert_eq!(registry.snapshot().len(), 20);
                    }
                });
            }
        });
    }
}
