//! The extension area scanned by discovery
//!
//! Candidates are registered explicitly as factories instead of being found by
//! type scanning. The area may change while the process runs; the registry
//! picks changes up on its next `reload()`.

use crate::adapter::panic_message;
use crate::{CalcFunction, FunctionAdapter, FunctionDescriptor, RunPlugin};
use modulo_core::CalcError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

type DirectFactory = Arc<dyn Fn() -> Result<Box<dyn CalcFunction>, CalcError> + Send + Sync>;
type AnnotatedFactory = Arc<dyn Fn() -> Result<Box<dyn RunPlugin>, CalcError> + Send + Sync>;

/// The two shapes a discoverable function can take
#[derive(Clone)]
enum Shape {
    /// Implements `CalcFunction` directly
    Direct(DirectFactory),
    /// Metadata plus a `run` operation, wrapped by `FunctionAdapter`
    Annotated(AnnotatedFactory),
}

/// One entry of the extension area
#[derive(Clone)]
pub struct Candidate {
    label: String,
    shape: Shape,
}

impl Candidate {
    pub fn direct<F, C>(label: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: CalcFunction + 'static,
    {
        Self::try_direct(label, move || Ok(Box::new(factory()) as Box<dyn CalcFunction>))
    }

    pub fn try_direct<F>(label: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn CalcFunction>, CalcError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            shape: Shape::Direct(Arc::new(factory)),
        }
    }

    pub fn annotated<F, P>(label: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: RunPlugin + 'static,
    {
        Self::try_annotated(label, move || Ok(Box::new(factory()) as Box<dyn RunPlugin>))
    }

    pub fn try_annotated<F>(label: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn RunPlugin>, CalcError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            shape: Shape::Annotated(Arc::new(factory)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self.shape, Shape::Annotated(_))
    }

    /// Build a fresh function from this candidate.
    ///
    /// A factory that fails or panics yields a `Configuration` error for this
    /// candidate only.
    pub fn instantiate(&self) -> Result<FunctionDescriptor, CalcError> {
        let built = panic::catch_unwind(AssertUnwindSafe(|| match &self.shape {
            Shape::Direct(factory) => factory().map(FunctionDescriptor::from),
            Shape::Annotated(factory) => {
                let plugin = factory()?;
                let adapter = FunctionAdapter::new(plugin.as_ref())?;
                Ok(Arc::new(adapter) as FunctionDescriptor)
            }
        }));

        match built {
            Ok(result) => result,
            Err(payload) => Err(CalcError::configuration(
                &self.label,
                format!("instantiation panicked: {}", panic_message(&*payload)),
            )),
        }
    }
}

impl std::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("label", &self.label)
            .field("annotated", &self.is_annotated())
            .finish()
    }
}

/// Ordered, shared set of installed candidates
#[derive(Debug, Default)]
pub struct Extensions {
    candidates: RwLock<Vec<Candidate>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate. Install order is discovery order.
    pub fn install(&self, candidate: Candidate) -> &Self {
        tracing::debug!(label = candidate.label(), "installing extension candidate");
        self.candidates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(candidate);
        self
    }

    /// Remove every candidate with this label. Returns how many were removed.
    pub fn uninstall(&self, label: &str) -> usize {
        let mut candidates = self.candidates.write().unwrap_or_else(PoisonError::into_inner);
        let before = candidates.len();
        candidates.retain(|c| c.label != label);
        let removed = before - candidates.len();
        if removed > 0 {
            tracing::debug!(label, removed, "uninstalled extension candidate");
        }
        removed
    }

    /// Copy of the current candidate list, in install order
    pub fn candidates(&self) -> Vec<Candidate> {
        self.candidates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.candidates.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FunctionMeta, Operation};
    use modulo_core::{Arity, ErrorKind, Value};

    struct Double;

    impl CalcFunction for Double {
        fn name(&self) -> &str {
            "double"
        }

        fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
            Ok(args[0] * 2.0)
        }
    }

    struct Add;

    impl RunPlugin for Add {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta::new("add", "add(")
        }

        fn operations(&self) -> Vec<Operation> {
            vec![Operation::new("run", &["a", "b"], |args| Ok(Value::from(args[0] + args[1])))]
        }
    }

    #[test]
    fn test_direct_candidate() {
        let c = Candidate::direct("Double", || Double);
        assert!(!c.is_annotated());
        let f = c.instantiate().unwrap();
        assert_eq!(f.name(), "double");
        assert_eq!(f.invoke(&[4.0]).unwrap(), 8.0);
    }

    #[test]
    fn test_annotated_candidate_is_adapted() {
        let c = Candidate::annotated("Add", || Add);
        assert!(c.is_annotated());
        let f = c.instantiate().unwrap();
        assert_eq!(f.name(), "add");
        assert_eq!(f.arity(), Arity::Fixed(2));
        assert_eq!(f.invoke(&[1.0, 2.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_failing_factory() {
        let c = Candidate::try_direct("Broken", || {
            Err(CalcError::configuration("Broken", "no default constructor"))
        });
        let Err(err) = c.instantiate() else { panic!("expected instantiate() to fail") };
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
    }

    #[test]
    fn test_panicking_factory_is_contained() {
        let c = Candidate::try_direct("Exploding", || panic!("constructor blew up"));
        let Err(err) = c.instantiate() else { panic!("expected instantiate() to fail") };
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        assert!(err.to_string().contains("Exploding"));
        assert!(err.to_string().contains("constructor blew up"));
    }

    #[test]
    fn test_install_and_uninstall() {
        let ext = Extensions::new();
        assert!(ext.is_empty());
        ext.install(Candidate::direct("Double", || Double))
            .install(Candidate::annotated("Add", || Add));
        assert_eq!(ext.len(), 2);

        let labels: Vec<String> = ext.candidates().iter().map(|c| c.label().to_string()).collect();
        assert_eq!(labels, vec!["Double", "Add"]);

        assert_eq!(ext.uninstall("Double"), 1);
        assert_eq!(ext.uninstall("Double"), 0);
        assert_eq!(ext.len(), 1);
    }
}
