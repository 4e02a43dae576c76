//! Suite definitions - explicit registries of role-tagged methods
//!
//! A suite is registered once, up front, as a table of named method bodies.
//! The engine reads that table through [`SuiteDefinition`] and never needs
//! to know the concrete suite type.

use crate::assert::Failure;
use crate::marker::Marker;
use crate::SuiteResult;
use serde::Serialize;
use std::any::Any;

/// A type-erased suite instance
pub type Instance = Box<dyn Any>;

/// Position of a method in its suite's declaration table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MethodId(pub usize);

/// A method as declared by a suite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMethod {
    pub id: MethodId,
    pub name: String,
    /// `None` for helpers the engine must ignore
    pub marker: Option<Marker>,
}

/// The engine's read-only view of a suite
pub trait SuiteDefinition {
    /// Name shown in suite headers
    fn name(&self) -> &str;

    /// Every declared method, tagged or not, in declaration order
    fn declared_methods(&self) -> SuiteResult<Vec<DeclaredMethod>>;

    /// Construct a fresh suite instance
    fn instantiate(&self) -> Result<Instance, Failure>;

    /// Invoke one method against an instance produced by [`instantiate`]
    ///
    /// [`instantiate`]: SuiteDefinition::instantiate
    fn invoke(&self, method: MethodId, instance: &mut Instance) -> Result<(), Failure>;
}

type Body<S> = Box<dyn Fn(&mut S) -> Result<(), Failure>>;

struct Method<S> {
    name: String,
    marker: Option<Marker>,
    body: Body<S>,
}

/// A suite over instances of `S`, built from a constructor and a method table
///
/// ```
/// use rigor_core::{assert_true, Suite};
///
/// #[derive(Default)]
/// struct Counter {
///     hits: u32,
/// }
///
/// let suite = Suite::new("Counter", Counter::default)
///     .case_setup("reset", |c| {
///         c.hits = 0;
///         Ok(())
///     })
///     .test("starts_empty", |c| assert_true(c.hits == 0));
/// assert_eq!(suite.len(), 2);
/// ```
pub struct Suite<S> {
    name: String,
    factory: Box<dyn Fn() -> S>,
    methods: Vec<Method<S>>,
}

impl<S: 'static> Suite<S> {
    /// Create an empty suite whose instances come from `factory`
    pub fn new(name: impl Into<String>, factory: impl Fn() -> S + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Box::new(factory),
            methods: Vec::new(),
        }
    }

    /// Register a method with an optional marker
    pub fn method<F>(mut self, name: impl Into<String>, marker: Option<Marker>, body: F) -> Self
    where
        F: Fn(&mut S) -> Result<(), Failure> + 'static,
    {
        self.methods.push(Method {
            name: name.into(),
            marker,
            body: Box::new(body),
        });
        self
    }

    pub fn test<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut S) -> Result<(), Failure> + 'static,
    {
        self.method(name, Some(Marker::Test), body)
    }

    pub fn suite_setup<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut S) -> Result<(), Failure> + 'static,
    {
        self.method(name, Some(Marker::SuiteSetup), body)
    }

    pub fn suite_teardown<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut S) -> Result<(), Failure> + 'static,
    {
        self.method(name, Some(Marker::SuiteTeardown), body)
    }

    pub fn case_setup<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut S) -> Result<(), Failure> + 'static,
    {
        self.method(name, Some(Marker::CaseSetup), body)
    }

    pub fn case_teardown<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut S) -> Result<(), Failure> + 'static,
    {
        self.method(name, Some(Marker::CaseTeardown), body)
    }

    /// Register an untagged method, invisible to the engine
    pub fn helper<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut S) -> Result<(), Failure> + 'static,
    {
        self.method(name, None, body)
    }

    /// Number of registered methods, tagged or not
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<S: 'static> SuiteDefinition for Suite<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_methods(&self) -> SuiteResult<Vec<DeclaredMethod>> {
        Ok(self
            .methods
            .iter()
            .enumerate()
            .map(|(index, method)| DeclaredMethod {
                id: MethodId(index),
                name: method.name.clone(),
                marker: method.marker,
            })
            .collect())
    }

    fn instantiate(&self) -> Result<Instance, Failure> {
        Ok(Box::new((self.factory)()))
    }

    fn invoke(&self, method: MethodId, instance: &mut Instance) -> Result<(), Failure> {
        let entry = self.methods.get(method.0).ok_or_else(|| {
            Failure::new(format!("{} has no method #{}", self.name, method.0))
        })?;
        let state = (**instance)
            .downcast_mut::<S>()
            .ok_or_else(|| Failure::new(format!("instance does not belong to {}", self.name)))?;
        (entry.body)(state)
    }
}
