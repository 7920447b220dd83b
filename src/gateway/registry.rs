//! Static operation registry: the enumerable surface of a gateway type.

use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

use super::{Gateway, GatewayError, Response};
use crate::fixtures::{Argument, Arguments};

/// Operations every value answers to, whatever its type.
pub const OBJECT_OPERATIONS: &[&str] = &["to_string", "type_name"];

/// Operations every gateway inherits from the [`Gateway`] contract.
pub const BASE_CONTRACT_OPERATIONS: &[&str] = &[
    "display_name",
    "homepage_url",
    "supported_countries",
    "supported_card_types",
    "default_currency",
    "test",
];

/// Number of arguments an operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// `required` leading arguments followed by an optional or variadic tail.
    Trailing { required: usize },
}

impl Arity {
    /// Signed arity marker: `n` for exact, `-(required + 1)` for a trailing tail.
    pub fn marker(&self) -> i64 {
        match *self {
            Arity::Exact(n) => n as i64,
            Arity::Trailing { required } => -(required as i64 + 1),
        }
    }

    pub fn abs(&self) -> usize {
        self.marker().unsigned_abs() as usize
    }

    pub fn has_optional_tail(&self) -> bool {
        self.marker() < 0
    }

    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Trailing { required } => count >= required,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Trailing { required } => write!(f, "{}+", required),
        }
    }
}

type Handler<G> = Box<dyn Fn(&G, Arguments<'_>) -> Result<Response, GatewayError> + Send + Sync>;

pub struct Operation<G> {
    arity: Arity,
    handler: Handler<G>,
}

impl<G> Operation<G> {
    pub fn arity(&self) -> Arity {
        self.arity
    }
}

impl<G> fmt::Debug for Operation<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Name → operation table for one gateway type.
///
/// Built once per type through the builder methods. Names registered twice keep
/// the last definition, the way an override replaces an inherited method.
pub struct OperationRegistry<G> {
    operations: BTreeMap<String, Operation<G>>,
}

impl<G: Gateway> OperationRegistry<G> {
    /// An empty registry with nothing inherited.
    pub fn new() -> Self {
        Self {
            operations: BTreeMap::new(),
        }
    }

    /// A registry pre-populated with the object and base contract operations.
    pub fn inherit() -> Self {
        Self::new()
            .operation("to_string", Arity::Exact(0), |_, _| {
                Ok(Response::informational(json!(G::display_name())))
            })
            .operation("type_name", Arity::Exact(0), |_, _| {
                Ok(Response::informational(json!(std::any::type_name::<G>())))
            })
            .operation("display_name", Arity::Exact(0), |_, _| {
                Ok(Response::informational(json!(G::display_name())))
            })
            .operation("homepage_url", Arity::Exact(0), |_, _| {
                Ok(Response::informational(json!(G::homepage_url())))
            })
            .operation("supported_countries", Arity::Exact(0), |_, _| {
                Ok(Response::informational(json!(G::supported_countries())))
            })
            .operation("supported_card_types", Arity::Exact(0), |_, _| {
                Ok(Response::informational(json!(G::supported_card_types())))
            })
            .operation("default_currency", Arity::Exact(0), |_, _| {
                Ok(Response::informational(json!(G::default_currency())))
            })
            .operation("test", Arity::Exact(0), |gw, _| {
                Ok(Response::informational(json!(gw.is_test())))
            })
    }

    pub fn operation<F>(mut self, name: impl Into<String>, arity: Arity, handler: F) -> Self
    where
        F: Fn(&G, Arguments<'_>) -> Result<Response, GatewayError> + Send + Sync + 'static,
    {
        self.operations.insert(
            name.into(),
            Operation {
                arity,
                handler: Box::new(handler),
            },
        );
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Operation<G>> {
        self.operations.get(name)
    }

    pub fn arity(&self, name: &str) -> Option<Arity> {
        self.get(name).map(Operation::arity)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Invoke `name` on `gateway`, rejecting argument counts the arity does not accept.
    pub fn call(&self, gateway: &G, name: &str, args: &[Argument]) -> Result<Response, GatewayError> {
        let op = self
            .get(name)
            .ok_or_else(|| GatewayError::UnknownOperation { name: name.into() })?;
        if !op.arity.accepts(args.len()) {
            return Err(GatewayError::ArgumentCount {
                operation: name.into(),
                expected: op.arity,
                actual: args.len(),
            });
        }
        (op.handler)(gateway, Arguments::new(args))
    }
}

impl<G: Gateway> Default for OperationRegistry<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> fmt::Debug for OperationRegistry<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.operations.iter()).finish()
    }
}
