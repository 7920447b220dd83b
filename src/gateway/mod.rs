//! Gateway provider seam.
//!
//! A payment gateway implements [`Gateway`]: it declares the capabilities and
//! credentials it needs, publishes a static [`OperationRegistry`], and is built
//! from a [`GatewayConfig`] plus an injected commit executor.
//!
//! The verifier only ever sees gateways through the object-safe [`ProviderType`]
//! and [`ProviderInstance`] traits; [`GatewayType`] erases any `Gateway` into them
//! so an external loader can hand over `Box<dyn ProviderType>`.

pub mod commit;
pub mod registry;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::ArgumentKind;
use crate::fixtures::Argument;

pub use commit::{CommitExecutor, CommitHandle, CommitRequest, NoopCommit};
pub use registry::{Arity, Operation, OperationRegistry, BASE_CONTRACT_OPERATIONS, OBJECT_OPERATIONS};

/// Errors raised by a gateway while being built or invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Missing required credential '{field}'")]
    MissingCredential { field: String },

    #[error("Missing argument at position {index}")]
    MissingArgument { index: usize },

    #[error("Argument {index} has kind {actual:?}, expected {expected:?}")]
    ArgumentType {
        index: usize,
        expected: ArgumentKind,
        actual: ArgumentKind,
    },

    #[error("Wrong number of arguments for '{operation}' (given {actual}, expected {expected})")]
    ArgumentCount {
        operation: String,
        expected: Arity,
        actual: usize,
    },

    #[error("Undefined operation '{name}'")]
    UnknownOperation { name: String },

    #[error("Commit of '{action}' refused")]
    CommitRefused { action: String },

    #[error("Declined: {message}")]
    Declined { message: String },

    #[error("{0}")]
    Other(String),
}

/// Normalized gateway response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub test: bool,
}

impl Response {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            authorization: None,
            params: Value::Null,
            test: false,
        }
    }

    /// Successful response carrying a plain value and no processor message.
    pub fn informational(value: Value) -> Self {
        Self::new(true, "").with_params(value)
    }

    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }
}

/// Credentials plus the test-mode switch a gateway is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
    #[serde(default)]
    pub test: bool,
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder credentials: every field's value is its own name, test mode on.
    pub fn synthetic<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let credentials = fields
            .into_iter()
            .map(|f| (f.as_ref().to_string(), f.as_ref().to_string()))
            .collect();
        Self {
            credentials,
            test: true,
        }
    }

    pub fn with_credential(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.credentials.insert(field.into(), value.into());
        self
    }

    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    pub fn credential(&self, field: &str) -> Option<&str> {
        self.credentials.get(field).map(String::as_str)
    }

    pub fn require(&self, field: &str) -> Result<&str, GatewayError> {
        self.credential(field)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GatewayError::MissingCredential {
                field: field.to_string(),
            })
    }
}

/// Contract every gateway type implements.
///
/// The associated functions describe the type itself; [`Gateway::construct`]
/// builds an instance. Provided functions are the base contract every gateway
/// inherits and are exposed through [`OperationRegistry::inherit`].
pub trait Gateway: Sized + Send + Sync + 'static {
    fn display_name() -> &'static str;

    /// Capability names this gateway claims to implement. Not checked against the
    /// catalog; unknown names are reported as unsupported declarations.
    fn supported_capabilities() -> Vec<String> {
        Vec::new()
    }

    /// Credential fields required at construction.
    fn credentials() -> Vec<&'static str> {
        Vec::new()
    }

    fn homepage_url() -> Option<&'static str> {
        None
    }

    fn supported_countries() -> &'static [&'static str] {
        &[]
    }

    fn supported_card_types() -> &'static [&'static str] {
        &[]
    }

    fn default_currency() -> Option<&'static str> {
        None
    }

    /// Enumerable operation table, or `None` when the type publishes none.
    fn operations() -> Option<OperationRegistry<Self>>;

    fn construct(config: GatewayConfig, commit: CommitHandle) -> Result<Self, GatewayError>;

    fn is_test(&self) -> bool;
}

/// Object-safe view of a gateway type.
pub trait ProviderType: Send + Sync {
    fn name(&self) -> &str;

    fn declared_capabilities(&self) -> Vec<String>;

    fn declared_credentials(&self) -> Vec<String>;

    /// All registered operation names, or `None` if the type has no registry.
    fn operation_names(&self) -> Option<Vec<String>>;

    fn arity(&self, operation: &str) -> Option<Arity>;

    fn construct(
        &self,
        config: GatewayConfig,
        commit: CommitHandle,
    ) -> Result<Box<dyn ProviderInstance>, GatewayError>;
}

/// A live gateway instance.
pub trait ProviderInstance: Send {
    fn invoke(&self, operation: &str, args: &[Argument]) -> Result<Response, GatewayError>;
}

/// Erases a [`Gateway`] implementation into a [`ProviderType`].
pub struct GatewayType<G: Gateway> {
    registry: Option<Arc<OperationRegistry<G>>>,
    _marker: PhantomData<fn() -> G>,
}

impl<G: Gateway> GatewayType<G> {
    pub fn new() -> Self {
        Self {
            registry: G::operations().map(Arc::new),
            _marker: PhantomData,
        }
    }

    pub fn boxed() -> Box<dyn ProviderType> {
        Box::new(Self::new())
    }
}

impl<G: Gateway> Default for GatewayType<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Gateway> fmt::Debug for GatewayType<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayType")
            .field("name", &G::display_name())
            .field("registry", &self.registry)
            .finish()
    }
}

impl<G: Gateway> ProviderType for GatewayType<G> {
    fn name(&self) -> &str {
        G::display_name()
    }

    fn declared_capabilities(&self) -> Vec<String> {
        G::supported_capabilities()
    }

    fn declared_credentials(&self) -> Vec<String> {
        G::credentials().into_iter().map(String::from).collect()
    }

    fn operation_names(&self) -> Option<Vec<String>> {
        self.registry
            .as_ref()
            .map(|r| r.names().map(String::from).collect())
    }

    fn arity(&self, operation: &str) -> Option<Arity> {
        self.registry.as_ref().and_then(|r| r.arity(operation))
    }

    fn construct(
        &self,
        config: GatewayConfig,
        commit: CommitHandle,
    ) -> Result<Box<dyn ProviderInstance>, GatewayError> {
        let gateway = G::construct(config, commit)?;
        Ok(Box::new(GatewayInstance {
            gateway,
            registry: self.registry.clone(),
        }))
    }
}

struct GatewayInstance<G: Gateway> {
    gateway: G,
    registry: Option<Arc<OperationRegistry<G>>>,
}

impl<G: Gateway> ProviderInstance for GatewayInstance<G> {
    fn invoke(&self, operation: &str, args: &[Argument]) -> Result<Response, GatewayError> {
        match &self.registry {
            Some(registry) => registry.call(&self.gateway, operation, args),
            None => Err(GatewayError::UnknownOperation {
                name: operation.to_string(),
            }),
        }
    }
}
