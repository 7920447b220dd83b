//! Sandboxed invocation of gateway capabilities.
//!
//! One [`SandboxedInvoker`] owns one disposable gateway instance for one
//! verification pass. The instance is built with synthetic test credentials and a
//! [`SandboxCommit`] executor, so it can never reach a real commit step. Commits
//! are only acknowledged while a probe is in flight; outside of one they are refused.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::report::CapabilityFinding;
use crate::catalog::Capability;
use crate::error::Error;
use crate::fixtures::FixtureBundle;
use crate::gateway::{
    CommitExecutor, CommitRequest, GatewayConfig, GatewayError, ProviderInstance, ProviderType,
    Response,
};

/// Commit executor handed to the disposable instance.
#[derive(Debug, Default)]
pub struct SandboxCommit {
    suppressing: AtomicBool,
    suppressed: AtomicUsize,
}

impl SandboxCommit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total commits swallowed so far.
    pub fn suppressed(&self) -> usize {
        self.suppressed.load(Ordering::SeqCst)
    }

    pub fn is_suppressing(&self) -> bool {
        self.suppressing.load(Ordering::SeqCst)
    }

    /// Acknowledge commits until the returned guard is dropped.
    pub fn suppress(&self) -> SuppressionGuard<'_> {
        self.suppressing.store(true, Ordering::SeqCst);
        SuppressionGuard { commit: self }
    }
}

impl CommitExecutor for SandboxCommit {
    fn commit(&self, request: &CommitRequest) -> Result<Response, GatewayError> {
        if !self.is_suppressing() {
            return Err(GatewayError::CommitRefused {
                action: request.action.clone(),
            });
        }
        self.suppressed.fetch_add(1, Ordering::SeqCst);
        debug!(action = %request.action, "commit suppressed");
        Ok(Response::new(true, "").with_test(true))
    }
}

/// Scope of one probe. Re-arms commit refusal on drop, including on unwind.
#[must_use]
pub struct SuppressionGuard<'a> {
    commit: &'a SandboxCommit,
}

impl Drop for SuppressionGuard<'_> {
    fn drop(&mut self) {
        self.commit.suppressing.store(false, Ordering::SeqCst);
    }
}

pub struct SandboxedInvoker<'a> {
    provider: &'a dyn ProviderType,
    instance: Result<Box<dyn ProviderInstance>, Error>,
    commit: Arc<SandboxCommit>,
    capture_panics: bool,
}

impl<'a> SandboxedInvoker<'a> {
    /// Build the disposable instance for this pass. Construction failure is kept
    /// and reported by every later probe.
    pub fn open(provider: &'a dyn ProviderType, capture_panics: bool) -> Self {
        let commit = Arc::new(SandboxCommit::new());
        let config = GatewayConfig::synthetic(provider.declared_credentials());
        let instance = construct(provider, config, commit.clone(), capture_panics);
        if let Err(ref e) = instance {
            warn!("{}", e);
        }
        Self {
            provider,
            instance,
            commit,
            capture_panics,
        }
    }

    pub fn is_constructed(&self) -> bool {
        self.instance.is_ok()
    }

    pub fn construction_error(&self) -> Option<&Error> {
        self.instance.as_ref().err()
    }

    pub fn commits_suppressed(&self) -> usize {
        self.commit.suppressed()
    }

    /// Arity findings only: `(arity_correct, optional_trailing_argument)`.
    pub fn inspect_arity(&self, capability: Capability) -> (bool, bool) {
        inspect_arity(self.provider, capability)
    }

    /// Arity check plus one sandboxed call with synthetic arguments.
    pub fn probe(&self, capability: Capability, fixtures: &FixtureBundle) -> CapabilityFinding {
        let (arity_correct, optional_trailing_argument) = self.inspect_arity(capability);
        let mut finding = CapabilityFinding {
            arity_correct,
            optional_trailing_argument,
            callable: false,
            probed: true,
            commits_suppressed: 0,
            error: None,
        };

        let instance = match self.instance {
            Ok(ref instance) => instance,
            Err(ref e) => {
                finding.error = Some(e.to_string());
                return finding;
            }
        };

        let args = fixtures.arguments(capability.argument_template());
        let before = self.commit.suppressed();
        let outcome = {
            let _guard = self.commit.suppress();
            self.invoke(&**instance, capability.as_str(), &args)
        };
        finding.commits_suppressed = self.commit.suppressed() - before;

        match outcome {
            Ok(_) => finding.callable = true,
            Err(e) => {
                warn!(provider = self.provider.name(), "{}", e);
                finding.error = Some(e.to_string());
            }
        }
        finding
    }

    fn invoke(
        &self,
        instance: &dyn ProviderInstance,
        operation: &str,
        args: &[crate::fixtures::Argument],
    ) -> Result<Response, Error> {
        let result = if self.capture_panics {
            panic::catch_unwind(AssertUnwindSafe(|| instance.invoke(operation, args)))
                .unwrap_or_else(|payload| Err(GatewayError::Other(panic_message(payload))))
        } else {
            instance.invoke(operation, args)
        };
        result.map_err(|e| Error::InvocationFailed {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Arity findings read from the registry alone. Never builds an instance.
pub fn inspect_arity(provider: &dyn ProviderType, capability: Capability) -> (bool, bool) {
    match provider.arity(capability.as_str()) {
        Some(arity) => (
            arity.abs() == capability.argument_template().len(),
            arity.has_optional_tail(),
        ),
        None => (false, false),
    }
}

fn construct(
    provider: &dyn ProviderType,
    config: GatewayConfig,
    commit: Arc<SandboxCommit>,
    capture_panics: bool,
) -> Result<Box<dyn ProviderInstance>, Error> {
    let result = if capture_panics {
        panic::catch_unwind(AssertUnwindSafe(|| provider.construct(config, commit)))
            .unwrap_or_else(|payload| Err(GatewayError::Other(panic_message(payload))))
    } else {
        provider.construct(config, commit)
    };
    result.map_err(|e| Error::ProviderConstructionFailed {
        provider: provider.name().to_string(),
        reason: e.to_string(),
    })
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commit_is_refused_outside_a_probe() {
        let commit = SandboxCommit::new();
        let request = CommitRequest::new("sale", json!({}));
        assert_eq!(
            commit.commit(&request),
            Err(GatewayError::CommitRefused { action: "sale".into() })
        );
        assert_eq!(commit.suppressed(), 0);
    }

    #[test]
    fn guard_scopes_suppression() {
        let commit = SandboxCommit::new();
        let request = CommitRequest::new("auth", json!({}));
        {
            let _guard = commit.suppress();
            assert!(commit.commit(&request).unwrap().success);
            assert!(commit.commit(&request).is_ok());
        }
        assert!(!commit.is_suppressing());
        assert_eq!(commit.suppressed(), 2);
        assert!(commit.commit(&request).is_err());
    }

    #[test]
    fn guard_reverts_on_unwind() {
        let commit = SandboxCommit::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = commit.suppress();
            panic!("provider blew up");
        }));
        assert!(result.is_err());
        assert!(!commit.is_suppressing());
    }

    #[test]
    fn panic_messages() {
        assert_eq!(panic_message(Box::new("x")), "panicked: x");
        assert_eq!(panic_message(Box::new(String::from("y"))), "panicked: y");
        assert_eq!(panic_message(Box::new(3_u8)), "panicked");
    }

    #[test]
    fn arity_is_read_without_an_instance() {
        use crate::gateway::GatewayType;
        use crate::gateways::BogusGateway;

        let provider = GatewayType::<BogusGateway>::new();
        assert_eq!(inspect_arity(&provider, Capability::Purchase), (true, true));
        assert_eq!(inspect_arity(&provider, Capability::Void), (true, true));
    }
}
