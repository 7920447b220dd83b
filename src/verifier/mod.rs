//! 网关一致性校验引擎: 声明、实现与沙箱调用的交叉核对
//!
//! Verification engine. Cross-checks a gateway type's declared capabilities
//! against the catalog and its operation registry, then probes every implemented
//! capability inside a sandbox.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Verifier`] | Runs one verification pass per provider type |
//! | [`ProviderIntrospector`] | Declarations and public surface of a type |
//! | [`SandboxedInvoker`] | Disposable instance + commit suppression + probing |
//! | [`VerificationReport`] | Set classifications and per-capability findings |
//! | [`VerifierConfig`] | Probe and panic-capture switches |

pub mod config;
pub mod introspect;
pub mod report;
pub mod sandbox;

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::catalog::{Capability, CapabilityCatalog};
use crate::fixtures::FixtureBundle;
use crate::gateway::{Gateway, GatewayType, ProviderType};
use crate::Result;

pub use config::VerifierConfig;
pub use introspect::ProviderIntrospector;
pub use report::{CapabilityFinding, VerificationReport};
pub use sandbox::{inspect_arity, SandboxCommit, SandboxedInvoker, SuppressionGuard};

/// Set classification of declared names against the catalog and the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub unsupported_declarations: BTreeSet<String>,
    pub extra_surface_methods: BTreeSet<String>,
    pub missing_implementations: BTreeSet<String>,
    pub implemented_capabilities: BTreeSet<String>,
}

/// Pure set algebra over capability names.
pub fn classify(
    catalog: &BTreeSet<String>,
    declared: &BTreeSet<String>,
    surface: &BTreeSet<String>,
) -> Classification {
    let unsupported_declarations: BTreeSet<String> = declared.difference(catalog).cloned().collect();
    let valid_declarations: BTreeSet<String> =
        declared.difference(&unsupported_declarations).cloned().collect();
    let extra_surface_methods = surface.difference(&valid_declarations).cloned().collect();
    let missing_implementations = catalog
        .intersection(declared)
        .filter(|name| !surface.contains(*name))
        .cloned()
        .collect();
    let implemented_capabilities = catalog.intersection(surface).cloned().collect();

    Classification {
        unsupported_declarations,
        extra_surface_methods,
        missing_implementations,
        implemented_capabilities,
    }
}

/// Gateway conformance verifier.
///
/// Holds only read-only state, so one verifier can serve any number of passes.
#[derive(Debug, Clone)]
pub struct Verifier {
    catalog: CapabilityCatalog,
    fixtures: &'static FixtureBundle,
    config: VerifierConfig,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier {
    pub fn new() -> Self {
        Self::with_config(VerifierConfig::default())
    }

    pub fn with_config(config: VerifierConfig) -> Self {
        Self {
            catalog: CapabilityCatalog::new(),
            fixtures: FixtureBundle::shared(),
            config,
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.catalog
    }

    /// Verify a statically known gateway type.
    pub fn verify_gateway<G: Gateway>(&self) -> Result<VerificationReport> {
        self.verify(&GatewayType::<G>::new())
    }

    /// Run one verification pass.
    ///
    /// Provider defects never fail this call; they end up in the report. An error
    /// here means the verifier itself is inconsistent.
    pub fn verify(&self, provider: &dyn ProviderType) -> Result<VerificationReport> {
        let introspector = ProviderIntrospector::new(provider);
        let declared = introspector.declared_capabilities();
        let credentials = introspector.declared_credentials();
        let reflection_available = introspector.operation_listing().is_ok();
        let surface = introspector.public_surface();

        let catalog_names: BTreeSet<String> = self
            .catalog
            .capabilities()
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();
        let classes = classify(&catalog_names, &declared, &surface);

        let implemented_capabilities = self.to_capabilities(&classes.implemented_capabilities)?;
        let missing_implementations = self.to_capabilities(&classes.missing_implementations)?;

        // The provider is only constructed when something will be called on it.
        let sandbox = self
            .config
            .probe_callability
            .then(|| SandboxedInvoker::open(provider, self.config.capture_panics));
        let mut per_capability = BTreeMap::new();
        for capability in &implemented_capabilities {
            let finding = if let Some(ref sandbox) = sandbox {
                sandbox.probe(*capability, self.fixtures)
            } else {
                let (arity_correct, optional_trailing_argument) =
                    inspect_arity(provider, *capability);
                CapabilityFinding {
                    arity_correct,
                    optional_trailing_argument,
                    callable: false,
                    probed: false,
                    commits_suppressed: 0,
                    error: None,
                }
            };
            debug!(
                provider = provider.name(),
                capability = %capability,
                arity_correct = finding.arity_correct,
                callable = finding.callable,
                "capability probed"
            );
            per_capability.insert(*capability, finding);
        }

        let report = VerificationReport {
            provider: provider.name().to_string(),
            unsupported_declarations: classes.unsupported_declarations,
            extra_surface_methods: classes.extra_surface_methods,
            missing_implementations,
            implemented_capabilities,
            per_capability,
            declares_capabilities: !declared.is_empty(),
            declares_credentials: !credentials.is_empty(),
            reflection_available,
            constructible: sandbox.as_ref().map(|s| s.is_constructed()),
            construction_error: sandbox
                .as_ref()
                .and_then(|s| s.construction_error())
                .map(|e| e.to_string()),
        };

        info!(
            provider = %report.provider,
            implemented = report.implemented_capabilities.len(),
            missing = report.missing_implementations.len(),
            unsupported = report.unsupported_declarations.len(),
            extra = report.extra_surface_methods.len(),
            consistent = report.is_consistent(),
            "verification pass finished"
        );
        Ok(report)
    }

    /// Verify several provider types, one independent pass each.
    pub fn verify_all<I>(&self, providers: I) -> Result<Vec<VerificationReport>>
    where
        I: IntoIterator,
        I::Item: AsRef<dyn ProviderType>,
    {
        providers
            .into_iter()
            .map(|p| self.verify(p.as_ref()))
            .collect()
    }

    fn to_capabilities(&self, names: &BTreeSet<String>) -> Result<BTreeSet<Capability>> {
        names.iter().map(|name| name.parse::<Capability>()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classify_partitions_names() {
        let catalog = set(&["purchase", "refund", "void"]);
        let declared = set(&["purchase", "refund", "teleport"]);
        let surface = set(&["purchase", "void", "helper"]);

        let c = classify(&catalog, &declared, &surface);
        assert_eq!(c.unsupported_declarations, set(&["teleport"]));
        assert_eq!(c.extra_surface_methods, set(&["helper", "void"]));
        assert_eq!(c.missing_implementations, set(&["refund"]));
        assert_eq!(c.implemented_capabilities, set(&["purchase", "void"]));
    }

    #[test]
    fn classify_with_nothing_declared() {
        let catalog = set(&["purchase"]);
        let c = classify(&catalog, &BTreeSet::new(), &set(&["purchase"]));
        assert!(c.unsupported_declarations.is_empty());
        assert!(c.missing_implementations.is_empty());
        assert_eq!(c.implemented_capabilities, set(&["purchase"]));
        assert_eq!(c.extra_surface_methods, set(&["purchase"]));
    }
}
