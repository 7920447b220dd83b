//! Verification report types

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Capability;

/// Findings for one implemented capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityFinding {
    /// Absolute arity equals the template length.
    pub arity_correct: bool,
    /// The operation takes an optional or variadic final argument.
    pub optional_trailing_argument: bool,
    /// The sandboxed call returned without raising.
    pub callable: bool,
    /// Whether a sandboxed call was attempted at all.
    pub probed: bool,
    /// Commit requests swallowed during the probe.
    pub commits_suppressed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one verification pass over one provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub provider: String,
    /// Declared names outside the catalog.
    pub unsupported_declarations: BTreeSet<String>,
    /// Surface operations no valid declaration accounts for.
    pub extra_surface_methods: BTreeSet<String>,
    /// Declared catalog capabilities absent from the surface.
    pub missing_implementations: BTreeSet<Capability>,
    /// Catalog capabilities present on the surface, declared or not.
    pub implemented_capabilities: BTreeSet<Capability>,
    pub per_capability: BTreeMap<Capability, CapabilityFinding>,
    pub declares_capabilities: bool,
    pub declares_credentials: bool,
    pub reflection_available: bool,
    /// `None` when probing was disabled and no instance was built.
    pub constructible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construction_error: Option<String>,
}

impl VerificationReport {
    pub fn finding(&self, capability: Capability) -> Option<&CapabilityFinding> {
        self.per_capability.get(&capability)
    }

    /// Human-readable list of everything wrong with the provider.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.reflection_available {
            issues.push("provider exposes no operation registry".to_string());
        }
        if !self.declares_capabilities {
            issues.push("provider declares no capabilities".to_string());
        }
        if let Some(ref reason) = self.construction_error {
            issues.push(format!("provider cannot be constructed: {}", reason));
        }
        for name in &self.unsupported_declarations {
            issues.push(format!("declares unsupported capability '{}'", name));
        }
        for cap in &self.missing_implementations {
            issues.push(format!("declares '{}' but does not implement it", cap));
        }
        for name in &self.extra_surface_methods {
            issues.push(format!("public operation '{}' is not a declared capability", name));
        }
        for (cap, finding) in &self.per_capability {
            if !finding.arity_correct {
                issues.push(format!(
                    "'{}' does not take {} arguments",
                    cap,
                    cap.argument_template().len()
                ));
            }
            if finding.probed && !finding.callable {
                match finding.error {
                    Some(ref e) => issues.push(format!("'{}' failed when called: {}", cap, e)),
                    None => issues.push(format!("'{}' failed when called", cap)),
                }
            }
        }
        issues
    }

    /// No inconsistent declarations, no wrong arity, no failed probes.
    pub fn is_consistent(&self) -> bool {
        self.unsupported_declarations.is_empty()
            && self.missing_implementations.is_empty()
            && self.extra_surface_methods.is_empty()
            && self
                .per_capability
                .values()
                .all(|f| f.arity_correct && (!f.probed || f.callable))
    }

    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
