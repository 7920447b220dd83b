//! Capability catalog: the closed set of operations a payment gateway may support.
//!
//! Each [`Capability`] carries a canonical argument template, the ordered list of
//! synthetic argument kinds used when probing it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Standard capability identifiers.
///
/// Declaration order is catalog order, so ordered collections of capabilities
/// iterate the same way the catalog does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Purchase,
    Authorize,
    Capture,
    Void,
    Credit,
    Recurring,
    Refund,
    Store,
    Unstore,
    Update,
}

/// Kind of a synthetic argument in a capability's template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    Money,
    PaymentInstrument,
    Options,
    /// Placeholder authorization token from an earlier authorize/purchase.
    Authorization,
    /// Placeholder external reference, e.g. a stored customer id.
    CustomerReference,
}

use ArgumentKind::*;

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::Purchase,
        Capability::Authorize,
        Capability::Capture,
        Capability::Void,
        Capability::Credit,
        Capability::Recurring,
        Capability::Refund,
        Capability::Store,
        Capability::Unstore,
        Capability::Update,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Authorize => "authorize",
            Self::Capture => "capture",
            Self::Void => "void",
            Self::Credit => "credit",
            Self::Recurring => "recurring",
            Self::Refund => "refund",
            Self::Store => "store",
            Self::Unstore => "unstore",
            Self::Update => "update",
        }
    }

    /// Look up a capability by its operation name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cap| cap.as_str() == name)
    }

    /// Canonical argument template used for synthetic invocation.
    pub fn argument_template(&self) -> &'static [ArgumentKind] {
        match self {
            Self::Purchase | Self::Authorize | Self::Credit | Self::Recurring => {
                &[Money, PaymentInstrument, Options]
            }
            Self::Capture | Self::Refund => &[Money, Authorization, Options],
            Self::Void => &[Authorization, Options],
            Self::Store => &[PaymentInstrument, Options],
            // Assumed shape; mirrors the leading argument of `update`.
            Self::Unstore => &[CustomerReference, Options],
            Self::Update => &[CustomerReference, PaymentInstrument, Options],
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::unknown_capability(s))
    }
}

/// Read-only view over the capability catalog. Cheap to copy and safe to share
/// between verification passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityCatalog;

impl CapabilityCatalog {
    pub fn new() -> Self {
        Self
    }

    /// All known capabilities, in catalog order.
    pub fn capabilities(&self) -> &'static [Capability] {
        &Capability::ALL
    }

    pub fn contains(&self, name: &str) -> bool {
        Capability::from_name(name).is_some()
    }

    /// Argument template for a capability name.
    pub fn argument_template(&self, name: &str) -> crate::Result<&'static [ArgumentKind]> {
        let capability: Capability = name.parse()?;
        Ok(capability.argument_template())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_names() {
        let names: Vec<&str> = CapabilityCatalog::new()
            .capabilities()
            .iter()
            .map(Capability::as_str)
            .collect();
        assert_eq!(
            names,
            vec![
                "purchase",
                "authorize",
                "capture",
                "void",
                "credit",
                "recurring",
                "refund",
                "store",
                "unstore",
                "update"
            ]
        );
    }

    #[test]
    fn test_argument_templates() {
        let catalog = CapabilityCatalog::new();
        assert_eq!(
            catalog.argument_template("purchase").unwrap(),
            &[Money, PaymentInstrument, Options]
        );
        assert_eq!(
            catalog.argument_template("capture").unwrap(),
            &[Money, Authorization, Options]
        );
        assert_eq!(catalog.argument_template("void").unwrap(), &[Authorization, Options]);
        assert_eq!(
            catalog.argument_template("unstore").unwrap(),
            &[CustomerReference, Options]
        );
        assert_eq!(catalog.argument_template("update").unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_capability_is_an_error() {
        let err = CapabilityCatalog::new()
            .argument_template("teleport")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCapability { ref name } if name == "teleport"));
    }

    #[test]
    fn test_serde_names_match_operation_names() {
        for cap in Capability::ALL {
            let json = serde_json::to_value(cap).unwrap();
            assert_eq!(json, serde_json::Value::String(cap.as_str().to_string()));
        }
    }
}
