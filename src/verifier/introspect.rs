//! Provider introspection: declarations and the callable surface of a gateway type.

use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::error::Error;
use crate::gateway::{ProviderType, BASE_CONTRACT_OPERATIONS, OBJECT_OPERATIONS};
use crate::Result;

/// Reads a provider type's declarations and operation registry.
pub struct ProviderIntrospector<'a> {
    provider: &'a dyn ProviderType,
}

impl<'a> ProviderIntrospector<'a> {
    pub fn new(provider: &'a dyn ProviderType) -> Self {
        Self { provider }
    }

    /// Capability names the provider claims, catalog or not.
    pub fn declared_capabilities(&self) -> BTreeSet<String> {
        let declared: BTreeSet<String> = self.provider.declared_capabilities().into_iter().collect();
        if declared.is_empty() {
            debug!(provider = self.provider.name(), "provider declares no capabilities");
        }
        declared
    }

    pub fn declared_credentials(&self) -> BTreeSet<String> {
        self.provider.declared_credentials().into_iter().collect()
    }

    /// Every registered operation name, inherited ones included.
    pub fn operation_listing(&self) -> Result<BTreeSet<String>> {
        self.provider
            .operation_names()
            .map(|names| names.into_iter().collect())
            .ok_or_else(|| Error::ReflectionUnavailable {
                provider: self.provider.name().to_string(),
            })
    }

    /// Operations the provider itself adds: the listing minus object operations,
    /// base contract operations and credential accessors. Empty when the provider
    /// has no registry.
    pub fn public_surface(&self) -> BTreeSet<String> {
        let listing = match self.operation_listing() {
            Ok(listing) => listing,
            Err(e) => {
                warn!("{}", e);
                return BTreeSet::new();
            }
        };
        let credentials = self.declared_credentials();
        listing
            .into_iter()
            .filter(|name| !OBJECT_OPERATIONS.contains(&name.as_str()))
            .filter(|name| !BASE_CONTRACT_OPERATIONS.contains(&name.as_str()))
            .filter(|name| !credentials.contains(name))
            .collect()
    }
}
