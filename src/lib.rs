//! # gateway-verifier
//!
//! 支付网关一致性校验器：核对网关声明的能力、实际实现的操作以及沙箱调用结果。
//!
//! Conformance verifier for payment gateway implementations.
//!
//! ## Overview
//!
//! A gateway declares which capabilities it supports (purchase, authorize, capture,
//! void, credit, recurring, refund, store, unstore, update). The verifier checks
//! that declaration against what the gateway actually exposes, checks each
//! implemented operation's arity against the canonical argument template, and
//! calls each one with synthetic test data inside a sandbox where the gateway's
//! commit step is suppressed.
//!
//! ## Core Ideas
//!
//! - **Registry, not reflection**: gateways publish a static [`OperationRegistry`]
//! - **Injected commit step**: gateways finalize through a [`CommitExecutor`]; the
//!   sandbox hands the disposable instance one that performs no external effect
//! - **Report, don't fail**: provider defects become report fields, never errors
//!
//! ## Quick Start
//!
//! ```rust
//! use gateway_verifier::{gateways::BogusGateway, Verifier};
//!
//! let report = Verifier::new().verify_gateway::<BogusGateway>()?;
//! assert!(report.is_consistent());
//! println!("{}", report.to_json_pretty()?);
//! # Ok::<(), gateway_verifier::Error>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Capability names and argument templates |
//! | [`fixtures`] | Deterministic synthetic probe arguments |
//! | [`gateway`] | Gateway trait, operation registry, commit seam |
//! | [`gateways`] | Bundled reference gateway |
//! | [`verifier`] | Introspection, sandboxed probing, report assembly |

pub mod catalog;
pub mod fixtures;
pub mod gateway;
pub mod gateways;
pub mod verifier;

pub use catalog::{ArgumentKind, Capability, CapabilityCatalog};
pub use fixtures::FixtureBundle;
pub use gateway::{
    Arity, CommitExecutor, CommitHandle, CommitRequest, Gateway, GatewayConfig, GatewayError,
    GatewayType, OperationRegistry, ProviderInstance, ProviderType, Response,
};
pub use verifier::{CapabilityFinding, VerificationReport, Verifier, VerifierConfig};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
