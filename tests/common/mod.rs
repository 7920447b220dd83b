//! Test gateways with deliberate defects.

#![allow(dead_code)]

use gateway_verifier::gateway::{
    Arity, CommitExecutor, CommitHandle, CommitRequest, Gateway, GatewayConfig, GatewayError,
    OperationRegistry, Response,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn commit(handle: &CommitHandle, action: &str) -> Result<Response, GatewayError> {
    handle.commit(&CommitRequest::new(action, json!({ "source": "test" })))
}

/// Counts commits that would have reached a processor.
pub static LIVE_COMMITS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
pub struct LiveCommit;

impl CommitExecutor for LiveCommit {
    fn commit(&self, request: &CommitRequest) -> Result<Response, GatewayError> {
        LIVE_COMMITS.fetch_add(1, Ordering::SeqCst);
        Ok(Response::new(true, format!("{} sent", request.action)))
    }
}

/// Declares `purchase` and `teleport`, implements an exact three-argument `purchase`.
#[derive(Debug)]
pub struct Teleporter {
    commit: CommitHandle,
}

impl Gateway for Teleporter {
    fn display_name() -> &'static str {
        "Teleporter"
    }

    fn supported_capabilities() -> Vec<String> {
        names(&["purchase", "teleport"])
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        Some(
            OperationRegistry::<Self>::inherit().operation("purchase", Arity::Exact(3), |gw, a| {
                a.money(0)?;
                a.credit_card(1)?;
                a.options(2)?;
                commit(&gw.commit, "sale")
            }),
        )
    }

    fn construct(_config: GatewayConfig, commit: CommitHandle) -> Result<Self, GatewayError> {
        Ok(Self { commit })
    }

    fn is_test(&self) -> bool {
        true
    }
}

/// `purchase(money, card, options = None)`.
#[derive(Debug)]
pub struct OptionalOptions {
    commit: CommitHandle,
}

impl Gateway for OptionalOptions {
    fn display_name() -> &'static str {
        "OptionalOptions"
    }

    fn supported_capabilities() -> Vec<String> {
        names(&["purchase"])
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        Some(OperationRegistry::<Self>::inherit().operation(
            "purchase",
            Arity::Trailing { required: 2 },
            |gw, a| {
                a.money(0)?;
                a.credit_card(1)?;
                a.optional_options(2)?;
                commit(&gw.commit, "sale")
            },
        ))
    }

    fn construct(_config: GatewayConfig, commit: CommitHandle) -> Result<Self, GatewayError> {
        Ok(Self { commit })
    }

    fn is_test(&self) -> bool {
        true
    }
}

/// Declares `purchase` but never registers it.
#[derive(Debug)]
pub struct Unimplemented;

impl Gateway for Unimplemented {
    fn display_name() -> &'static str {
        "Unimplemented"
    }

    fn supported_capabilities() -> Vec<String> {
        names(&["purchase", "void"])
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        Some(
            OperationRegistry::<Self>::inherit()
                .operation("void", Arity::Exact(2), |_, _| Ok(Response::new(true, "voided"))),
        )
    }

    fn construct(_config: GatewayConfig, _commit: CommitHandle) -> Result<Self, GatewayError> {
        Ok(Self)
    }

    fn is_test(&self) -> bool {
        true
    }
}

/// Commits, then fails inside `purchase`. Built with a [`LiveCommit`] outside the verifier.
#[derive(Debug)]
pub struct Raising {
    commit: CommitHandle,
}

impl Gateway for Raising {
    fn display_name() -> &'static str {
        "Raising"
    }

    fn supported_capabilities() -> Vec<String> {
        names(&["purchase"])
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        Some(
            OperationRegistry::<Self>::inherit().operation("purchase", Arity::Exact(3), |gw, _| {
                commit(&gw.commit, "sale")?;
                Err(GatewayError::Other("unexpected response from processor".into()))
            }),
        )
    }

    fn construct(_config: GatewayConfig, commit: CommitHandle) -> Result<Self, GatewayError> {
        Ok(Self { commit })
    }

    fn is_test(&self) -> bool {
        true
    }
}

/// Requires an `api_key` credential and rejects the placeholder value.
#[derive(Debug)]
pub struct PickyCredentials;

impl Gateway for PickyCredentials {
    fn display_name() -> &'static str {
        "PickyCredentials"
    }

    fn supported_capabilities() -> Vec<String> {
        names(&["purchase", "refund"])
    }

    fn credentials() -> Vec<&'static str> {
        vec!["api_key"]
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        Some(
            OperationRegistry::<Self>::inherit()
                .operation("api_key", Arity::Exact(0), |_, _| Ok(Response::new(true, "")))
                .operation("purchase", Arity::Exact(3), |_, _| Ok(Response::new(true, "")))
                .operation("refund", Arity::Exact(3), |_, _| Ok(Response::new(true, ""))),
        )
    }

    fn construct(config: GatewayConfig, _commit: CommitHandle) -> Result<Self, GatewayError> {
        let key = config.require("api_key")?;
        if !key.starts_with("sk_") {
            return Err(GatewayError::Other(format!("malformed api key '{}'", key)));
        }
        Ok(Self)
    }

    fn is_test(&self) -> bool {
        true
    }
}

/// Publishes no operation registry.
#[derive(Debug)]
pub struct Opaque;

impl Gateway for Opaque {
    fn display_name() -> &'static str {
        "Opaque"
    }

    fn supported_capabilities() -> Vec<String> {
        names(&["purchase", "store"])
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        None
    }

    fn construct(_config: GatewayConfig, _commit: CommitHandle) -> Result<Self, GatewayError> {
        Ok(Self)
    }

    fn is_test(&self) -> bool {
        true
    }
}

/// Shape problems: a two-argument `refund`, a catch-all `void(*args)`, an
/// undeclared `capture`, a helper `ping`, and a panicking `credit`.
#[derive(Debug)]
pub struct Sloppy {
    commit: CommitHandle,
}

impl Gateway for Sloppy {
    fn display_name() -> &'static str {
        "Sloppy"
    }

    fn supported_capabilities() -> Vec<String> {
        names(&["refund", "void", "credit"])
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        Some(
            OperationRegistry::<Self>::inherit()
                .operation("refund", Arity::Exact(2), |gw, _| commit(&gw.commit, "refund"))
                .operation("void", Arity::Trailing { required: 0 }, |gw, _| {
                    commit(&gw.commit, "void")
                })
                .operation("capture", Arity::Exact(3), |gw, a| {
                    a.authorization(1)?;
                    commit(&gw.commit, "capture")
                })
                .operation("credit", Arity::Exact(3), |_, _| {
                    panic!("credit is not wired up");
                })
                .operation("ping", Arity::Exact(0), |_, _| Ok(Response::new(true, "pong"))),
        )
    }

    fn construct(_config: GatewayConfig, commit: CommitHandle) -> Result<Self, GatewayError> {
        Ok(Self { commit })
    }

    fn is_test(&self) -> bool {
        true
    }
}

/// Tries to commit while being constructed.
#[derive(Debug)]
pub struct EagerCommit;

impl Gateway for EagerCommit {
    fn display_name() -> &'static str {
        "EagerCommit"
    }

    fn supported_capabilities() -> Vec<String> {
        names(&["store"])
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        Some(
            OperationRegistry::<Self>::inherit()
                .operation("store", Arity::Exact(2), |_, _| Ok(Response::new(true, ""))),
        )
    }

    fn construct(_config: GatewayConfig, commit: CommitHandle) -> Result<Self, GatewayError> {
        commit.commit(&CommitRequest::new("handshake", json!({})))?;
        Ok(Self)
    }

    fn is_test(&self) -> bool {
        true
    }
}

/// Declares nothing, implements `authorize`.
#[derive(Debug)]
pub struct Silent;

impl Gateway for Silent {
    fn display_name() -> &'static str {
        "Silent"
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        Some(
            OperationRegistry::<Self>::inherit()
                .operation("authorize", Arity::Exact(3), |_, _| Ok(Response::new(true, ""))),
        )
    }

    fn construct(_config: GatewayConfig, _commit: CommitHandle) -> Result<Self, GatewayError> {
        Ok(Self)
    }

    fn is_test(&self) -> bool {
        true
    }
}

/// Panics while being constructed.
#[derive(Debug)]
pub struct PanickyConstructor;

impl Gateway for PanickyConstructor {
    fn display_name() -> &'static str {
        "PanickyConstructor"
    }

    fn supported_capabilities() -> Vec<String> {
        names(&["purchase", "void"])
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        Some(
            OperationRegistry::<Self>::inherit()
                .operation("purchase", Arity::Exact(3), |_, _| Ok(Response::new(true, "")))
                .operation("void", Arity::Exact(2), |_, _| Ok(Response::new(true, ""))),
        )
    }

    fn construct(_config: GatewayConfig, _commit: CommitHandle) -> Result<Self, GatewayError> {
        panic!("constructor exploded");
    }

    fn is_test(&self) -> bool {
        true
    }
}
