//! Verify the bundled gateway and print the report.
//!
//! Run with: `RUST_LOG=gateway_verifier=debug cargo run --example verify_gateway`

use std::sync::Arc;

use gateway_verifier::gateway::NoopCommit;
use gateway_verifier::gateways::BogusGateway;
use gateway_verifier::{FixtureBundle, Gateway, GatewayConfig, Verifier, VerifierConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let config = VerifierConfig::from_env()?;
    let report = Verifier::with_config(config).verify_gateway::<BogusGateway>()?;

    println!("{}", report.to_json_pretty()?);
    let issues = report.issues();
    if issues.is_empty() {
        println!("\n✅ {} is consistent", report.provider);
    } else {
        println!("\n❌ {} has {} issue(s):", report.provider, issues.len());
        for issue in &issues {
            println!("  - {}", issue);
        }
    }

    // Outside the verifier, a gateway built with a no-op commit step can be
    // driven by hand without reaching a processor.
    let gateway = BogusGateway::construct(
        GatewayConfig::synthetic(BogusGateway::credentials()),
        Arc::new(NoopCommit),
    )?;
    let fixtures = FixtureBundle::shared();
    let response = gateway.purchase(fixtures.money, &fixtures.credit_card, Some(&fixtures.options))?;
    println!("\nmanual purchase: {} ({})", response.success, response.message);
    Ok(())
}
