//! Synthetic fixtures used as probe arguments.
//!
//! Every value here is a fixed literal test value. Nothing is user-supplied and the
//! payment instrument is the well-known test card number, so a probe can never move
//! real funds even if a provider ignores test mode.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::catalog::ArgumentKind;
use crate::gateway::GatewayError;

/// Amount in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub number: String,
    pub month: u8,
    pub year: u16,
    pub first_name: String,
    pub last_name: String,
    pub verification_value: String,
    pub brand: String,
}

impl CreditCard {
    /// Last four digits, the only part a gateway should echo back.
    pub fn last_digits(&self) -> &str {
        let start = self
            .number
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(index, _)| index);
        &self.number[start..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub company: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: Option<String>,
    pub fax: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOptions {
    pub order_id: String,
    pub description: String,
    pub billing_address: Option<Address>,
}

/// A single synthetic argument handed to a provider operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    Money(Money),
    PaymentInstrument(CreditCard),
    Options(GatewayOptions),
    Authorization(String),
    CustomerReference(String),
}

impl Argument {
    pub fn kind(&self) -> ArgumentKind {
        match self {
            Self::Money(_) => ArgumentKind::Money,
            Self::PaymentInstrument(_) => ArgumentKind::PaymentInstrument,
            Self::Options(_) => ArgumentKind::Options,
            Self::Authorization(_) => ArgumentKind::Authorization,
            Self::CustomerReference(_) => ArgumentKind::CustomerReference,
        }
    }
}

/// Positional argument list with typed accessors for operation handlers.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a>(&'a [Argument]);

impl<'a> Arguments<'a> {
    pub fn new(args: &'a [Argument]) -> Self {
        Self(args)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Argument> {
        self.0.get(index)
    }

    fn fetch(&self, index: usize) -> Result<&'a Argument, GatewayError> {
        self.0.get(index).ok_or(GatewayError::MissingArgument { index })
    }

    pub fn money(&self, index: usize) -> Result<Money, GatewayError> {
        match self.fetch(index)? {
            Argument::Money(m) => Ok(*m),
            other => Err(mismatch(index, ArgumentKind::Money, other)),
        }
    }

    pub fn credit_card(&self, index: usize) -> Result<&'a CreditCard, GatewayError> {
        match self.fetch(index)? {
            Argument::PaymentInstrument(card) => Ok(card),
            other => Err(mismatch(index, ArgumentKind::PaymentInstrument, other)),
        }
    }

    pub fn options(&self, index: usize) -> Result<&'a GatewayOptions, GatewayError> {
        match self.fetch(index)? {
            Argument::Options(opts) => Ok(opts),
            other => Err(mismatch(index, ArgumentKind::Options, other)),
        }
    }

    /// Options at `index`, or `None` when the optional tail was omitted.
    pub fn optional_options(&self, index: usize) -> Result<Option<&'a GatewayOptions>, GatewayError> {
        match self.0.get(index) {
            None => Ok(None),
            Some(Argument::Options(opts)) => Ok(Some(opts)),
            Some(other) => Err(mismatch(index, ArgumentKind::Options, other)),
        }
    }

    pub fn authorization(&self, index: usize) -> Result<&'a str, GatewayError> {
        match self.fetch(index)? {
            Argument::Authorization(token) => Ok(token),
            other => Err(mismatch(index, ArgumentKind::Authorization, other)),
        }
    }

    pub fn customer_reference(&self, index: usize) -> Result<&'a str, GatewayError> {
        match self.fetch(index)? {
            Argument::CustomerReference(id) => Ok(id),
            other => Err(mismatch(index, ArgumentKind::CustomerReference, other)),
        }
    }
}

fn mismatch(index: usize, expected: ArgumentKind, actual: &Argument) -> GatewayError {
    GatewayError::ArgumentType {
        index,
        expected,
        actual: actual.kind(),
    }
}

/// Deterministic synthetic values shared by every probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureBundle {
    pub money: Money,
    pub credit_card: CreditCard,
    pub options: GatewayOptions,
    pub authorization: String,
    pub customer_reference: String,
}

static SHARED: Lazy<FixtureBundle> = Lazy::new(FixtureBundle::new);

impl FixtureBundle {
    /// Fixed expiry year; keeps the bundle identical across runs.
    pub const EXPIRY_YEAR: u16 = 2099;

    pub fn new() -> Self {
        Self {
            money: Money(1200),
            credit_card: CreditCard {
                number: "4242424242424242".into(),
                month: 9,
                year: Self::EXPIRY_YEAR,
                first_name: "Test".into(),
                last_name: "User".into(),
                verification_value: "123".into(),
                brand: "visa".into(),
            },
            options: GatewayOptions {
                order_id: "1".into(),
                description: "Store Purchase".into(),
                billing_address: Some(Address {
                    name: "Jim Smith".into(),
                    address1: "1234 My Street".into(),
                    address2: Some("Apt 1".into()),
                    company: Some("Widgets Inc".into()),
                    city: "Ottawa".into(),
                    state: "ON".into(),
                    zip: "K1C2N6".into(),
                    country: "CA".into(),
                    phone: Some("(555)555-5555".into()),
                    fax: Some("(555)555-6666".into()),
                }),
            },
            authorization: "auth".into(),
            customer_reference: "customer_id".into(),
        }
    }

    /// Process-wide memoized bundle.
    pub fn shared() -> &'static FixtureBundle {
        &SHARED
    }

    pub fn argument(&self, kind: ArgumentKind) -> Argument {
        match kind {
            ArgumentKind::Money => Argument::Money(self.money),
            ArgumentKind::PaymentInstrument => Argument::PaymentInstrument(self.credit_card.clone()),
            ArgumentKind::Options => Argument::Options(self.options.clone()),
            ArgumentKind::Authorization => Argument::Authorization(self.authorization.clone()),
            ArgumentKind::CustomerReference => {
                Argument::CustomerReference(self.customer_reference.clone())
            }
        }
    }

    /// Materialize a template into concrete arguments, preserving order.
    pub fn arguments(&self, template: &[ArgumentKind]) -> Vec<Argument> {
        template.iter().map(|kind| self.argument(*kind)).collect()
    }
}

impl Default for FixtureBundle {
    fn default() -> Self {
        Self::new()
    }
}
