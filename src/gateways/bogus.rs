//! Bogus gateway: a complete, conforming test gateway.
//!
//! Implements every catalog capability, routes all effects through the injected
//! commit executor, and never contacts a processor on its own. The card number
//! [`DECLINED_CARD`] is always declined so callers can exercise failure paths.

use serde_json::{json, Value};

use crate::fixtures::{CreditCard, GatewayOptions, Money};
use crate::gateway::{
    Arity, CommitHandle, CommitRequest, Gateway, GatewayConfig, GatewayError, OperationRegistry,
    Response,
};

const AUTHORIZATION: &str = "53433";

pub const DECLINED_CARD: &str = "4000000000000002";

#[derive(Debug)]
pub struct BogusGateway {
    login: String,
    password: String,
    test: bool,
    commit: CommitHandle,
}

impl BogusGateway {
    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn purchase(
        &self,
        money: Money,
        card: &CreditCard,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.charge("sale", money, card, options)
    }

    pub fn authorize(
        &self,
        money: Money,
        card: &CreditCard,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.charge("auth", money, card, options)
    }

    pub fn capture(
        &self,
        money: Money,
        authorization: &str,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.follow_up("capture", Some(money), authorization, options)
    }

    pub fn refund(
        &self,
        money: Money,
        authorization: &str,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.follow_up("refund", Some(money), authorization, options)
    }

    pub fn void(
        &self,
        authorization: &str,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.follow_up("void", None, authorization, options)
    }

    pub fn credit(
        &self,
        money: Money,
        card: &CreditCard,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.charge("credit", money, card, options)
    }

    pub fn recurring(
        &self,
        money: Money,
        card: &CreditCard,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.charge("recurring", money, card, options)
    }

    pub fn store(
        &self,
        card: &CreditCard,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.vault("store", None, Some(card), options)
    }

    pub fn unstore(
        &self,
        customer_id: &str,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.vault("unstore", Some(customer_id), None, options)
    }

    pub fn update(
        &self,
        customer_id: &str,
        card: &CreditCard,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        self.vault("update", Some(customer_id), Some(card), options)
    }

    fn charge(
        &self,
        action: &str,
        money: Money,
        card: &CreditCard,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        if money.0 == 0 {
            return Err(GatewayError::Declined {
                message: "amount must be positive".into(),
            });
        }
        if card.number == DECLINED_CARD {
            return Err(GatewayError::Declined {
                message: "card declined".into(),
            });
        }
        let mut params = json!({
            "amount": money.0,
            "card": card.last_digits(),
            "brand": card.brand,
        });
        add_order(&mut params, options);
        self.commit(action, params)
    }

    fn follow_up(
        &self,
        action: &str,
        money: Option<Money>,
        authorization: &str,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        if authorization.is_empty() {
            return Err(GatewayError::Declined {
                message: "authorization required".into(),
            });
        }
        let mut params = json!({ "authorization": authorization });
        if let Some(money) = money {
            params["amount"] = json!(money.0);
        }
        add_order(&mut params, options);
        self.commit(action, params)
    }

    fn vault(
        &self,
        action: &str,
        customer_id: Option<&str>,
        card: Option<&CreditCard>,
        options: Option<&GatewayOptions>,
    ) -> Result<Response, GatewayError> {
        let mut params = json!({});
        if let Some(id) = customer_id {
            params["customer_id"] = json!(id);
        }
        if let Some(card) = card {
            params["card"] = json!(card.last_digits());
        }
        add_order(&mut params, options);
        self.commit(action, params)
    }

    fn commit(&self, action: &str, mut params: Value) -> Result<Response, GatewayError> {
        params["login"] = json!(self.login);
        params["password"] = json!(self.password);
        let response = self.commit.commit(&CommitRequest::new(action, params))?;
        Ok(response
            .with_authorization(AUTHORIZATION)
            .with_test(self.test))
    }
}

fn add_order(params: &mut Value, options: Option<&GatewayOptions>) {
    if let Some(options) = options {
        params["order_id"] = json!(options.order_id);
        params["description"] = json!(options.description);
        if let Some(ref address) = options.billing_address {
            params["zip"] = json!(address.zip);
            params["country"] = json!(address.country);
        }
    }
}

impl Gateway for BogusGateway {
    fn display_name() -> &'static str {
        "Bogus"
    }

    fn supported_capabilities() -> Vec<String> {
        [
            "purchase",
            "authorize",
            "capture",
            "void",
            "credit",
            "recurring",
            "refund",
            "store",
            "unstore",
            "update",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn credentials() -> Vec<&'static str> {
        vec!["login", "password"]
    }

    fn homepage_url() -> Option<&'static str> {
        Some("http://example.com")
    }

    fn supported_countries() -> &'static [&'static str] {
        &["US", "CA", "GB"]
    }

    fn supported_card_types() -> &'static [&'static str] {
        &["visa", "master", "american_express"]
    }

    fn default_currency() -> Option<&'static str> {
        Some("USD")
    }

    fn operations() -> Option<OperationRegistry<Self>> {
        let registry = OperationRegistry::<Self>::inherit()
            .operation("login", Arity::Exact(0), |gw, _| {
                Ok(Response::informational(json!(gw.login())))
            })
            .operation("password", Arity::Exact(0), |_, _| {
                Ok(Response::informational(json!("[FILTERED]")))
            })
            .operation("purchase", Arity::Trailing { required: 2 }, |gw, a| {
                gw.purchase(a.money(0)?, a.credit_card(1)?, a.optional_options(2)?)
            })
            .operation("authorize", Arity::Trailing { required: 2 }, |gw, a| {
                gw.authorize(a.money(0)?, a.credit_card(1)?, a.optional_options(2)?)
            })
            .operation("capture", Arity::Trailing { required: 2 }, |gw, a| {
                gw.capture(a.money(0)?, a.authorization(1)?, a.optional_options(2)?)
            })
            .operation("void", Arity::Trailing { required: 1 }, |gw, a| {
                gw.void(a.authorization(0)?, a.optional_options(1)?)
            })
            .operation("credit", Arity::Trailing { required: 2 }, |gw, a| {
                gw.credit(a.money(0)?, a.credit_card(1)?, a.optional_options(2)?)
            })
            .operation("recurring", Arity::Trailing { required: 2 }, |gw, a| {
                gw.recurring(a.money(0)?, a.credit_card(1)?, a.optional_options(2)?)
            })
            .operation("refund", Arity::Trailing { required: 2 }, |gw, a| {
                gw.refund(a.money(0)?, a.authorization(1)?, a.optional_options(2)?)
            })
            .operation("store", Arity::Trailing { required: 1 }, |gw, a| {
                gw.store(a.credit_card(0)?, a.optional_options(1)?)
            })
            .operation("unstore", Arity::Trailing { required: 1 }, |gw, a| {
                gw.unstore(a.customer_reference(0)?, a.optional_options(1)?)
            })
            .operation("update", Arity::Trailing { required: 2 }, |gw, a| {
                gw.update(a.customer_reference(0)?, a.credit_card(1)?, a.optional_options(2)?)
            });
        Some(registry)
    }

    fn construct(config: GatewayConfig, commit: CommitHandle) -> Result<Self, GatewayError> {
        Ok(Self {
            login: config.require("login")?.to_string(),
            password: config.require("password")?.to_string(),
            test: config.test,
            commit,
        })
    }

    fn is_test(&self) -> bool {
        self.test
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureBundle;
    use crate::gateway::NoopCommit;
    use std::sync::Arc;

    fn gateway() -> BogusGateway {
        BogusGateway::construct(
            GatewayConfig::synthetic(BogusGateway::credentials()),
            Arc::new(NoopCommit),
        )
        .unwrap()
    }

    #[test]
    fn test_requires_credentials() {
        let err = BogusGateway::construct(GatewayConfig::new(), Arc::new(NoopCommit)).unwrap_err();
        assert_eq!(err, GatewayError::MissingCredential { field: "login".into() });
    }

    #[test]
    fn test_purchase_with_and_without_options() {
        let gw = gateway();
        let fixtures = FixtureBundle::shared();
        let r = gw
            .purchase(fixtures.money, &fixtures.credit_card, Some(&fixtures.options))
            .unwrap();
        assert!(r.success);
        assert!(r.test);
        assert_eq!(r.authorization.as_deref(), Some(AUTHORIZATION));
        assert!(gw.purchase(fixtures.money, &fixtures.credit_card, None).is_ok());
    }

    #[test]
    fn test_declined_card() {
        let gw = gateway();
        let mut card = FixtureBundle::new().credit_card;
        card.number = DECLINED_CARD.into();
        assert!(matches!(
            gw.authorize(Money(100), &card, None),
            Err(GatewayError::Declined { .. })
        ));
    }

    #[test]
    fn test_registry_covers_catalog() {
        let registry = BogusGateway::operations().unwrap();
        for cap in crate::catalog::Capability::ALL {
            let arity = registry.arity(cap.as_str()).unwrap();
            assert_eq!(arity.abs(), cap.argument_template().len(), "{}", cap);
        }
    }
}
