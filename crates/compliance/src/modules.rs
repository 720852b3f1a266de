//! Bundled compliance modules

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use aegis_core::{Address, Amount, CountryCode};
use aegis_identity::IdentityRegistry;
use serde::Deserialize;
use serde_json::Value;

use crate::context::TransferContext;
use crate::error::{ComplianceError, ComplianceResult};
use crate::module::{ComplianceModule, ModuleDecision};

fn invalid_params(module: &str, reason: impl Into<String>) -> ComplianceError {
    ComplianceError::InvalidParameters {
        module: module.to_string(),
        reason: reason.into(),
    }
}

/// Module that approves every operation. Takes no parameters.
pub struct AllowAllModule {
    id: String,
}

impl AllowAllModule {
    /// Create a new approve-all module
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl ComplianceModule for AllowAllModule {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate_params(&self, params: &Value) -> ComplianceResult<()> {
        match params {
            Value::Null => Ok(()),
            Value::Object(map) if map.is_empty() => Ok(()),
            _ => Err(invalid_params(&self.id, "module takes no parameters")),
        }
    }

    fn configure(&mut self, _params: &Value) -> ComplianceResult<()> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CountryRestrictParams {
    blocked_countries: Vec<u16>,
}

/// Rejects transfers and mints whose recipient resolves to a blocked
/// country. Wallets without a known country are left to the identity
/// gate.
pub struct CountryRestrictModule {
    id: String,
    registry: Arc<dyn IdentityRegistry>,
    blocked: HashSet<CountryCode>,
}

impl CountryRestrictModule {
    /// Create an unconfigured module backed by the given registry
    pub fn new(id: impl Into<String>, registry: Arc<dyn IdentityRegistry>) -> Self {
        Self {
            id: id.into(),
            registry,
            blocked: HashSet::new(),
        }
    }

    fn parse(&self, params: &Value) -> ComplianceResult<CountryRestrictParams> {
        serde_json::from_value(params.clone())
            .map_err(|e| invalid_params(&self.id, e.to_string()))
    }
}

impl ComplianceModule for CountryRestrictModule {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate_params(&self, params: &Value) -> ComplianceResult<()> {
        self.parse(params).map(|_| ())
    }

    fn configure(&mut self, params: &Value) -> ComplianceResult<()> {
        let parsed = self.parse(params)?;
        self.blocked = parsed
            .blocked_countries
            .into_iter()
            .map(CountryCode::new)
            .collect();
        Ok(())
    }

    fn check(&self, ctx: &TransferContext) -> ModuleDecision {
        let Some(to) = &ctx.to else {
            return ModuleDecision::Allow;
        };
        match self.registry.country_of(to) {
            Some(country) if self.blocked.contains(&country) => {
                ModuleDecision::reject(format!("destination {country} is restricted"))
            }
            _ => ModuleDecision::Allow,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MaxBalanceParams {
    max_balance: Amount,
}

/// Caps what any single holder may accumulate.
///
/// Holdings are tracked module-internally through the lifecycle
/// callbacks, so the module never reads the ledger.
pub struct MaxBalanceModule {
    id: String,
    max_balance: Amount,
    holdings: HashMap<Address, Amount>,
}

impl MaxBalanceModule {
    /// Create an unconfigured module (max defaults to zero until
    /// parameters are applied)
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            max_balance: Amount::ZERO,
            holdings: HashMap::new(),
        }
    }

    fn parse(&self, params: &Value) -> ComplianceResult<MaxBalanceParams> {
        serde_json::from_value(params.clone())
            .map_err(|e| invalid_params(&self.id, e.to_string()))
    }

    fn held(&self, account: &Address) -> Amount {
        self.holdings.get(account).copied().unwrap_or_default()
    }
}

impl ComplianceModule for MaxBalanceModule {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate_params(&self, params: &Value) -> ComplianceResult<()> {
        self.parse(params).map(|_| ())
    }

    fn configure(&mut self, params: &Value) -> ComplianceResult<()> {
        self.max_balance = self.parse(params)?.max_balance;
        Ok(())
    }

    fn check(&self, ctx: &TransferContext) -> ModuleDecision {
        let Some(to) = &ctx.to else {
            return ModuleDecision::Allow;
        };
        let projected = match self.held(to).checked_add(ctx.amount) {
            Some(v) => v,
            None => return ModuleDecision::reject("holding arithmetic overflow"),
        };
        if projected > self.max_balance {
            ModuleDecision::reject(format!(
                "holding {projected} would exceed maximum {}",
                self.max_balance
            ))
        } else {
            ModuleDecision::Allow
        }
    }

    fn on_created(&mut self, to: &Address, amount: Amount) {
        let held = self.held(to);
        self.holdings
            .insert(to.clone(), held.checked_add(amount).unwrap_or(held));
    }

    fn on_transferred(&mut self, from: &Address, to: &Address, amount: Amount) {
        let sent = self.held(from).saturating_sub(amount);
        self.holdings.insert(from.clone(), sent);
        let received = self.held(to);
        self.holdings
            .insert(to.clone(), received.checked_add(amount).unwrap_or(received));
    }

    fn on_destroyed(&mut self, from: &Address, amount: Amount) {
        let held = self.held(from).saturating_sub(amount);
        self.holdings.insert(from.clone(), held);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::ClaimTopic;
    use aegis_identity::{IdentityId, MockIdentityRegistry};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    fn amt(d: Decimal) -> Amount {
        Amount::new(d).unwrap()
    }

    #[test]
    fn test_allow_all_rejects_params() {
        let module = AllowAllModule::new("allow");
        assert!(module.validate_params(&Value::Null).is_ok());
        assert!(module.validate_params(&json!({})).is_ok());
        assert!(module.validate_params(&json!({"x": 1})).is_err());
    }

    #[test]
    fn test_country_restrict_blocks_destination() {
        let registry = Arc::new(MockIdentityRegistry::new());
        registry.register(
            addr("bob"),
            IdentityId::new("id-bob"),
            CountryCode::new(408),
            vec![ClaimTopic::new(1)],
        );

        let mut module = CountryRestrictModule::new("country-restrict", registry);
        module
            .configure(&json!({"blocked_countries": [408]}))
            .unwrap();

        let ctx = TransferContext::transfer(addr("alice"), addr("bob"), amt(dec!(1)));
        assert!(!module.check(&ctx).is_allowed());

        // Burns have no destination and always pass
        let burn = TransferContext::burn(addr("bob"), amt(dec!(1)));
        assert!(module.check(&burn).is_allowed());
    }

    #[test]
    fn test_country_restrict_allows_unblocked() {
        let registry = Arc::new(MockIdentityRegistry::new());
        registry.register(
            addr("bob"),
            IdentityId::new("id-bob"),
            CountryCode::new(840),
            vec![ClaimTopic::new(1)],
        );

        let mut module = CountryRestrictModule::new("country-restrict", registry);
        module
            .configure(&json!({"blocked_countries": [408]}))
            .unwrap();

        let ctx = TransferContext::transfer(addr("alice"), addr("bob"), amt(dec!(1)));
        assert!(module.check(&ctx).is_allowed());
    }

    #[test]
    fn test_country_restrict_invalid_params() {
        let registry = Arc::new(MockIdentityRegistry::new());
        let module = CountryRestrictModule::new("country-restrict", registry);
        assert!(module.validate_params(&json!({"wrong": true})).is_err());
        assert!(module
            .validate_params(&json!({"blocked_countries": [1, 2]}))
            .is_ok());
    }

    #[test]
    fn test_max_balance_tracks_via_lifecycle() {
        let mut module = MaxBalanceModule::new("max-balance");
        module.configure(&json!({"max_balance": "100"})).unwrap();

        let alice = addr("alice");
        let bob = addr("bob");

        module.on_created(&alice, amt(dec!(80)));

        // alice -> bob 30 leaves alice at 50
        module.on_transferred(&alice, &bob, amt(dec!(30)));

        // bob at 30, receiving 71 would exceed 100
        let over = TransferContext::transfer(alice.clone(), bob.clone(), amt(dec!(71)));
        assert!(!module.check(&over).is_allowed());

        let fits = TransferContext::transfer(alice.clone(), bob.clone(), amt(dec!(70)));
        assert!(module.check(&fits).is_allowed());

        module.on_destroyed(&bob, amt(dec!(30)));
        assert!(module.check(&over).is_allowed());
    }

    #[test]
    fn test_max_balance_boundary() {
        let mut module = MaxBalanceModule::new("max-balance");
        module.configure(&json!({"max_balance": "100"})).unwrap();

        let mint_exact = TransferContext::mint(addr("carol"), amt(dec!(100)));
        assert!(module.check(&mint_exact).is_allowed());

        let mint_over = TransferContext::mint(addr("carol"), amt(dec!(100.01)));
        assert!(!module.check(&mint_over).is_allowed());
    }
}
