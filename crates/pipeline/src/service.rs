//! Shared engine handle
//!
//! The engine's `&mut self` surface already serializes invocations for
//! a single owner; `TokenService` extends that guarantee to shared use
//! with one global mutex around all state mutation, so no two
//! operations ever interleave their PreCheck/Execute/PostNotify phases.

use std::sync::{Arc, Mutex};

use aegis_core::{Address, Amount};

use crate::engine::TokenEngine;
use crate::error::EngineResult;

/// Cloneable, thread-safe handle to a [`TokenEngine`].
#[derive(Clone)]
pub struct TokenService {
    inner: Arc<Mutex<TokenEngine>>,
}

impl TokenService {
    /// Wrap an engine for shared use
    pub fn new(engine: TokenEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run a closure against the engine under the global lock.
    ///
    /// Everything the closure does is one serialized invocation.
    pub fn with<R>(&self, f: impl FnOnce(&mut TokenEngine) -> R) -> R {
        let mut engine = self.inner.lock().expect("engine lock poisoned");
        f(&mut engine)
    }

    /// Standard transfer
    pub fn transfer(&self, from: &Address, to: &Address, amount: Amount) -> EngineResult<()> {
        self.with(|engine| engine.transfer(from, to, amount))
    }

    /// Mint new tokens
    pub fn mint(&self, actor: &Address, to: &Address, amount: Amount) -> EngineResult<()> {
        self.with(|engine| engine.mint(actor, to, amount))
    }

    /// Administrative burn
    pub fn burn(&self, actor: &Address, from: &Address, amount: Amount) -> EngineResult<()> {
        self.with(|engine| engine.burn(actor, from, amount))
    }

    /// Ledger balance of an account
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.with(|engine| engine.balance_of(account))
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.with(|engine| engine.total_supply())
    }
}
