//! Token engine - PreCheck → Execute → PostNotify orchestration
//!
//! All methods take `&mut self`: the borrow checker serializes
//! invocations, and every operation either completes or aborts before
//! the first mutation. Prechecks are read-only; the one case where a
//! transfer needs to mutate freeze state (the forced/burn shortfall) is
//! computed during PreCheck and applied during Execute.
//!
//! Batches stage the whole run first: prechecks run element-by-element
//! against an overlay ledger and a scratch custody book, so a failing
//! element aborts before anything touches live state. Compliance
//! modules judge every batch element against their state at batch
//! entry; balances and freeze state progress through the staging view.

use std::collections::HashMap;
use std::sync::Arc;

use aegis_compliance::{ComplianceModule, ModuleChain, TransferContext};
use aegis_core::{Address, Amount, ClaimTopic, OperationMode};
use aegis_custody::CustodyBook;
use aegis_events::{EventJournal, TokenEvent};
use aegis_gates::{CollateralGate, PauseGate, SupplyCap, YieldGate, YieldSchedule};
use aegis_identity::{ClaimSource, IdentityId, IdentityRegistry};
use aegis_ledger::{BalanceLedger, InMemoryLedger};
use chrono::Utc;

use crate::authorize::{AllowAllAuthorizer, Authorizer, OperationCategory};
use crate::error::{EngineError, EngineResult};

/// One stage of the fixed precheck sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecheckStage {
    Pause,
    Custodian,
    Identity,
    Compliance,
    Cap,
    Collateral,
    Yield,
}

/// Canonical precheck order. The engine walks exactly this sequence;
/// the Cap, Collateral and Yield stages apply to mints only.
pub const PRECHECK_ORDER: [PrecheckStage; 7] = [
    PrecheckStage::Pause,
    PrecheckStage::Custodian,
    PrecheckStage::Identity,
    PrecheckStage::Compliance,
    PrecheckStage::Cap,
    PrecheckStage::Collateral,
    PrecheckStage::Yield,
];

/// A balance-changing operation entering the pipeline.
#[derive(Debug, Clone)]
enum TokenOp {
    Mint {
        to: Address,
        amount: Amount,
    },
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
        mode: OperationMode,
    },
    /// Administrative burn; may consume frozen tokens
    Burn {
        from: Address,
        amount: Amount,
    },
    /// Holder-initiated burn; never touches frozen tokens
    Redeem {
        from: Address,
        amount: Amount,
    },
}

impl TokenOp {
    fn amount(&self) -> Amount {
        match self {
            TokenOp::Mint { amount, .. }
            | TokenOp::Transfer { amount, .. }
            | TokenOp::Burn { amount, .. }
            | TokenOp::Redeem { amount, .. } => *amount,
        }
    }

    /// Ledger endpoints: `(from, to)` with `None` as the mint/burn side
    fn endpoints(&self) -> (Option<&Address>, Option<&Address>) {
        match self {
            TokenOp::Mint { to, .. } => (None, Some(to)),
            TokenOp::Transfer { from, to, .. } => (Some(from), Some(to)),
            TokenOp::Burn { from, .. } | TokenOp::Redeem { from, .. } => (Some(from), None),
        }
    }

    /// Recipient whose identity must verify (standard mints and
    /// transfers only)
    fn verified_recipient(&self) -> Option<&Address> {
        match self {
            TokenOp::Mint { to, .. } => Some(to),
            TokenOp::Transfer { to, mode, .. } if mode.is_standard() => Some(to),
            _ => None,
        }
    }

    /// Context for the compliance chain, if this operation is judged
    fn compliance_context(&self) -> Option<TransferContext> {
        match self {
            TokenOp::Mint { to, amount } => Some(TransferContext::mint(to.clone(), *amount)),
            TokenOp::Transfer {
                from,
                to,
                amount,
                mode,
            } if mode.is_standard() => {
                Some(TransferContext::transfer(from.clone(), to.clone(), *amount))
            }
            _ => None,
        }
    }

    fn is_mint(&self) -> bool {
        matches!(self, TokenOp::Mint { .. })
    }
}

/// What Execute must apply before the raw ledger update.
#[derive(Debug, Clone, Default)]
struct OpPlan {
    /// Frozen tokens to release on the debit account (forced transfers
    /// and administrative burns dipping into frozen balance)
    unfreeze: Option<(Address, Amount)>,
}

/// The transfer-authorization and custodial-state engine.
pub struct TokenEngine {
    ledger: Box<dyn BalanceLedger>,
    identity: Arc<dyn IdentityRegistry>,
    authorizer: Arc<dyn Authorizer>,
    chain: ModuleChain,
    custody: CustodyBook,
    pause: PauseGate,
    cap: Option<SupplyCap>,
    collateral: Option<(CollateralGate, Arc<dyn ClaimSource>)>,
    yield_gate: YieldGate,
    required_topics: Vec<ClaimTopic>,
    journal: EventJournal,
}

impl TokenEngine {
    /// Start building an engine around an identity registry
    pub fn builder(identity: Arc<dyn IdentityRegistry>) -> TokenEngineBuilder {
        TokenEngineBuilder::new(identity)
    }

    // === Read surface ===

    /// Ledger balance of an account
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.balance_of(account)
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    /// Whether the account is fully frozen
    pub fn is_frozen(&self, account: &Address) -> bool {
        self.custody.is_frozen(account)
    }

    /// Locked sub-balance of the account
    pub fn frozen_amount(&self, account: &Address) -> Amount {
        self.custody.frozen_amount(account)
    }

    /// Spendable balance of the account
    pub fn available_of(&self, account: &Address) -> Amount {
        self.custody.available(account, self.ledger.balance_of(account))
    }

    /// Whether the token is paused
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Whether a compliance module is registered
    pub fn has_module(&self, id: &str) -> bool {
        self.chain.contains(id)
    }

    /// Registered module ids in evaluation order
    pub fn module_ids(&self) -> Vec<&str> {
        self.chain.ids()
    }

    /// Required claim topics a recipient must satisfy
    pub fn required_topics(&self) -> &[ClaimTopic] {
        &self.required_topics
    }

    /// The event journal
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    // === Token operations ===

    /// Standard holder-initiated transfer
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> EngineResult<()> {
        self.run_ops(
            vec![TokenOp::Transfer {
                from: from.clone(),
                to: to.clone(),
                amount,
                mode: OperationMode::Standard,
            }],
            from,
        )
    }

    /// Standard transfers to several recipients, all-or-nothing
    pub fn batch_transfer(
        &mut self,
        from: &Address,
        tos: &[Address],
        amounts: &[Amount],
    ) -> EngineResult<()> {
        check_len(tos.len(), amounts.len())?;
        let ops = tos
            .iter()
            .zip(amounts)
            .map(|(to, amount)| TokenOp::Transfer {
                from: from.clone(),
                to: to.clone(),
                amount: *amount,
                mode: OperationMode::Standard,
            })
            .collect();
        self.run_ops(ops, from)
    }

    /// Mint new tokens to a verified recipient
    pub fn mint(&mut self, actor: &Address, to: &Address, amount: Amount) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Mint)?;
        self.run_ops(
            vec![TokenOp::Mint {
                to: to.clone(),
                amount,
            }],
            actor,
        )
    }

    /// Mint to several recipients, all-or-nothing
    pub fn batch_mint(
        &mut self,
        actor: &Address,
        tos: &[Address],
        amounts: &[Amount],
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Mint)?;
        check_len(tos.len(), amounts.len())?;
        let ops = tos
            .iter()
            .zip(amounts)
            .map(|(to, amount)| TokenOp::Mint {
                to: to.clone(),
                amount: *amount,
            })
            .collect();
        self.run_ops(ops, actor)
    }

    /// Administrative burn; auto-unfreezes any shortfall
    pub fn burn(&mut self, actor: &Address, from: &Address, amount: Amount) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Burn)?;
        self.run_ops(
            vec![TokenOp::Burn {
                from: from.clone(),
                amount,
            }],
            actor,
        )
    }

    /// Administrative burns from several accounts, all-or-nothing
    pub fn batch_burn(
        &mut self,
        actor: &Address,
        froms: &[Address],
        amounts: &[Amount],
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Burn)?;
        check_len(froms.len(), amounts.len())?;
        let ops = froms
            .iter()
            .zip(amounts)
            .map(|(from, amount)| TokenOp::Burn {
                from: from.clone(),
                amount: *amount,
            })
            .collect();
        self.run_ops(ops, actor)
    }

    /// Holder-initiated burn; strictly limited to unfrozen balance
    pub fn redeem(&mut self, from: &Address, amount: Amount) -> EngineResult<()> {
        self.run_ops(
            vec![TokenOp::Redeem {
                from: from.clone(),
                amount,
            }],
            from,
        )
    }

    /// Custodial transfer bypassing custodian/identity/compliance
    /// prechecks for this single call
    pub fn forced_transfer(
        &mut self,
        actor: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::ForcedTransfer)?;
        self.run_ops(
            vec![TokenOp::Transfer {
                from: from.clone(),
                to: to.clone(),
                amount,
                mode: OperationMode::Forced,
            }],
            actor,
        )
    }

    /// Forced transfers over parallel arrays, all-or-nothing
    pub fn batch_forced_transfer(
        &mut self,
        actor: &Address,
        froms: &[Address],
        tos: &[Address],
        amounts: &[Amount],
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::ForcedTransfer)?;
        check_len(froms.len(), tos.len())?;
        check_len(froms.len(), amounts.len())?;
        let ops = froms
            .iter()
            .zip(tos)
            .zip(amounts)
            .map(|((from, to), amount)| TokenOp::Transfer {
                from: from.clone(),
                to: to.clone(),
                amount: *amount,
                mode: OperationMode::Forced,
            })
            .collect();
        self.run_ops(ops, actor)
    }

    // === Custodian operations ===

    /// Set the full-freeze flag. Idempotent; a notification is emitted
    /// either way.
    pub fn set_frozen(
        &mut self,
        actor: &Address,
        account: &Address,
        frozen: bool,
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Freeze)?;
        self.ensure_not_paused()?;

        self.custody.set_frozen(account, frozen);
        self.journal.append(TokenEvent::address_frozen(
            account.clone(),
            frozen,
            actor.clone(),
        ))?;
        tracing::debug!(account = %account, frozen, "full-freeze flag set");
        Ok(())
    }

    /// Set full-freeze flags over parallel arrays
    pub fn batch_set_frozen(
        &mut self,
        actor: &Address,
        accounts: &[Address],
        flags: &[bool],
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Freeze)?;
        self.ensure_not_paused()?;
        check_len(accounts.len(), flags.len())?;

        for (account, frozen) in accounts.iter().zip(flags) {
            self.custody.set_frozen(account, *frozen);
            self.journal.append(TokenEvent::address_frozen(
                account.clone(),
                *frozen,
                actor.clone(),
            ))?;
        }
        Ok(())
    }

    /// Lock part of an account's balance
    pub fn freeze_partial(
        &mut self,
        actor: &Address,
        account: &Address,
        amount: Amount,
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Freeze)?;
        self.ensure_not_paused()?;

        let balance = self.ledger.balance_of(account);
        self.custody.freeze_partial(account, amount, balance)?;
        self.journal.append(TokenEvent::tokens_frozen(
            account.clone(),
            amount,
            actor.clone(),
        ))?;
        tracing::debug!(account = %account, amount = %amount, "tokens frozen");
        Ok(())
    }

    /// Partial freezes over parallel arrays, all-or-nothing
    pub fn batch_freeze_partial(
        &mut self,
        actor: &Address,
        accounts: &[Address],
        amounts: &[Amount],
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Freeze)?;
        self.ensure_not_paused()?;
        check_len(accounts.len(), amounts.len())?;

        // Stage on a scratch book; commit by swap only if every element fits
        let mut scratch = self.custody.clone();
        for (account, amount) in accounts.iter().zip(amounts) {
            let balance = self.ledger.balance_of(account);
            scratch.freeze_partial(account, *amount, balance)?;
        }
        self.custody = scratch;

        for (account, amount) in accounts.iter().zip(amounts) {
            self.journal.append(TokenEvent::tokens_frozen(
                account.clone(),
                *amount,
                actor.clone(),
            ))?;
        }
        Ok(())
    }

    /// Release part of an account's locked balance
    pub fn unfreeze_partial(
        &mut self,
        actor: &Address,
        account: &Address,
        amount: Amount,
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Freeze)?;
        self.ensure_not_paused()?;

        self.custody.unfreeze_partial(account, amount)?;
        self.journal.append(TokenEvent::tokens_unfrozen(
            account.clone(),
            amount,
            actor.clone(),
        ))?;
        tracing::debug!(account = %account, amount = %amount, "tokens unfrozen");
        Ok(())
    }

    /// Partial unfreezes over parallel arrays, all-or-nothing
    pub fn batch_unfreeze_partial(
        &mut self,
        actor: &Address,
        accounts: &[Address],
        amounts: &[Amount],
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Freeze)?;
        self.ensure_not_paused()?;
        check_len(accounts.len(), amounts.len())?;

        let mut scratch = self.custody.clone();
        for (account, amount) in accounts.iter().zip(amounts) {
            scratch.unfreeze_partial(account, *amount)?;
        }
        self.custody = scratch;

        for (account, amount) in accounts.iter().zip(amounts) {
            self.journal.append(TokenEvent::tokens_unfrozen(
                account.clone(),
                *amount,
                actor.clone(),
            ))?;
        }
        Ok(())
    }

    /// Migrate freeze state from a lost wallet to its replacement.
    ///
    /// Both wallets must resolve to the given registered identity.
    /// Balance migration is handled by the identity/ledger integration,
    /// not here.
    pub fn recover(
        &mut self,
        actor: &Address,
        lost: &Address,
        new: &Address,
        identity: &IdentityId,
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Recovery)?;
        self.ensure_not_paused()?;

        if self.identity.identity_of(lost).as_ref() != Some(identity) {
            return Err(EngineError::Verification {
                address: lost.clone(),
            });
        }
        if self.identity.identity_of(new).as_ref() != Some(identity) {
            return Err(EngineError::Verification {
                address: new.clone(),
            });
        }

        let migration = self.custody.recover(lost, new)?;

        if !migration.moved_amount.is_zero() {
            self.journal.append(TokenEvent::tokens_unfrozen(
                lost.clone(),
                migration.moved_amount,
                actor.clone(),
            ))?;
            self.journal.append(TokenEvent::tokens_frozen(
                new.clone(),
                migration.moved_amount,
                actor.clone(),
            ))?;
        }
        if migration.flag_migrated {
            self.journal.append(TokenEvent::address_frozen(
                lost.clone(),
                false,
                actor.clone(),
            ))?;
            self.journal.append(TokenEvent::address_frozen(
                new.clone(),
                true,
                actor.clone(),
            ))?;
        }
        self.journal.append(TokenEvent::recovery_succeeded(
            lost.clone(),
            new.clone(),
            identity.as_str(),
            actor.clone(),
        ))?;
        tracing::debug!(lost = %lost, new = %new, identity = %identity, "wallet recovered");
        Ok(())
    }

    // === Settings ===

    /// Register a compliance module with its parameter blob
    pub fn add_module(
        &mut self,
        actor: &Address,
        module: Box<dyn ComplianceModule>,
        params: serde_json::Value,
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Settings)?;
        self.ensure_not_paused()?;

        let id = module.id().to_string();
        self.chain.add_module(module, params)?;
        self.journal.append(TokenEvent::module_added(id))?;
        Ok(())
    }

    /// Remove a registered compliance module
    pub fn remove_module(&mut self, actor: &Address, id: &str) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Settings)?;
        self.ensure_not_paused()?;

        self.chain.remove_module(id)?;
        self.journal.append(TokenEvent::module_removed(id))?;
        Ok(())
    }

    /// Re-validate and replace a registered module's parameters
    pub fn set_module_parameters(
        &mut self,
        actor: &Address,
        id: &str,
        params: serde_json::Value,
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Settings)?;
        self.ensure_not_paused()?;

        self.chain.set_module_parameters(id, params)?;
        self.journal.append(TokenEvent::module_params_updated(id))?;
        Ok(())
    }

    /// Replace the required claim-topic list (duplicates collapse,
    /// order preserved)
    pub fn set_required_claim_topics(
        &mut self,
        actor: &Address,
        topics: Vec<ClaimTopic>,
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Settings)?;
        self.ensure_not_paused()?;

        let mut deduped: Vec<ClaimTopic> = Vec::with_capacity(topics.len());
        for topic in topics {
            if !deduped.contains(&topic) {
                deduped.push(topic);
            }
        }
        self.required_topics = deduped.clone();
        self.journal.append(TokenEvent::required_topics_set(deduped))?;
        Ok(())
    }

    /// Configure the yield schedule; immutable once set
    pub fn set_yield_schedule(
        &mut self,
        actor: &Address,
        schedule: Arc<dyn YieldSchedule>,
    ) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Settings)?;
        self.ensure_not_paused()?;

        let starts_at = schedule.start_time();
        self.yield_gate.set_schedule(schedule)?;
        self.journal.append(TokenEvent::yield_schedule_set(starts_at))?;
        Ok(())
    }

    /// Suspend every mutating operation
    pub fn pause(&mut self, actor: &Address) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Pause)?;
        self.pause.pause()?;
        self.journal.append(TokenEvent::paused(actor.clone()))?;
        tracing::debug!(actor = %actor, "token paused");
        Ok(())
    }

    /// Resume operations; the only path allowed while paused
    pub fn unpause(&mut self, actor: &Address) -> EngineResult<()> {
        self.ensure_authorized(actor, OperationCategory::Pause)?;
        self.pause.unpause()?;
        self.journal.append(TokenEvent::unpaused(actor.clone()))?;
        tracing::debug!(actor = %actor, "token unpaused");
        Ok(())
    }

    // === Pipeline internals ===

    fn ensure_authorized(
        &self,
        actor: &Address,
        category: OperationCategory,
    ) -> EngineResult<()> {
        if !self.authorizer.is_authorized(actor, category) {
            return Err(EngineError::Authorization {
                actor: actor.clone(),
                category,
            });
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> EngineResult<()> {
        if self.pause.is_paused() {
            return Err(EngineError::Paused);
        }
        Ok(())
    }

    /// Walk [`PRECHECK_ORDER`] for one operation against the given
    /// state view. Read-only; returns what Execute must apply.
    fn precheck(
        &self,
        ledger: &dyn BalanceLedger,
        custody: &CustodyBook,
        op: &TokenOp,
    ) -> EngineResult<OpPlan> {
        let mut plan = OpPlan::default();

        for stage in PRECHECK_ORDER {
            match stage {
                PrecheckStage::Pause => {
                    self.ensure_not_paused()?;
                }
                PrecheckStage::Custodian => match op {
                    TokenOp::Mint { to, .. } => {
                        custody.check_standard_credit(to)?;
                    }
                    TokenOp::Transfer {
                        from,
                        to,
                        amount,
                        mode,
                    } => {
                        if mode.is_standard() {
                            custody.check_standard_debit(from, *amount, ledger.balance_of(from))?;
                            custody.check_standard_credit(to)?;
                        } else {
                            let shortfall =
                                custody.plan_covered_debit(from, *amount, ledger.balance_of(from))?;
                            if !shortfall.is_zero() {
                                plan.unfreeze = Some((from.clone(), shortfall));
                            }
                        }
                    }
                    TokenOp::Burn { from, amount } => {
                        let shortfall =
                            custody.plan_covered_debit(from, *amount, ledger.balance_of(from))?;
                        if !shortfall.is_zero() {
                            plan.unfreeze = Some((from.clone(), shortfall));
                        }
                    }
                    TokenOp::Redeem { from, amount } => {
                        custody.check_standard_debit(from, *amount, ledger.balance_of(from))?;
                    }
                },
                PrecheckStage::Identity => {
                    if let Some(to) = op.verified_recipient() {
                        if !self.identity.is_verified(to, &self.required_topics) {
                            return Err(EngineError::Verification { address: to.clone() });
                        }
                    }
                }
                PrecheckStage::Compliance => {
                    if let Some(ctx) = op.compliance_context() {
                        self.chain.can_transfer(&ctx)?;
                    }
                }
                PrecheckStage::Cap => {
                    if op.is_mint() {
                        if let Some(cap) = &self.cap {
                            cap.check_mint(ledger.total_supply(), op.amount())?;
                        }
                    }
                }
                PrecheckStage::Collateral => {
                    if op.is_mint() {
                        if let Some((gate, source)) = &self.collateral {
                            gate.check_mint(
                                source.as_ref(),
                                ledger.total_supply(),
                                op.amount(),
                                Utc::now(),
                            )?;
                        }
                    }
                }
                PrecheckStage::Yield => {
                    if op.is_mint() {
                        self.yield_gate.check_mint(Utc::now())?;
                    }
                }
            }
        }

        Ok(plan)
    }

    /// Overlay seeded with the live balances of every account a batch
    /// touches, so staging prechecks see intra-batch effects.
    fn overlay_for(&self, ops: &[TokenOp]) -> InMemoryLedger {
        let mut balances: HashMap<Address, Amount> = HashMap::new();
        for op in ops {
            let (from, to) = op.endpoints();
            for account in [from, to].into_iter().flatten() {
                balances
                    .entry(account.clone())
                    .or_insert_with(|| self.ledger.balance_of(account));
            }
        }
        InMemoryLedger::with_balances(balances, self.ledger.total_supply())
    }

    /// Run one or more operations as a single atomic invocation.
    ///
    /// Stage: every element prechecks against the overlay; the first
    /// failure aborts with zero live mutation. Commit: the staged
    /// custody book becomes live, ledger updates replay, PostNotify
    /// runs per element.
    fn run_ops(&mut self, ops: Vec<TokenOp>, initiator: &Address) -> EngineResult<()> {
        let mut scratch = self.custody.clone();
        let mut overlay = self.overlay_for(&ops);
        let mut plans = Vec::with_capacity(ops.len());

        for op in &ops {
            let plan = self.precheck(&overlay, &scratch, op)?;
            if let Some((account, amount)) = &plan.unfreeze {
                scratch.unfreeze_partial(account, *amount)?;
            }
            let (from, to) = op.endpoints();
            overlay.execute_update(from, to, op.amount())?;
            plans.push(plan);
        }

        self.custody = scratch;
        for (op, plan) in ops.iter().zip(plans) {
            if let Some((account, amount)) = plan.unfreeze {
                self.journal.append(TokenEvent::tokens_unfrozen(
                    account,
                    amount,
                    initiator.clone(),
                ))?;
            }
            let (from, to) = op.endpoints();
            self.ledger.execute_update(from, to, op.amount())?;
            self.post_notify(op, initiator)?;
        }
        Ok(())
    }

    /// Compliance lifecycle callbacks and canonical events. Callbacks
    /// are infallible; veto power exists only in the Compliance
    /// precheck.
    fn post_notify(&mut self, op: &TokenOp, initiator: &Address) -> EngineResult<()> {
        match op {
            TokenOp::Mint { to, amount } => {
                self.chain.notify_created(to, *amount);
                self.journal
                    .append(TokenEvent::minted(to.clone(), *amount, initiator.clone()))?;
                tracing::debug!(to = %to, amount = %amount, "mint completed");
            }
            TokenOp::Transfer {
                from,
                to,
                amount,
                mode,
            } => {
                self.chain.notify_transferred(from, to, *amount);
                self.journal.append(TokenEvent::transferred(
                    from.clone(),
                    to.clone(),
                    *amount,
                    *mode,
                    initiator.clone(),
                ))?;
                tracing::debug!(from = %from, to = %to, amount = %amount, mode = ?mode, "transfer completed");
            }
            TokenOp::Burn { from, amount } | TokenOp::Redeem { from, amount } => {
                self.chain.notify_destroyed(from, *amount);
                self.journal
                    .append(TokenEvent::burned(from.clone(), *amount, initiator.clone()))?;
                tracing::debug!(from = %from, amount = %amount, "burn completed");
            }
        }
        Ok(())
    }
}

fn check_len(left: usize, right: usize) -> EngineResult<()> {
    if left != right {
        return Err(EngineError::BatchLengthMismatch { left, right });
    }
    Ok(())
}

/// Builder wiring the engine's collaborators; unset pieces default to
/// test-friendly implementations.
pub struct TokenEngineBuilder {
    ledger: Box<dyn BalanceLedger>,
    identity: Arc<dyn IdentityRegistry>,
    authorizer: Arc<dyn Authorizer>,
    journal: EventJournal,
    cap: Option<SupplyCap>,
    collateral: Option<(CollateralGate, Arc<dyn ClaimSource>)>,
    required_topics: Vec<ClaimTopic>,
}

impl TokenEngineBuilder {
    /// Create a builder with default collaborators
    pub fn new(identity: Arc<dyn IdentityRegistry>) -> Self {
        Self {
            ledger: Box::new(InMemoryLedger::new()),
            identity,
            authorizer: Arc::new(AllowAllAuthorizer),
            journal: EventJournal::in_memory(),
            cap: None,
            collateral: None,
            required_topics: Vec::new(),
        }
    }

    /// Use a specific ledger adapter
    pub fn with_ledger(mut self, ledger: Box<dyn BalanceLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Use a specific authorization collaborator
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Use a specific event journal
    pub fn with_journal(mut self, journal: EventJournal) -> Self {
        self.journal = journal;
        self
    }

    /// Configure the immutable supply cap
    pub fn with_supply_cap(mut self, cap: Amount) -> Self {
        self.cap = Some(SupplyCap::new(cap));
        self
    }

    /// Configure collateral backing: claim topic plus the token's own
    /// claim source
    pub fn with_collateral(mut self, topic: ClaimTopic, source: Arc<dyn ClaimSource>) -> Self {
        self.collateral = Some((CollateralGate::new(topic), source));
        self
    }

    /// Configure the initial required claim topics
    pub fn with_required_topics(mut self, topics: Vec<ClaimTopic>) -> Self {
        self.required_topics = topics;
        self
    }

    /// Build the engine
    pub fn build(self) -> TokenEngine {
        TokenEngine {
            ledger: self.ledger,
            identity: self.identity,
            authorizer: self.authorizer,
            chain: ModuleChain::new(),
            custody: CustodyBook::new(),
            pause: PauseGate::new(),
            cap: self.cap,
            collateral: self.collateral,
            yield_gate: YieldGate::new(),
            required_topics: self.required_topics,
            journal: self.journal,
        }
    }
}
