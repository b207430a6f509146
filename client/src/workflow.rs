//! Sequential orchestration of presale program operations with an explicit per-step report.
//!
//! Every operation derives the addresses it needs, submits a single transaction through the
//! [`Ledger`], and records a [`StepRecord`]. Failures are returned to the caller and recorded; the
//! [`FailurePolicy`] decides whether later operations are still attempted.

use presale_interface::{
    instructions::PresaleInstruction,
    program::ProgramIds,
    state::{
        NftMetadata,
        SaleManager,
        WhitelistEntry,
    },
};
use solana_address::Address;
use solana_sdk::signature::{
    Keypair,
    Signature,
    Signer,
};

use crate::{
    context::pool::{
        withdraw_fund_instruction,
        ListingAccounts,
        PoolContext,
        PurchaseAccounts,
    },
    error::StepError,
    ledger::Ledger,
    logs::{
        log_error,
        log_info,
        log_success,
        log_warning,
    },
    pda::find_sale_manager_address,
    views::{
        fetch_record,
        resolve_sale,
        try_fetch_record,
    },
};

/// What to do with the remaining operations once one fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Attempt every operation and record each failure.
    #[default]
    Continue,
    /// Stop sending after the first failure. Later operations are recorded as skipped and return
    /// [`StepError::Aborted`].
    Abort,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded(Signature),
    Failed(StepError),
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRecord {
    /// The instruction the step sent, or would have sent.
    pub step: PresaleInstruction,
    pub status: StepStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkflowReport {
    pub records: Vec<StepRecord>,
}

impl WorkflowReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &StepRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, StepStatus::Succeeded(_)))
    }

    pub fn failed(&self) -> impl Iterator<Item = &StepRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, StepStatus::Failed(_)))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &StepRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, StepStatus::Skipped))
    }

    /// True when every recorded step succeeded.
    pub fn is_success(&self) -> bool {
        self.records
            .iter()
            .all(|r| matches!(r.status, StepStatus::Succeeded(_)))
    }

    pub fn first_failure(&self) -> Option<(&PresaleInstruction, &StepError)> {
        self.records.iter().find_map(|r| match &r.status {
            StepStatus::Failed(error) => Some((&r.step, error)),
            _ => None,
        })
    }

    pub fn log(&self) {
        for record in self.records.iter() {
            let name = record.step.name();
            match &record.status {
                StepStatus::Succeeded(signature) => log_success(name, signature),
                StepStatus::Failed(error) => log_error(name, error),
                StepStatus::Skipped => log_warning(name, "skipped"),
            }
        }
    }
}

/// The outcome of listing an NFT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleListing {
    pub signature: Signature,
    /// The freshly generated sale pot the listing's proceeds are tracked in.
    pub sale_pot: Address,
}

pub struct SaleWorkflow<'a, L: Ledger> {
    ledger: &'a L,
    ids: ProgramIds,
    policy: FailurePolicy,
    report: WorkflowReport,
    halted: bool,
}

impl<'a, L: Ledger> SaleWorkflow<'a, L> {
    pub fn new(ledger: &'a L, ids: ProgramIds, policy: FailurePolicy) -> Self {
        Self {
            ledger,
            ids,
            policy,
            report: WorkflowReport::default(),
            halted: false,
        }
    }

    pub fn ids(&self) -> &ProgramIds {
        &self.ids
    }

    pub fn ledger(&self) -> &'a L {
        self.ledger
    }

    pub fn report(&self) -> &WorkflowReport {
        &self.report
    }

    pub fn into_report(self) -> WorkflowReport {
        self.report
    }

    pub fn pool_context(&self, pool: &Address) -> PoolContext {
        PoolContext::new(self.ids, *pool)
    }

    /// Creates a pool owned by `owner`. The pool keypair co-signs.
    pub async fn init_pool(
        &mut self,
        owner: &Keypair,
        pool: &Keypair,
        sale_mint: &Address,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::InitPool;
        self.begin(step)?;
        let ix = self
            .pool_context(&pool.pubkey())
            .init_pool(owner.pubkey(), *sale_mint);
        let result = self.ledger.submit(owner, &[pool], &[ix]).await;
        self.finish(step, result)
    }

    /// Whitelists `bidder` for `amount` mints. Creates the whitelist entry if it doesn't exist
    /// yet and updates it otherwise, so repeated calls converge on the latest values.
    pub async fn set_whitelist(
        &mut self,
        pool: &Address,
        owner: &Keypair,
        bidder: &Address,
        amount: u64,
        whitelisted: bool,
    ) -> Result<Signature, StepError> {
        self.begin(PresaleInstruction::SetWhitelist)?;
        let ctx = self.pool_context(pool);
        let entry_address = ctx.whitelist_address(bidder);
        let existing = match try_fetch_record::<WhitelistEntry, L>(self.ledger, &entry_address).await {
            Ok(existing) => existing,
            Err(error) => return self.finish(PresaleInstruction::SetWhitelist, Err(error)),
        };

        let (step, ix) = match existing {
            Some(_) => {
                log_info("set_whitelist", "entry exists, updating it");
                (
                    PresaleInstruction::UpdateWhitelist,
                    ctx.update_whitelist(owner.pubkey(), *bidder, amount, whitelisted),
                )
            }
            None => (
                PresaleInstruction::SetWhitelist,
                ctx.set_whitelist(owner.pubkey(), *bidder, amount, whitelisted),
            ),
        };
        let result = self.ledger.submit(owner, &[], &[ix]).await;
        self.finish(step, result)
    }

    /// Updates an existing whitelist entry. Fails if the bidder was never whitelisted.
    pub async fn update_whitelist(
        &mut self,
        pool: &Address,
        owner: &Keypair,
        bidder: &Address,
        amount: u64,
        whitelisted: bool,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::UpdateWhitelist;
        self.begin(step)?;
        let ix = self
            .pool_context(pool)
            .update_whitelist(owner.pubkey(), *bidder, amount, whitelisted);
        let result = self.ledger.submit(owner, &[], &[ix]).await;
        self.finish(step, result)
    }

    pub async fn control_presale_live(
        &mut self,
        pool: &Address,
        owner: &Keypair,
        presale_live: bool,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::ControlPresaleLive;
        self.begin(step)?;
        let ix = self
            .pool_context(pool)
            .control_presale_live(owner.pubkey(), presale_live);
        let result = self.ledger.submit(owner, &[], &[ix]).await;
        self.finish(step, result)
    }

    /// Mints the NFT at `mint` into `token_account`. The owner must hold the mint authority and a
    /// whitelist entry with a remaining allowance.
    pub async fn mint_nft(
        &mut self,
        pool: &Address,
        owner: &Keypair,
        mint: &Address,
        token_account: &Address,
        metadata: NftMetadata,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::MintNft;
        self.begin(step)?;
        let ix = self
            .pool_context(pool)
            .mint_nft(owner.pubkey(), *mint, *token_account, metadata);
        let result = self.ledger.submit(owner, &[], &[ix]).await;
        self.finish(step, result)
    }

    pub async fn set_max_price(
        &mut self,
        pool: &Address,
        owner: &Keypair,
        mint: &Address,
        max_price: u64,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::SetMaxPrice;
        self.begin(step)?;
        let ix = self
            .pool_context(pool)
            .set_max_price(owner.pubkey(), *mint, max_price);
        let result = self.ledger.submit(owner, &[], &[ix]).await;
        self.finish(step, result)
    }

    /// Creates the sale manager for (pool, NFT mint). A second call for the same pair is rejected
    /// by the program and recorded as a failure.
    pub async fn init_sale_manager(
        &mut self,
        pool: &Address,
        owner: &Keypair,
        nft_mint: &Address,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::InitSaleManager;
        self.begin(step)?;
        let ix = self
            .pool_context(pool)
            .init_sale_manager(owner.pubkey(), *nft_mint);
        let result = self.ledger.submit(owner, &[], &[ix]).await;
        self.finish(step, result)
    }

    /// Lists the NFT at `price`. A fresh sale pot keypair is generated for the listing and
    /// co-signs the transaction.
    pub async fn sell_nft(
        &mut self,
        pool: &Address,
        seller: &Keypair,
        nft_mint: &Address,
        accounts: ListingAccounts,
        price: u64,
    ) -> Result<SaleListing, StepError> {
        let step = PresaleInstruction::SellNft;
        self.begin(step)?;
        let sale_pot = Keypair::new();
        let ix = self.pool_context(pool).sell_nft(
            seller.pubkey(),
            *nft_mint,
            sale_pot.pubkey(),
            accounts,
            price,
        );
        let result = self
            .ledger
            .submit(seller, &[&sale_pot], &[ix])
            .await
            .map(|signature| {
                let listing = SaleListing {
                    signature,
                    sale_pot: sale_pot.pubkey(),
                };
                (signature, listing)
            });
        self.finish_with(step, result)
    }

    /// Buys the listed NFT. The sale pot and escrow accounts are read back from the sale manager
    /// and its sale pot.
    pub async fn buy_nft(
        &mut self,
        pool: &Address,
        bidder: &Keypair,
        nft_mint: &Address,
        nft_bidder_token: &Address,
        bidder_token: &Address,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::BuyNft;
        self.begin(step)?;
        let ctx = self.pool_context(pool);
        let result = send_buy(
            self.ledger,
            &ctx,
            bidder,
            nft_mint,
            nft_bidder_token,
            bidder_token,
        )
        .await;
        self.finish(step, result)
    }

    /// Cancels the NFT's listing and returns it to `nft_seller_token`.
    pub async fn redeem_nft(
        &mut self,
        pool: &Address,
        owner: &Keypair,
        nft_mint: &Address,
        nft_seller_token: &Address,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::RedeemNft;
        self.begin(step)?;
        let ctx = self.pool_context(pool);
        let result = send_redeem(self.ledger, &ctx, owner, nft_mint, nft_seller_token).await;
        self.finish(step, result)
    }

    /// Withdraws the signer's share of the latest sale into `withdraw_pot`.
    pub async fn withdraw_fund(
        &mut self,
        owner: &Keypair,
        sale_manager: &Address,
        withdraw_pot: &Address,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::WithdrawFund;
        self.begin(step)?;
        let result = send_withdraw(self.ledger, &self.ids, owner, sale_manager, withdraw_pot).await;
        self.finish(step, result)
    }

    pub async fn set_authority(
        &mut self,
        pool: &Address,
        owner: &Keypair,
        new_owner: &Address,
    ) -> Result<Signature, StepError> {
        let step = PresaleInstruction::SetAuthority;
        self.begin(step)?;
        let ix = self
            .pool_context(pool)
            .set_authority(owner.pubkey(), *new_owner);
        let result = self.ledger.submit(owner, &[], &[ix]).await;
        self.finish(step, result)
    }

    /// Derives the sale manager for (pool, NFT mint).
    pub fn sale_manager_address(&self, pool: &Address, nft_mint: &Address) -> Address {
        find_sale_manager_address(&self.ids, pool, nft_mint).0
    }

    pub async fn fetch_sale_manager(&self, sale_manager: &Address) -> Result<SaleManager, StepError> {
        fetch_record(self.ledger, sale_manager).await
    }

    fn begin(&mut self, step: PresaleInstruction) -> Result<(), StepError> {
        if self.halted {
            log_warning(step.name(), "skipped after an earlier failure");
            self.report.records.push(StepRecord {
                step,
                status: StepStatus::Skipped,
            });
            return Err(StepError::Aborted);
        }
        log_info("+", step.name());
        Ok(())
    }

    fn finish(
        &mut self,
        step: PresaleInstruction,
        result: Result<Signature, StepError>,
    ) -> Result<Signature, StepError> {
        self.finish_with(step, result.map(|signature| (signature, signature)))
    }

    fn finish_with<T>(
        &mut self,
        step: PresaleInstruction,
        result: Result<(Signature, T), StepError>,
    ) -> Result<T, StepError> {
        match result {
            Ok((signature, value)) => {
                log_success(step.name(), signature);
                self.report.records.push(StepRecord {
                    step,
                    status: StepStatus::Succeeded(signature),
                });
                Ok(value)
            }
            Err(error) => {
                log_error(step.name(), &error);
                self.report.records.push(StepRecord {
                    step,
                    status: StepStatus::Failed(error.clone()),
                });
                if self.policy == FailurePolicy::Abort {
                    self.halted = true;
                }
                Err(error)
            }
        }
    }
}

async fn send_buy<L: Ledger>(
    ledger: &L,
    ctx: &PoolContext,
    bidder: &Keypair,
    nft_mint: &Address,
    nft_bidder_token: &Address,
    bidder_token: &Address,
) -> Result<Signature, StepError> {
    let sale = resolve_sale(ledger, &ctx.sale_manager_address(nft_mint)).await?;
    let ix = ctx.buy_nft(
        bidder.pubkey(),
        *nft_mint,
        PurchaseAccounts {
            sale_pot: sale.sale_pot_address,
            nft_manager_token: sale.sale_manager.nft_pot,
            manager_pot: sale.sale_pot.pool_pot,
            nft_bidder_token: *nft_bidder_token,
            bidder_token: *bidder_token,
        },
    );
    ledger.submit(bidder, &[], &[ix]).await
}

async fn send_redeem<L: Ledger>(
    ledger: &L,
    ctx: &PoolContext,
    owner: &Keypair,
    nft_mint: &Address,
    nft_seller_token: &Address,
) -> Result<Signature, StepError> {
    let sale_manager: SaleManager =
        fetch_record(ledger, &ctx.sale_manager_address(nft_mint)).await?;
    let ix = ctx.redeem_nft(
        owner.pubkey(),
        *nft_mint,
        *nft_seller_token,
        sale_manager.nft_pot,
    );
    ledger.submit(owner, &[], &[ix]).await
}

async fn send_withdraw<L: Ledger>(
    ledger: &L,
    ids: &ProgramIds,
    owner: &Keypair,
    sale_manager: &Address,
    withdraw_pot: &Address,
) -> Result<Signature, StepError> {
    let sale = resolve_sale(ledger, sale_manager).await?;
    let ix = withdraw_fund_instruction(
        ids,
        owner.pubkey(),
        sale.sale_pot.sale_manager,
        sale.sale_pot_address,
        sale.sale_pot.pool_pot,
        *withdraw_pot,
    );
    ledger.submit(owner, &[], &[ix]).await
}
