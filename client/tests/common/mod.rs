#![allow(dead_code)]

use client::{
    context::{
        pool::ListingAccounts,
        token::TokenContext,
    },
    error::StepError,
    ledger::Ledger,
    local_ledger::LocalLedger,
    pda::find_sale_manager_address,
    scenario::scenario_metadata,
    workflow::{
        FailurePolicy,
        SaleListing,
        SaleWorkflow,
    },
};
use presale_interface::program::ProgramIds;
use solana_address::Address;
use solana_sdk::signature::{
    Keypair,
    Signer,
};

pub const INITIAL_BALANCE: u64 = 1000;
pub const WHITELIST_AMOUNT: u64 = 10;
pub const PRICE: u64 = 100;

/// A local ledger with two funded actors holding sale tokens, and an NFT mint with token accounts
/// for both of them.
pub struct Fixture {
    pub ledger: LocalLedger,
    pub ids: ProgramIds,
    pub creator: Keypair,
    pub bidder: Keypair,
    pub pool: Keypair,
    pub sale: TokenContext,
    pub nft: TokenContext,
}

impl Fixture {
    pub async fn new() -> Self {
        let ids = ProgramIds::default();
        let ledger = LocalLedger::new(ids);
        let creator = Keypair::new();
        let bidder = Keypair::new();
        ledger.fund(&creator.pubkey()).await.unwrap();
        ledger.fund(&bidder.pubkey()).await.unwrap();

        let sale = TokenContext::create_new(&ledger, creator.insecure_clone(), 9)
            .await
            .unwrap();
        let nft = TokenContext::create_new(&ledger, creator.insecure_clone(), 0)
            .await
            .unwrap();
        for owner in [creator.pubkey(), bidder.pubkey()] {
            sale.create_account_for(&ledger, &creator, &owner)
                .await
                .unwrap();
            sale.mint_to(&ledger, &owner, INITIAL_BALANCE).await.unwrap();
            nft.create_account_for(&ledger, &creator, &owner)
                .await
                .unwrap();
        }

        Self {
            ledger,
            ids,
            creator,
            bidder,
            pool: Keypair::new(),
            sale,
            nft,
        }
    }

    pub fn workflow(&self, policy: FailurePolicy) -> SaleWorkflow<'_, LocalLedger> {
        SaleWorkflow::new(&self.ledger, self.ids, policy)
    }

    pub fn pool(&self) -> Address {
        self.pool.pubkey()
    }

    pub fn sale_manager(&self) -> Address {
        find_sale_manager_address(&self.ids, &self.pool(), &self.nft.mint_address).0
    }

    pub async fn sale_balance(&self, owner: &Address) -> u64 {
        self.sale
            .get_balance_for(&self.ledger, owner)
            .await
            .unwrap()
    }

    pub async fn nft_balance(&self, owner: &Address) -> u64 {
        self.nft.get_balance_for(&self.ledger, owner).await.unwrap()
    }

    /// Creates the pool and whitelists both actors, then optionally opens the presale.
    pub async fn open_presale(&self, workflow: &mut SaleWorkflow<'_, LocalLedger>, live: bool) {
        workflow
            .init_pool(&self.creator, &self.pool, &self.sale.mint_address)
            .await
            .unwrap();
        for actor in [self.bidder.pubkey(), self.creator.pubkey()] {
            workflow
                .set_whitelist(&self.pool(), &self.creator, &actor, WHITELIST_AMOUNT, true)
                .await
                .unwrap();
        }
        if live {
            workflow
                .control_presale_live(&self.pool(), &self.creator, true)
                .await
                .unwrap();
        }
    }

    pub async fn mint_nft(
        &self,
        workflow: &mut SaleWorkflow<'_, LocalLedger>,
    ) -> Result<(), StepError> {
        workflow
            .mint_nft(
                &self.pool(),
                &self.creator,
                &self.nft.mint_address,
                &self.nft.get_account_for(&self.creator.pubkey()),
                scenario_metadata(&self.creator.pubkey(), "https://example.com/nft.json"),
            )
            .await
            .map(|_| ())
    }

    /// Initializes the sale manager and creates the escrow accounts it owns.
    pub async fn prepare_sale_manager(
        &self,
        workflow: &mut SaleWorkflow<'_, LocalLedger>,
    ) -> ListingAccounts {
        workflow
            .init_sale_manager(&self.pool(), &self.creator, &self.nft.mint_address)
            .await
            .unwrap();
        let sale_manager = self.sale_manager();
        ListingAccounts {
            nft_seller_token: self.nft.get_account_for(&self.creator.pubkey()),
            nft_manager_token: self
                .nft
                .create_account_for(&self.ledger, &self.creator, &sale_manager)
                .await
                .unwrap(),
            manager_pot: self
                .sale
                .create_account_for(&self.ledger, &self.creator, &sale_manager)
                .await
                .unwrap(),
        }
    }

    /// Opens the presale, mints the NFT and lists it at `price`.
    pub async fn list(
        &self,
        workflow: &mut SaleWorkflow<'_, LocalLedger>,
        price: u64,
    ) -> Result<SaleListing, StepError> {
        self.open_presale(workflow, true).await;
        self.mint_nft(workflow).await.unwrap();
        let accounts = self.prepare_sale_manager(workflow).await;
        workflow
            .sell_nft(
                &self.pool(),
                &self.creator,
                &self.nft.mint_address,
                accounts,
                price,
            )
            .await
    }

    pub async fn buy(
        &self,
        workflow: &mut SaleWorkflow<'_, LocalLedger>,
        buyer: &Keypair,
    ) -> Result<(), StepError> {
        workflow
            .buy_nft(
                &self.pool(),
                buyer,
                &self.nft.mint_address,
                &self.nft.get_account_for(&buyer.pubkey()),
                &self.sale.get_account_for(&buyer.pubkey()),
            )
            .await
            .map(|_| ())
    }
}
