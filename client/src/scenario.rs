//! The scripted presale scenario: set up a sale mint and two funded actors, then run the full
//! pool lifecycle from pool creation to withdrawal and report the resulting balances.

use anyhow::Context;
use colored::Colorize;
use presale_interface::{
    program::ProgramIds,
    state::{
        Creator,
        NftMetadata,
    },
};
use solana_address::Address;
use solana_sdk::signature::{
    Keypair,
    Signer,
};

use crate::{
    context::{
        pool::ListingAccounts,
        token::TokenContext,
    },
    ledger::Ledger,
    logs::{
        log_divider,
        log_info,
    },
    print_kv,
    workflow::{
        FailurePolicy,
        SaleWorkflow,
        WorkflowReport,
    },
    LogColor,
};

pub const DEFAULT_PRICE: u64 = 100;
pub const DEFAULT_WHITELIST_AMOUNT: u64 = 10;
pub const DEFAULT_INITIAL_BALANCE: u64 = 1000;
pub const SALE_MINT_DECIMALS: u8 = 9;
/// 3% royalties on secondary sales.
pub const SELLER_FEE_BASIS_POINTS: u16 = 300;

#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    pub price: u64,
    pub whitelist_amount: u64,
    /// Sale tokens minted to each actor before the pipeline runs.
    pub initial_balance: u64,
    pub sale_decimals: u8,
    pub metadata_uri: String,
    /// Whether to top up both actors' lamports before setup.
    pub fund_actors: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            price: DEFAULT_PRICE,
            whitelist_amount: DEFAULT_WHITELIST_AMOUNT,
            initial_balance: DEFAULT_INITIAL_BALANCE,
            sale_decimals: SALE_MINT_DECIMALS,
            metadata_uri: String::new(),
            fund_actors: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Balances {
    pub creator: u64,
    pub bidder: u64,
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub report: WorkflowReport,
    pub pool: Address,
    pub sale_mint: Address,
    pub nft_mint: Address,
    pub sale_manager: Address,
    /// The sale pot generated by the listing, if the listing went through.
    pub sale_pot: Option<Address>,
    pub initial_balances: Balances,
    pub balances: Balances,
}

impl ScenarioOutcome {
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }
}

/// The NFT minted by the scenario, with `creator` as the sole creator.
pub fn scenario_metadata(creator: &Address, uri: &str) -> NftMetadata {
    NftMetadata {
        name: "nft".into(),
        symbol: "coff".into(),
        uri: uri.into(),
        seller_fee_basis_points: SELLER_FEE_BASIS_POINTS,
        creators: vec![Creator {
            address: *creator,
            verified: false,
            share: 100,
        }],
        is_mutable: true,
    }
}

/// Runs the scenario. Setup failures (funding, mints, token accounts) end the run with an error;
/// program call failures are recorded in the returned report and handled per `policy`.
pub async fn run_sale_scenario<L: Ledger>(
    ledger: &L,
    ids: ProgramIds,
    creator: &Keypair,
    bidder: &Keypair,
    config: &ScenarioConfig,
    policy: FailurePolicy,
) -> anyhow::Result<ScenarioOutcome> {
    let creator_address = creator.pubkey();
    let bidder_address = bidder.pubkey();

    if config.fund_actors {
        ledger
            .fund(&creator_address)
            .await
            .context("Failed to fund the creator")?;
        ledger
            .fund(&bidder_address)
            .await
            .context("Failed to fund the bidder")?;
    }

    let sale_token = TokenContext::create_new(ledger, creator.insecure_clone(), config.sale_decimals)
        .await
        .context("Failed to create the sale mint")?;
    let creator_sale_token = sale_token
        .create_account_for(ledger, creator, &creator_address)
        .await?;
    let bidder_sale_token = sale_token
        .create_account_for(ledger, creator, &bidder_address)
        .await?;
    sale_token
        .mint_to(ledger, &creator_address, config.initial_balance)
        .await
        .context("Failed to mint sale tokens to the creator")?;
    sale_token
        .mint_to(ledger, &bidder_address, config.initial_balance)
        .await
        .context("Failed to mint sale tokens to the bidder")?;
    let initial_balances = Balances {
        creator: sale_token.get_balance_for(ledger, &creator_address).await?,
        bidder: sale_token.get_balance_for(ledger, &bidder_address).await?,
    };

    let pool = Keypair::new();
    let pool_address = pool.pubkey();
    log_divider();
    print_kv!("Pool", pool_address, LogColor::Info);
    print_kv!("Sale mint", sale_token.mint_address, LogColor::Info);

    // Step failures are recorded in the workflow's report, so results are only kept where a later
    // step needs them.
    let mut workflow = SaleWorkflow::new(ledger, ids, policy);
    let _ = workflow
        .init_pool(creator, &pool, &sale_token.mint_address)
        .await;
    let _ = workflow
        .set_whitelist(
            &pool_address,
            creator,
            &bidder_address,
            config.whitelist_amount,
            true,
        )
        .await;
    let _ = workflow
        .set_whitelist(
            &pool_address,
            creator,
            &creator_address,
            config.whitelist_amount,
            true,
        )
        .await;
    let _ = workflow
        .control_presale_live(&pool_address, creator, true)
        .await;

    let nft = TokenContext::create_new(ledger, creator.insecure_clone(), 0)
        .await
        .context("Failed to create the NFT mint")?;
    let nft_seller_token = nft
        .create_account_for(ledger, creator, &creator_address)
        .await?;
    print_kv!("NFT mint", nft.mint_address, LogColor::Info);

    let _ = workflow
        .mint_nft(
            &pool_address,
            creator,
            &nft.mint_address,
            &nft_seller_token,
            scenario_metadata(&creator_address, &config.metadata_uri),
        )
        .await;
    let _ = workflow
        .init_sale_manager(&pool_address, creator, &nft.mint_address)
        .await;

    let sale_manager = workflow.sale_manager_address(&pool_address, &nft.mint_address);
    let nft_manager_token = nft
        .create_account_for(ledger, creator, &sale_manager)
        .await?;
    let manager_pot = sale_token
        .create_account_for(ledger, creator, &sale_manager)
        .await?;
    print_kv!("Sale manager", sale_manager, LogColor::Info);

    let listing = workflow
        .sell_nft(
            &pool_address,
            creator,
            &nft.mint_address,
            ListingAccounts {
                nft_seller_token,
                nft_manager_token,
                manager_pot,
            },
            config.price,
        )
        .await
        .ok();

    let nft_bidder_token = nft
        .create_account_for(ledger, bidder, &bidder_address)
        .await?;
    let _ = workflow
        .buy_nft(
            &pool_address,
            bidder,
            &nft.mint_address,
            &nft_bidder_token,
            &bidder_sale_token,
        )
        .await;
    let _ = workflow
        .withdraw_fund(creator, &sale_manager, &creator_sale_token)
        .await;

    let balances = Balances {
        creator: sale_token.get_balance_for(ledger, &creator_address).await?,
        bidder: sale_token.get_balance_for(ledger, &bidder_address).await?,
    };
    log_info("creator balance", balances.creator);
    log_info("bidder balance", balances.bidder);

    Ok(ScenarioOutcome {
        report: workflow.into_report(),
        pool: pool_address,
        sale_mint: sale_token.mint_address,
        nft_mint: nft.mint_address,
        sale_manager,
        sale_pot: listing.map(|listing| listing.sale_pot),
        initial_balances,
        balances,
    })
}
