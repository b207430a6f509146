mod common;

use client::{
    error::StepError,
    ledger::Ledger,
    views::{
        fetch_record,
        resolve_sale,
    },
    workflow::{
        FailurePolicy,
        StepStatus,
    },
};
use common::{
    Fixture,
    INITIAL_BALANCE,
    PRICE,
    WHITELIST_AMOUNT,
};
use presale_interface::{
    error::PoolError,
    instructions::PresaleInstruction,
    state::{
        SaleManager,
        SaleState,
        WhitelistEntry,
    },
};
use solana_sdk::signature::Signer;

#[tokio::test]
async fn whitelist_upsert_keeps_the_latest_amount() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    workflow
        .init_pool(&fx.creator, &fx.pool, &fx.sale.mint_address)
        .await
        .unwrap();

    let bidder = fx.bidder.pubkey();
    workflow
        .set_whitelist(&fx.pool(), &fx.creator, &bidder, WHITELIST_AMOUNT, true)
        .await
        .unwrap();
    workflow
        .set_whitelist(&fx.pool(), &fx.creator, &bidder, 3, true)
        .await
        .unwrap();

    let entry_address = workflow.pool_context(&fx.pool()).whitelist_address(&bidder);
    let entry: WhitelistEntry = fetch_record(&fx.ledger, &entry_address).await.unwrap();
    assert_eq!(entry.amount, 3);
    assert_eq!(entry.owner, bidder);
    assert_eq!(entry.pool, fx.pool());

    let report = workflow.into_report();
    assert!(report.is_success());
    let steps = report.records.iter().map(|r| r.step).collect::<Vec<_>>();
    assert_eq!(
        steps,
        vec![
            PresaleInstruction::InitPool,
            PresaleInstruction::SetWhitelist,
            PresaleInstruction::UpdateWhitelist,
        ]
    );
}

#[tokio::test]
async fn whitelist_changes_are_rejected_once_live() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.open_presale(&mut workflow, true).await;

    let error = workflow
        .update_whitelist(&fx.pool(), &fx.creator, &fx.bidder.pubkey(), 1, true)
        .await
        .unwrap_err();
    assert_eq!(error.pool_error(), Some(PoolError::PresaleLive));
}

#[tokio::test]
async fn duplicate_sale_manager_init_is_a_recorded_failure() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.open_presale(&mut workflow, true).await;
    fx.mint_nft(&mut workflow).await.unwrap();
    let accounts = fx.prepare_sale_manager(&mut workflow).await;

    let error = workflow
        .init_sale_manager(&fx.pool(), &fx.creator, &fx.nft.mint_address)
        .await
        .unwrap_err();
    assert!(matches!(error, StepError::Rejected { code: Some(0), .. }));

    // The workflow keeps going and the existing manager is still usable.
    workflow
        .sell_nft(
            &fx.pool(),
            &fx.creator,
            &fx.nft.mint_address,
            accounts,
            PRICE,
        )
        .await
        .unwrap();

    let report = workflow.report();
    assert_eq!(report.failed().count(), 1);
    assert_eq!(
        report.first_failure().map(|(step, _)| *step),
        Some(PresaleInstruction::InitSaleManager)
    );
    assert!(matches!(
        report.records.last().map(|r| &r.status),
        Some(StepStatus::Succeeded(_))
    ));
}

#[tokio::test]
async fn buying_before_any_sale_cannot_resolve_the_sale_pot() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.open_presale(&mut workflow, true).await;
    fx.mint_nft(&mut workflow).await.unwrap();
    fx.prepare_sale_manager(&mut workflow).await;

    let error = fx.buy(&mut workflow, &fx.bidder).await.unwrap_err();
    assert!(matches!(error, StepError::Resolution(_)));
    assert_eq!(fx.sale_balance(&fx.bidder.pubkey()).await, INITIAL_BALANCE);
}

#[tokio::test]
async fn non_owner_cannot_toggle_the_presale() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.open_presale(&mut workflow, false).await;

    let error = workflow
        .control_presale_live(&fx.pool(), &fx.bidder, true)
        .await
        .unwrap_err();
    assert!(matches!(error, StepError::Authorization(_)));
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn abort_policy_skips_everything_after_the_first_failure() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Abort);
    workflow
        .init_pool(&fx.creator, &fx.pool, &fx.sale.mint_address)
        .await
        .unwrap();
    assert!(workflow
        .control_presale_live(&fx.pool(), &fx.bidder, true)
        .await
        .is_err());

    let skipped = workflow
        .control_presale_live(&fx.pool(), &fx.creator, true)
        .await;
    assert_eq!(skipped, Err(StepError::Aborted));
    let skipped = workflow
        .init_sale_manager(&fx.pool(), &fx.creator, &fx.nft.mint_address)
        .await;
    assert_eq!(skipped, Err(StepError::Aborted));

    let report = workflow.into_report();
    assert_eq!(report.succeeded().count(), 1);
    assert_eq!(report.failed().count(), 1);
    assert_eq!(report.skipped().count(), 2);
    assert!(!report.is_success());

    // Nothing was sent for the skipped steps.
    let pool: presale_interface::state::Pool =
        fetch_record(&fx.ledger, &fx.pool()).await.unwrap();
    assert!(!pool.presale_live);
}

#[tokio::test]
async fn minting_requires_a_live_presale() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.open_presale(&mut workflow, false).await;

    // The program reuses the `PresaleLive` code (303) for a closed presale on this path.
    let error = fx.mint_nft(&mut workflow).await.unwrap_err();
    assert_eq!(error.pool_error(), Some(PoolError::PresaleLive));
    assert!(matches!(error, StepError::Rejected { code: Some(303), .. }));
    assert_eq!(fx.nft_balance(&fx.creator.pubkey()).await, 0);
}

#[tokio::test]
async fn minting_spends_whitelist_allowance() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.open_presale(&mut workflow, true).await;
    fx.mint_nft(&mut workflow).await.unwrap();

    let entry_address = workflow
        .pool_context(&fx.pool())
        .whitelist_address(&fx.creator.pubkey());
    let entry: WhitelistEntry = fetch_record(&fx.ledger, &entry_address).await.unwrap();
    assert_eq!(entry.amount, WHITELIST_AMOUNT - 1);
    assert_eq!(fx.nft_balance(&fx.creator.pubkey()).await, 1);

    let mint = fx.ledger.mint(&fx.nft.mint_address).unwrap();
    assert_eq!(mint.supply, 1);
    assert_eq!(mint.authority, None);

    // Each NFT mint carries a single extended metadata record.
    assert_eq!(
        fx.mint_nft(&mut workflow).await.unwrap_err(),
        StepError::Rejected {
            code: Some(0),
            reason: "account already in use".into(),
            from_presale: true,
        }
    );
}

#[tokio::test]
async fn listing_above_max_price_is_rejected() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.open_presale(&mut workflow, true).await;
    fx.mint_nft(&mut workflow).await.unwrap();
    workflow
        .set_max_price(&fx.pool(), &fx.creator, &fx.nft.mint_address, PRICE / 2)
        .await
        .unwrap();
    let accounts = fx.prepare_sale_manager(&mut workflow).await;

    let error = workflow
        .sell_nft(
            &fx.pool(),
            &fx.creator,
            &fx.nft.mint_address,
            accounts,
            PRICE,
        )
        .await
        .unwrap_err();
    assert_eq!(error.pool_error(), Some(PoolError::InvalidPrice));
    assert_eq!(fx.nft_balance(&fx.creator.pubkey()).await, 1);

    workflow
        .sell_nft(
            &fx.pool(),
            &fx.creator,
            &fx.nft.mint_address,
            accounts,
            PRICE / 2,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn sell_escrows_the_nft_and_records_the_sale_pot() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    let listing = fx.list(&mut workflow, PRICE).await.unwrap();

    let sale = resolve_sale(&fx.ledger, &fx.sale_manager()).await.unwrap();
    assert_eq!(sale.sale_pot_address, listing.sale_pot);
    assert_eq!(sale.sale_manager.state(), Some(SaleState::Listed));
    assert_eq!(sale.sale_manager.seller, fx.creator.pubkey());
    assert_eq!(sale.sale_manager.price, PRICE);
    assert_eq!(sale.sale_pot.sale_manager, fx.sale_manager());
    assert!(sale.sale_pot.is_primary);
    assert_eq!(sale.sale_pot.seller_fee_basis_points, 300);

    assert_eq!(fx.nft_balance(&fx.creator.pubkey()).await, 0);
    assert_eq!(fx.nft_balance(&fx.sale_manager()).await, 1);
    let metadata = fx.ledger.metadata_for(&fx.nft.mint_address).unwrap();
    assert_eq!(metadata.update_authority, fx.sale_manager());
}

#[tokio::test]
async fn seller_cannot_buy_their_own_listing() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.list(&mut workflow, PRICE).await.unwrap();

    let error = fx.buy(&mut workflow, &fx.creator).await.unwrap_err();
    assert_eq!(error.pool_error(), Some(PoolError::InvalidBidder));
}

#[tokio::test]
async fn buying_with_too_few_tokens_is_rejected() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.list(&mut workflow, INITIAL_BALANCE + 1).await.unwrap();

    let error = fx.buy(&mut workflow, &fx.bidder).await.unwrap_err();
    assert_eq!(error.pool_error(), Some(PoolError::NotEnoughTokenAmount));
}

#[tokio::test]
async fn redeem_returns_the_nft_to_the_seller() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.list(&mut workflow, PRICE).await.unwrap();

    let nft_seller_token = fx.nft.get_account_for(&fx.creator.pubkey());
    let error = workflow
        .redeem_nft(&fx.pool(), &fx.bidder, &fx.nft.mint_address, &nft_seller_token)
        .await
        .unwrap_err();
    assert_eq!(error.pool_error(), Some(PoolError::InvalidSeller));

    workflow
        .redeem_nft(&fx.pool(), &fx.creator, &fx.nft.mint_address, &nft_seller_token)
        .await
        .unwrap();
    assert_eq!(fx.nft_balance(&fx.creator.pubkey()).await, 1);
    assert_eq!(fx.nft_balance(&fx.sale_manager()).await, 0);
    let manager: SaleManager = fetch_record(&fx.ledger, &fx.sale_manager()).await.unwrap();
    assert_eq!(manager.state(), Some(SaleState::Idle));
    let metadata = fx.ledger.metadata_for(&fx.nft.mint_address).unwrap();
    assert_eq!(metadata.update_authority, fx.creator.pubkey());

    // A redeemed NFT can't be bought.
    let error = fx.buy(&mut workflow, &fx.bidder).await.unwrap_err();
    assert_eq!(error.pool_error(), Some(PoolError::InvalidSaleState));
}

#[tokio::test]
async fn creator_withdraws_a_primary_sale_once() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.list(&mut workflow, PRICE).await.unwrap();
    fx.buy(&mut workflow, &fx.bidder).await.unwrap();

    let metadata = fx.ledger.metadata_for(&fx.nft.mint_address).unwrap();
    assert!(metadata.primary_sale_happened);
    assert_eq!(metadata.update_authority, fx.bidder.pubkey());
    assert_eq!(fx.nft_balance(&fx.bidder.pubkey()).await, 1);

    let creator_token = fx.sale.get_account_for(&fx.creator.pubkey());
    workflow
        .withdraw_fund(&fx.creator, &fx.sale_manager(), &creator_token)
        .await
        .unwrap();
    assert_eq!(
        fx.sale_balance(&fx.creator.pubkey()).await,
        INITIAL_BALANCE + PRICE
    );

    let error = workflow
        .withdraw_fund(&fx.creator, &fx.sale_manager(), &creator_token)
        .await
        .unwrap_err();
    assert_eq!(error.pool_error(), Some(PoolError::InvalidAmount));
    assert_eq!(
        fx.sale_balance(&fx.creator.pubkey()).await,
        INITIAL_BALANCE + PRICE
    );
}

#[tokio::test]
async fn transferred_authority_locks_out_the_previous_owner() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    workflow
        .init_pool(&fx.creator, &fx.pool, &fx.sale.mint_address)
        .await
        .unwrap();
    workflow
        .set_authority(&fx.pool(), &fx.creator, &fx.bidder.pubkey())
        .await
        .unwrap();

    let error = workflow
        .control_presale_live(&fx.pool(), &fx.creator, true)
        .await
        .unwrap_err();
    assert!(matches!(error, StepError::Authorization(_)));
    workflow
        .control_presale_live(&fx.pool(), &fx.bidder, true)
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_transactions_leave_the_ledger_untouched() {
    let fx = Fixture::new().await;
    let mut workflow = fx.workflow(FailurePolicy::Continue);
    fx.list(&mut workflow, PRICE).await.unwrap();
    let before = fx.ledger.fetch_account_data(&fx.sale_manager()).await.unwrap();

    fx.buy(&mut workflow, &fx.creator).await.unwrap_err();

    let after = fx.ledger.fetch_account_data(&fx.sale_manager()).await.unwrap();
    assert_eq!(before, after);
    assert_eq!(fx.sale_balance(&fx.creator.pubkey()).await, INITIAL_BALANCE);
}
