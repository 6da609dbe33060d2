use commons::{AuthorityUpdateParams, AuthorityViewParams, ContractTokenId, CustomContractError};
use concordium_cis2::Receiver;
use concordium_std::*;

use crate::events::*;
use crate::external::*;
use crate::payout;
use crate::registry;
use crate::state::{Auction, Payment, Settlement, State};

/// Initialize a paused auction house. The first lot is created on `unpause`.
#[init(contract = "SequiturAuctionHouse", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    params.config.validate()?;
    Ok(State::new(state_builder, params, ctx.init_origin()))
}

/// Mint the next lot and put it up for auction.
fn create_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> Result<(), CustomContractError> {
    host.state().ensure_can_create()?;

    let token = host.state().token;
    let lot_id = registry::mint_next(host, &token)?;
    let auction = host
        .state_mut()
        .start_auction(lot_id, ctx.metadata().slot_time())?;

    logger.log(&AuctionEvent::created(
        auction.lot_id,
        auction.start_time,
        auction.end_time,
    ))?;

    Ok(())
}

/// Close the open lot: hand it to the winner and pay out, or burn it if unsold.
fn settle_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> Result<(), CustomContractError> {
    // Mark the lot settled before any external call
    let settlement = host.state_mut().settle(ctx.metadata().slot_time())?;
    let token = host.state().token;

    match settlement {
        Settlement::Sold {
            lot_id,
            winner,
            amount,
        } => {
            match winner {
                Address::Account(account) => {
                    let delivered = registry::transfer(
                        host,
                        &token,
                        lot_id,
                        Address::Contract(ctx.self_address()),
                        Receiver::Account(account),
                    );
                    if delivered.is_err() {
                        host.state_mut().escrow_lot(lot_id, winner);
                        logger.log(&AuctionEvent::lot_escrowed(lot_id, winner))?;
                    }
                }
                // Delivering to a contract runs its receive hook, so contract
                // winners always collect through `claimLot`
                Address::Contract(_) => {
                    host.state_mut().escrow_lot(lot_id, winner);
                    logger.log(&AuctionEvent::lot_escrowed(lot_id, winner))?;
                }
            }

            let recipient = host.state().config.proceeds_recipient;
            payout::deliver(host, logger, Payment { recipient, amount })?;

            logger.log(&AuctionEvent::settled(lot_id, Some(winner), amount))?;
        }
        Settlement::Unsold { lot_id } => {
            registry::burn(host, &token, lot_id)?;
            logger.log(&AuctionEvent::settled(lot_id, None, Amount::zero()))?;
        }
    }

    Ok(())
}

/// Start the first lot by hand, or the next one after `settleAuction`.
#[receive(
    mutable,
    contract = "SequiturAuctionHouse",
    name = "createAuction",
    enable_logger
)]
fn contract_create_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    ensure!(
        host.state().authority.has_admin_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );
    create_auction(ctx, host, logger)?;
    Ok(())
}

#[receive(
    mutable,
    payable,
    contract = "SequiturAuctionHouse",
    name = "bid",
    parameter = "ContractTokenId",
    enable_logger
)]
fn contract_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let lot_id = ContractTokenId::deserial(&mut ctx.parameter_cursor())?;
    let bidder = ctx.sender();

    let outcome = host
        .state_mut()
        .bid(lot_id, bidder, amount, ctx.metadata().slot_time())?;

    // Refund the outbid bidder only after the new bid is recorded
    if let Some(refund) = outcome.refund {
        payout::deliver(host, logger, refund)?;
    }

    logger.log(&AuctionEvent::bid(lot_id, bidder, amount, outcome.extended))?;
    if outcome.extended {
        logger.log(&AuctionEvent::extended(lot_id, outcome.end_time))?;
    }

    Ok(())
}

/// Settle the open lot and, unless paused, immediately start the next one.
///
/// A failed mint, including running out of supply, pauses the house instead of
/// failing, so the settlement itself always goes through.
#[receive(
    mutable,
    contract = "SequiturAuctionHouse",
    name = "settleCurrentAndCreateNewAuction",
    enable_logger
)]
fn contract_settle_current_and_create_new_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    settle_auction(ctx, host, logger)?;
    if host.state().paused {
        return Ok(());
    }

    // Any failure to open the next lot pauses the house and keeps the settlement
    if create_auction(ctx, host, logger).is_err() {
        host.state_mut().paused = true;
        logger.log(&AuctionEvent::paused(Address::Contract(ctx.self_address())))?;
    }

    Ok(())
}

/// Settle the open lot without starting another one. Allowed while paused.
#[receive(
    mutable,
    contract = "SequiturAuctionHouse",
    name = "settleAuction",
    enable_logger
)]
fn contract_settle_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    settle_auction(ctx, host, logger)?;
    Ok(())
}

/// Halt lot creation. The open lot keeps taking bids and can still be settled.
#[receive(
    mutable,
    contract = "SequiturAuctionHouse",
    name = "pause",
    enable_logger
)]
fn contract_pause<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = ctx.sender();
    ensure!(
        host.state().authority.has_guardian_rights(&sender),
        CustomContractError::Unauthorized.into()
    );

    host.state_mut().paused = true;
    logger.log(&AuctionEvent::paused(sender))?;

    Ok(())
}

/// Resume lot creation, starting a new lot right away unless one is still open.
#[receive(
    mutable,
    contract = "SequiturAuctionHouse",
    name = "unpause",
    enable_logger
)]
fn contract_unpause<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = ctx.sender();
    ensure!(
        host.state().authority.has_admin_rights(&sender),
        CustomContractError::Unauthorized.into()
    );

    host.state_mut().paused = false;
    logger.log(&AuctionEvent::unpaused(sender))?;

    if !host.state().has_open_lot() {
        create_auction(ctx, host, logger)?;
    }

    Ok(())
}

/// Withdraw everything the internal ledger owes the sender.
#[receive(
    mutable,
    contract = "SequiturAuctionHouse",
    name = "claimCredit",
    parameter = "ClaimCreditParams",
    enable_logger
)]
fn contract_claim_credit<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let params = ClaimCreditParams::deserial(&mut ctx.parameter_cursor())?;
    let owner = ctx.sender();
    let amount = host.state_mut().take_credit(&owner)?;

    match params.to {
        Receiver::Account(account) => host.invoke_transfer(&account, amount)?,
        Receiver::Contract(contract, entrypoint) => {
            host.invoke_contract(
                &contract,
                &owner,
                entrypoint.as_entrypoint_name(),
                amount,
            )?;
        }
    }

    logger.log(&AuctionEvent::credit_claimed(owner, amount))?;

    Ok(())
}

/// Collect a lot that could not be delivered at settlement.
#[receive(
    mutable,
    contract = "SequiturAuctionHouse",
    name = "claimLot",
    parameter = "ClaimLotParams"
)]
fn contract_claim_lot<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let params = ClaimLotParams::deserial(&mut ctx.parameter_cursor())?;
    host.state_mut()
        .release_lot(&params.lot_id, &ctx.sender())?;

    let token = host.state().token;
    ensure!(
        registry::exists(host, &token, &params.lot_id)?,
        CustomContractError::UnknownToken.into()
    );
    registry::transfer(
        host,
        &token,
        params.lot_id,
        Address::Contract(ctx.self_address()),
        params.to,
    )?;

    Ok(())
}

#[receive(
    mutable,
    contract = "SequiturAuctionHouse",
    name = "updateAuthority",
    parameter = "AuthorityUpdateParams"
)]
fn contract_update_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let params = AuthorityUpdateParams::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    host.state_mut()
        .authority
        .handle_update(sender, params)?;
    Ok(())
}

#[receive(
    contract = "SequiturAuctionHouse",
    name = "viewAuthority",
    parameter = "AuthorityViewParams",
    return_value = "Vec<Address>"
)]
fn contract_view_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<Address>> {
    let params = AuthorityViewParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().authority.handle_view(params))
}

#[receive(
    contract = "SequiturAuctionHouse",
    name = "viewAuction",
    return_value = "Option<Auction>"
)]
fn contract_view_auction<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Option<Auction>> {
    Ok(host.state().auction.clone())
}

#[receive(
    contract = "SequiturAuctionHouse",
    name = "viewConfig",
    return_value = "EngineConfig"
)]
fn contract_view_config<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<EngineConfig> {
    Ok(host.state().config.clone())
}

#[receive(contract = "SequiturAuctionHouse", name = "isPaused", return_value = "bool")]
fn contract_is_paused<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<bool> {
    Ok(host.state().paused)
}

#[receive(
    contract = "SequiturAuctionHouse",
    name = "viewCredit",
    parameter = "Address",
    return_value = "Amount"
)]
fn contract_view_credit<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Amount> {
    let owner = Address::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().credit_of(&owner))
}

#[receive(
    contract = "SequiturAuctionHouse",
    name = "viewEscrowedLot",
    parameter = "ContractTokenId",
    return_value = "Option<Address>"
)]
fn contract_view_escrowed_lot<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Option<Address>> {
    let lot_id = ContractTokenId::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().escrow.get(&lot_id).map(|winner| *winner))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::{AuthorityField, AuthorityUpdateKind};
    use concordium_cis2::TokenIdU32;
    use concordium_std::test_infrastructure::*;
    use std::{cell::Cell, rc::Rc};

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const TREASURY: AccountAddress = AccountAddress([2; 32]);
    const GUARDIAN: AccountAddress = AccountAddress([3; 32]);
    const CLAIM_DESTINATION: AccountAddress = AccountAddress([4; 32]);
    const BIDDER_1: AccountAddress = AccountAddress([16; 32]);
    const BIDDER_2: AccountAddress = AccountAddress([17; 32]);
    const BIDDER_CONTRACT: ContractAddress = ContractAddress {
        index: 66,
        subindex: 0,
    };
    const TOKEN: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const WCCD: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const SELF_ADDRESS: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };

    const START: u64 = 1_000_000;
    const DAY: u64 = 86_400_000;
    const BUFFER: u64 = 900_000;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn config() -> EngineConfig {
        EngineConfig {
            time_buffer: Duration::from_millis(BUFFER),
            reserve_price: Amount::from_micro_ccd(2),
            min_bid_increment_percentage: 5,
            duration: Duration::from_millis(DAY),
            proceeds_recipient: Address::Account(TREASURY),
        }
    }

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        let bytes = to_bytes(&InitParams {
            token: TOKEN,
            wccd: WCCD,
            config: config(),
        });
        ctx.set_init_origin(ADMIN).set_parameter(&bytes);

        let mut state_builder = TestStateBuilder::new();
        let state = contract_init(&ctx, &mut state_builder)
            .expect_report("Failed during init_SequiturAuctionHouse");
        let mut host = TestHost::new(state, state_builder);
        host.set_self_balance(Amount::from_micro_ccd(1_000_000));
        host
    }

    /// Token mock minting ids `first..=last`, then rejecting like an exhausted supply.
    fn setup_token(host: &mut TestHost<State<TestStateApi>>, first: u32, last: u32) {
        let next_id = Rc::new(Cell::new(first));
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("mint".into()),
            MockFn::new_v1(move |_, _, _, _| {
                let id = next_id.get();
                if id > last {
                    return Err(CallContractError::LogicReject {
                        reason: -14,
                        return_value: None,
                    });
                }
                next_id.set(id + 1);
                Ok((true, Some(TokenIdU32(id))))
            }),
        );
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|_, _, _, _| Ok((true, ()))),
        );
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("burn".into()),
            MockFn::new_v1(|_, _, _, _| Ok((true, ()))),
        );
    }

    fn receive_ctx<'a>(sender: Address, millis: u64, parameter: &'a [u8]) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender)
            .set_self_address(SELF_ADDRESS)
            .set_metadata_slot_time(at(millis))
            .set_parameter(parameter);
        ctx
    }

    /// Host with lot 1 open since `START`.
    fn open_host() -> TestHost<State<TestStateApi>> {
        let mut host = default_host();
        setup_token(&mut host, 1, 400);
        let ctx = receive_ctx(Address::Account(ADMIN), START, &[]);
        let mut logger = TestLogger::init();
        contract_unpause(&ctx, &mut host, &mut logger).expect_report("Unpause should open lot 1");
        host
    }

    fn place_bid(
        host: &mut TestHost<State<TestStateApi>>,
        logger: &mut TestLogger,
        bidder: Address,
        lot: u32,
        micro_ccd: u64,
        millis: u64,
    ) -> ReceiveResult<()> {
        let bytes = to_bytes(&TokenIdU32(lot));
        let ctx = receive_ctx(bidder, millis, &bytes);
        contract_bid(&ctx, host, Amount::from_micro_ccd(micro_ccd), logger)
    }

    fn add_guardian(host: &mut TestHost<State<TestStateApi>>) {
        let bytes = to_bytes(&AuthorityUpdateParams {
            field: AuthorityField::Guardian,
            kind: AuthorityUpdateKind::Add,
            address: Address::Account(GUARDIAN),
        });
        let ctx = receive_ctx(Address::Account(ADMIN), START, &bytes);
        claim_eq!(contract_update_authority(&ctx, host), Ok(()));
    }

    fn current_auction(host: &TestHost<State<TestStateApi>>) -> Auction {
        host.state()
            .auction
            .clone()
            .expect_report("An auction should exist")
    }

    #[concordium_test]
    fn test_init() {
        let host = default_host();
        let state = host.state();

        claim!(state.paused);
        claim_eq!(state.auction, None);
        claim_eq!(state.config, config());
        claim!(state.authority.has_admin_rights(&Address::Account(ADMIN)));
    }

    #[concordium_test]
    fn test_init_rejects_zero_duration() {
        let mut ctx = TestInitContext::empty();
        let mut bad_config = config();
        bad_config.duration = Duration::from_millis(0);
        let bytes = to_bytes(&InitParams {
            token: TOKEN,
            wccd: WCCD,
            config: bad_config,
        });
        ctx.set_init_origin(ADMIN).set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        match contract_init(&ctx, &mut state_builder) {
            Err(reject) => claim_eq!(reject, CustomContractError::InvalidConfig.into()),
            Ok(_) => fail!("Zero duration must be rejected"),
        }
    }

    #[concordium_test]
    fn test_unpause_creates_first_lot() {
        let mut host = default_host();
        setup_token(&mut host, 1, 400);
        let ctx = receive_ctx(Address::Account(ADMIN), START, &[]);
        let mut logger = TestLogger::init();

        let result = contract_unpause(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim!(!host.state().paused);
        claim_eq!(
            current_auction(&host),
            Auction {
                lot_id: TokenIdU32(1),
                amount: Amount::zero(),
                bidder: None,
                start_time: at(START),
                end_time: at(START + DAY),
                settled: false,
            }
        );
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvent::unpaused(Address::Account(ADMIN))),
                to_bytes(&AuctionEvent::created(
                    TokenIdU32(1),
                    at(START),
                    at(START + DAY)
                )),
            ]
        );
    }

    #[concordium_test]
    fn test_create_auction_guards() {
        let mut host = default_host();
        setup_token(&mut host, 1, 400);
        let mut logger = TestLogger::init();

        let ctx = receive_ctx(Address::Account(BIDDER_1), START, &[]);
        claim_eq!(
            contract_create_auction(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized.into())
        );

        let ctx = receive_ctx(Address::Account(ADMIN), START, &[]);
        claim_eq!(
            contract_create_auction(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Paused.into())
        );

        host.state_mut().paused = false;
        claim_eq!(contract_create_auction(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            contract_create_auction(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionInProgress.into())
        );
        claim_eq!(current_auction(&host).lot_id, TokenIdU32(1));
    }

    #[concordium_test]
    fn test_bid_refunds_previous_account_bidder() {
        let mut host = open_host();
        let mut logger = TestLogger::init();

        claim_eq!(
            place_bid(&mut host, &mut logger, Address::Account(BIDDER_1), 1, 10, START + 1),
            Ok(())
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, Address::Account(BIDDER_2), 1, 20, START + 2),
            Ok(())
        );

        claim!(host.transfer_occurred(&BIDDER_1, Amount::from_micro_ccd(10)));
        let auction = current_auction(&host);
        claim_eq!(auction.bidder, Some(Address::Account(BIDDER_2)));
        claim_eq!(auction.amount, Amount::from_micro_ccd(20));
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvent::bid(
                    TokenIdU32(1),
                    Address::Account(BIDDER_1),
                    Amount::from_micro_ccd(10),
                    false
                )),
                to_bytes(&AuctionEvent::bid(
                    TokenIdU32(1),
                    Address::Account(BIDDER_2),
                    Amount::from_micro_ccd(20),
                    false
                )),
            ]
        );
    }

    #[concordium_test]
    fn test_bid_rejections() {
        let mut host = open_host();
        let mut logger = TestLogger::init();
        let bidder = Address::Account(BIDDER_1);

        claim_eq!(
            place_bid(&mut host, &mut logger, bidder, 2, 10, START + 1),
            Err(CustomContractError::WrongLot.into())
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, bidder, 1, 1, START + 1),
            Err(CustomContractError::BidTooLow.into())
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, bidder, 1, 10, START + DAY),
            Err(CustomContractError::AuctionExpired.into())
        );
        claim!(logger.logs.is_empty());
        claim_eq!(current_auction(&host).bidder, None);
    }

    #[concordium_test]
    fn test_outbid_contract_cannot_block_new_bid() {
        let mut host = open_host();
        let mut logger = TestLogger::init();
        let hostile = Address::Contract(BIDDER_CONTRACT);

        claim_eq!(
            place_bid(&mut host, &mut logger, hostile, 1, 10, START + 1),
            Ok(())
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, Address::Account(BIDDER_1), 1, 20, START + 2),
            Ok(())
        );

        claim_eq!(host.state().credit_of(&hostile), Amount::from_micro_ccd(10));
        claim_eq!(
            current_auction(&host).bidder,
            Some(Address::Account(BIDDER_1))
        );
        claim_eq!(
            logger.logs[1],
            to_bytes(&AuctionEvent::payment_credited(
                hostile,
                Amount::from_micro_ccd(10),
                CreditKind::Ledger
            ))
        );
    }

    #[concordium_test]
    fn test_claim_credit() {
        let mut host = open_host();
        let mut logger = TestLogger::init();
        let hostile = Address::Contract(BIDDER_CONTRACT);
        let _ = place_bid(&mut host, &mut logger, hostile, 1, 10, START + 1);
        let _ = place_bid(&mut host, &mut logger, Address::Account(BIDDER_1), 1, 20, START + 2);

        let mut logger = TestLogger::init();
        let bytes = to_bytes(&ClaimCreditParams {
            to: Receiver::Account(CLAIM_DESTINATION),
        });
        let ctx = receive_ctx(hostile, START + 3, &bytes);

        claim_eq!(contract_claim_credit(&ctx, &mut host, &mut logger), Ok(()));
        claim!(host.transfer_occurred(&CLAIM_DESTINATION, Amount::from_micro_ccd(10)));
        claim_eq!(host.state().credit_of(&hostile), Amount::zero());
        claim_eq!(
            logger.logs,
            vec![to_bytes(&AuctionEvent::credit_claimed(
                hostile,
                Amount::from_micro_ccd(10)
            ))]
        );

        claim_eq!(
            contract_claim_credit(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NothingToClaim.into())
        );
    }

    #[concordium_test]
    fn test_late_bid_extends_auction() {
        let mut host = open_host();
        let mut logger = TestLogger::init();
        let slot_time = START + DAY - 60_000;

        claim_eq!(
            place_bid(&mut host, &mut logger, Address::Account(BIDDER_1), 1, 10, slot_time),
            Ok(())
        );

        claim_eq!(current_auction(&host).end_time, at(slot_time + BUFFER));
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvent::bid(
                    TokenIdU32(1),
                    Address::Account(BIDDER_1),
                    Amount::from_micro_ccd(10),
                    true
                )),
                to_bytes(&AuctionEvent::extended(
                    TokenIdU32(1),
                    at(slot_time + BUFFER)
                )),
            ]
        );

        // The old end time no longer closes the auction
        claim_eq!(
            place_bid(&mut host, &mut logger, Address::Account(BIDDER_2), 1, 20, START + DAY),
            Ok(())
        );
    }

    #[concordium_test]
    fn test_settle_sold_lot_and_create_next() {
        let mut host = open_host();
        let mut logger = TestLogger::init();
        let _ = place_bid(&mut host, &mut logger, Address::Account(BIDDER_1), 1, 20, START + 1);

        let settled_before_transfer = Rc::new(Cell::new(false));
        let observed = settled_before_transfer.clone();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(move |_, _, _, state: &mut State<TestStateApi>| {
                observed.set(state.auction.as_ref().map_or(false, |auction| auction.settled));
                Ok((true, ()))
            }),
        );

        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(BIDDER_2), START + DAY, &[]);
        let result = contract_settle_current_and_create_new_auction(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim!(settled_before_transfer.get());
        claim!(host.transfer_occurred(&TREASURY, Amount::from_micro_ccd(20)));
        claim_eq!(current_auction(&host).lot_id, TokenIdU32(2));
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvent::settled(
                    TokenIdU32(1),
                    Some(Address::Account(BIDDER_1)),
                    Amount::from_micro_ccd(20)
                )),
                to_bytes(&AuctionEvent::created(
                    TokenIdU32(2),
                    at(START + DAY),
                    at(START + 2 * DAY)
                )),
            ]
        );
    }

    #[concordium_test]
    fn test_settle_unsold_lot_burns() {
        let mut host = open_host();
        let burned = Rc::new(Cell::new(None));
        let observed = burned.clone();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("burn".into()),
            MockFn::new_v1(move |param, _, _, _| {
                let lot_id = ContractTokenId::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                observed.set(Some(lot_id));
                Ok((true, ()))
            }),
        );

        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY, &[]);
        let result = contract_settle_current_and_create_new_auction(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(burned.get(), Some(TokenIdU32(1)));
        claim_eq!(
            logger.logs[0],
            to_bytes(&AuctionEvent::settled(TokenIdU32(1), None, Amount::zero()))
        );
        claim_eq!(current_auction(&host).lot_id, TokenIdU32(2));
    }

    #[concordium_test]
    fn test_settle_timing_and_repeat() {
        let mut host = open_host();
        let mut logger = TestLogger::init();

        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY - 1, &[]);
        claim_eq!(
            contract_settle_auction(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionNotYetEnded.into())
        );

        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY, &[]);
        claim_eq!(contract_settle_auction(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            contract_settle_auction(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AlreadySettled.into())
        );

        // settleAuction never opens a new lot
        claim!(!host.state().has_open_lot());
        claim_eq!(current_auction(&host).lot_id, TokenIdU32(1));
    }

    #[concordium_test]
    fn test_settle_without_any_lot() {
        let mut host = default_host();
        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(BIDDER_1), START, &[]);

        claim_eq!(
            contract_settle_auction(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NoAuction.into())
        );
    }

    #[concordium_test]
    fn test_pause_mid_lot() {
        let mut host = open_host();
        add_guardian(&mut host);
        let mut logger = TestLogger::init();

        let ctx = receive_ctx(Address::Account(GUARDIAN), START + 1, &[]);
        claim_eq!(contract_pause(&ctx, &mut host, &mut logger), Ok(()));

        // The open lot still takes bids and settles
        claim_eq!(
            place_bid(&mut host, &mut logger, Address::Account(BIDDER_1), 1, 10, START + 2),
            Ok(())
        );
        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY, &[]);
        claim_eq!(
            contract_settle_current_and_create_new_auction(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim!(!host.state().has_open_lot());
        claim_eq!(current_auction(&host).lot_id, TokenIdU32(1));

        let ctx = receive_ctx(Address::Account(ADMIN), START + DAY + 5, &[]);
        claim_eq!(contract_unpause(&ctx, &mut host, &mut logger), Ok(()));
        let auction = current_auction(&host);
        claim_eq!(auction.lot_id, TokenIdU32(2));
        claim_eq!(auction.start_time, at(START + DAY + 5));
    }

    #[concordium_test]
    fn test_pause_and_unpause_while_lot_open() {
        let mut host = open_host();
        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(ADMIN), START + 1, &[]);

        claim_eq!(contract_pause(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(contract_unpause(&ctx, &mut host, &mut logger), Ok(()));

        claim_eq!(current_auction(&host).lot_id, TokenIdU32(1));
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvent::paused(Address::Account(ADMIN))),
                to_bytes(&AuctionEvent::unpaused(Address::Account(ADMIN))),
            ]
        );
    }

    #[concordium_test]
    fn test_pause_rights() {
        let mut host = open_host();
        add_guardian(&mut host);
        let mut logger = TestLogger::init();

        let ctx = receive_ctx(Address::Account(BIDDER_1), START + 1, &[]);
        claim_eq!(
            contract_pause(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized.into())
        );

        // Guardians can stop the house but only admins restart it
        let ctx = receive_ctx(Address::Account(GUARDIAN), START + 1, &[]);
        claim_eq!(contract_pause(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            contract_unpause(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized.into())
        );
        claim!(host.state().paused);
    }

    #[concordium_test]
    fn test_supply_exhaustion_pauses() {
        let mut host = default_host();
        setup_token(&mut host, 400, 400);
        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(ADMIN), START, &[]);
        claim_eq!(contract_unpause(&ctx, &mut host, &mut logger), Ok(()));

        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY, &[]);
        let result = contract_settle_current_and_create_new_auction(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim!(host.state().paused);
        claim!(!host.state().has_open_lot());
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvent::settled(TokenIdU32(400), None, Amount::zero())),
                to_bytes(&AuctionEvent::paused(Address::Contract(SELF_ADDRESS))),
            ]
        );

        // An explicit restart surfaces the exhaustion
        let ctx = receive_ctx(Address::Account(ADMIN), START + DAY + 1, &[]);
        claim_eq!(
            contract_unpause(&ctx, &mut host, &mut logger),
            Err(CustomContractError::SupplyExhausted.into())
        );
    }

    #[concordium_test]
    fn test_escrow_and_claim_lot() {
        let mut host = open_host();
        let mut logger = TestLogger::init();
        let winner = Address::Contract(BIDDER_CONTRACT);
        let _ = place_bid(&mut host, &mut logger, winner, 1, 10, START + 1);

        let transferred = Rc::new(Cell::new(false));
        let transferred_in_mock = transferred.clone();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(move |_, _, _, _| {
                transferred_in_mock.set(true);
                Ok((true, ()))
            }),
        );

        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY, &[]);
        claim_eq!(contract_settle_auction(&ctx, &mut host, &mut logger), Ok(()));
        claim!(!transferred.get());
        claim!(host.transfer_occurred(&TREASURY, Amount::from_micro_ccd(10)));
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvent::lot_escrowed(TokenIdU32(1), winner)),
                to_bytes(&AuctionEvent::settled(
                    TokenIdU32(1),
                    Some(winner),
                    Amount::from_micro_ccd(10)
                )),
            ]
        );

        let bytes = to_bytes(&TokenIdU32(1));
        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY, &bytes);
        claim_eq!(
            contract_view_escrowed_lot(&ctx, &host),
            Ok(Some(winner))
        );

        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|_, _, _, _| Ok((true, ()))),
        );
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("ownerOf".into()),
            MockFn::new_v1(|_, _, _, _| Ok((false, Some(Address::Contract(SELF_ADDRESS))))),
        );

        let bytes = to_bytes(&ClaimLotParams {
            lot_id: TokenIdU32(1),
            to: Receiver::Account(CLAIM_DESTINATION),
        });
        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY + 1, &bytes);
        claim_eq!(
            contract_claim_lot(&ctx, &mut host),
            Err(CustomContractError::Unauthorized.into())
        );

        let ctx = receive_ctx(winner, START + DAY + 1, &bytes);
        claim_eq!(contract_claim_lot(&ctx, &mut host), Ok(()));
        claim_eq!(host.state().escrow.get(&TokenIdU32(1)).map(|w| *w), None);
    }

    #[concordium_test]
    fn test_failed_transfer_escrows_account_winner_lot() {
        let mut host = open_host();
        let mut logger = TestLogger::init();
        let winner = Address::Account(BIDDER_2);
        let _ = place_bid(&mut host, &mut logger, winner, 1, 10, START + 1);

        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|_, _, _, _| -> Result<(bool, ()), CallContractError<()>> {
                Err(CallContractError::LogicReject {
                    reason: -42,
                    return_value: (),
                })
            }),
        );

        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY, &[]);
        claim_eq!(contract_settle_auction(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(host.state().escrow.get(&TokenIdU32(1)).map(|w| *w), Some(winner));
        claim_eq!(
            logger.logs[0],
            to_bytes(&AuctionEvent::lot_escrowed(TokenIdU32(1), winner))
        );
    }

    #[concordium_test]
    fn test_failed_mint_after_settlement_pauses() {
        let mut host = open_host();
        let mut logger = TestLogger::init();
        let _ = place_bid(&mut host, &mut logger, Address::Account(BIDDER_2), 1, 10, START + 1);

        // The token no longer accepts the house as minter
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("mint".into()),
            MockFn::new_v1(|_, _, _, _| -> Result<(bool, ()), CallContractError<()>> {
                Err(CallContractError::LogicReject {
                    reason: -42000003,
                    return_value: (),
                })
            }),
        );

        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(BIDDER_1), START + DAY, &[]);
        claim_eq!(
            contract_settle_current_and_create_new_auction(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim!(host.state().paused);
        claim!(host.state().auction.as_ref().map_or(false, |a| a.settled));
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvent::settled(
                    TokenIdU32(1),
                    Some(Address::Account(BIDDER_2)),
                    Amount::from_micro_ccd(10)
                )),
                to_bytes(&AuctionEvent::paused(Address::Contract(SELF_ADDRESS))),
            ]
        );
    }

    #[concordium_test]
    fn test_views() {
        let host = open_host();
        let ctx = receive_ctx(Address::Account(BIDDER_1), START, &[]);

        claim_eq!(contract_is_paused(&ctx, &host), Ok(false));
        claim_eq!(contract_view_config(&ctx, &host), Ok(config()));
        claim_eq!(
            contract_view_auction(&ctx, &host).map(|auction| auction.map(|a| a.lot_id)),
            Ok(Some(TokenIdU32(1)))
        );

        let bytes = to_bytes(&Address::Account(BIDDER_1));
        let ctx = receive_ctx(Address::Account(BIDDER_1), START, &bytes);
        claim_eq!(contract_view_credit(&ctx, &host), Ok(Amount::zero()));
    }
}
