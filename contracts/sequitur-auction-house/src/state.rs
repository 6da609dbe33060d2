use commons::{Authority, ContractTokenId, CustomContractError};
use concordium_std::*;

use crate::external::{EngineConfig, InitParams};

/// The lot currently (or most recently) up for auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct Auction {
    pub lot_id: ContractTokenId,
    /// Highest bid so far, zero until the first bid lands.
    pub amount: Amount,
    pub bidder: Option<Address>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub settled: bool,
}

impl Auction {
    /// An auction is over once the slot time reaches its end time.
    pub fn has_ended(&self, slot_time: Timestamp) -> bool {
        slot_time >= self.end_time
    }

    /// Check `amount` against the reserve price or the increment over the current bid.
    fn accepts(&self, amount: Amount, config: &EngineConfig) -> bool {
        if self.bidder.is_none() {
            return amount >= config.reserve_price && amount > Amount::zero();
        }
        let current = u128::from(self.amount.micro_ccd);
        let percentage = u128::from(config.min_bid_increment_percentage);
        let increment = (current * percentage + 99) / 100;
        let offered = u128::from(amount.micro_ccd);
        offered > current && offered >= current + increment
    }
}

/// Value owed to an address that has to leave the contract.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    pub recipient: Address,
    pub amount: Amount,
}

/// Outcome of an accepted bid.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct BidOutcome {
    /// The outbid bid that MUST be refunded.
    pub refund: Option<Payment>,
    pub end_time: Timestamp,
    pub extended: bool,
}

/// Outcome of settling the open lot.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum Settlement {
    /// The lot goes to the winner and the winning bid to the proceeds recipient.
    Sold {
        lot_id: ContractTokenId,
        winner: Address,
        amount: Amount,
    },
    /// Nobody bid, the lot has to be burned.
    Unsold { lot_id: ContractTokenId },
}

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Authority module for administrative rights management.
    pub authority: Authority<S>,
    pub config: EngineConfig,
    /// Token contract minting the lots.
    pub token: ContractAddress,
    /// wCCD contract receiving value that could not be pushed directly.
    pub wccd: ContractAddress,
    /// Lot creation is halted. Bidding and settlement are unaffected.
    pub paused: bool,
    pub auction: Option<Auction>,
    /// Value owed to addresses whose direct payment failed, withdrawn with `claimCredit`.
    pub credits: StateMap<Address, Amount, S>,
    /// Lots whose transfer to the winner failed, withdrawn with `claimLot`.
    pub escrow: StateMap<ContractTokenId, Address, S>,
}

impl<S: HasStateApi> State<S> {
    /// Create a paused engine with no lot.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        params: InitParams,
        origin: AccountAddress,
    ) -> Self {
        State {
            authority: Authority::new(state_builder, Address::Account(origin)),
            config: params.config,
            token: params.token,
            wccd: params.wccd,
            paused: true,
            auction: None,
            credits: state_builder.new_map(),
            escrow: state_builder.new_map(),
        }
    }

    /// A lot is open from its creation until it is settled, even past its end time.
    pub fn has_open_lot(&self) -> bool {
        self.auction
            .as_ref()
            .map(|auction| !auction.settled)
            .unwrap_or(false)
    }

    pub fn ensure_can_create(&self) -> Result<(), CustomContractError> {
        ensure!(!self.paused, CustomContractError::Paused);
        ensure!(
            !self.has_open_lot(),
            CustomContractError::AuctionInProgress
        );
        Ok(())
    }

    /// Put a freshly minted lot up for auction, replacing the settled one.
    pub fn start_auction(
        &mut self,
        lot_id: ContractTokenId,
        slot_time: Timestamp,
    ) -> Result<Auction, CustomContractError> {
        self.ensure_can_create()?;
        let end_time = slot_time
            .checked_add(self.config.duration)
            .ok_or(CustomContractError::Overflow)?;
        let auction = Auction {
            lot_id,
            amount: Amount::zero(),
            bidder: None,
            start_time: slot_time,
            end_time,
            settled: false,
        };
        self.auction = Some(auction.clone());
        Ok(auction)
    }

    pub fn bid(
        &mut self,
        lot_id: ContractTokenId,
        bidder: Address,
        amount: Amount,
        slot_time: Timestamp,
    ) -> Result<BidOutcome, CustomContractError> {
        let config = &self.config;
        let auction = self
            .auction
            .as_mut()
            .filter(|auction| auction.lot_id == lot_id)
            .ok_or(CustomContractError::WrongLot)?;

        ensure!(
            !auction.settled && !auction.has_ended(slot_time),
            CustomContractError::AuctionExpired
        );
        ensure!(
            auction.accepts(amount, config),
            CustomContractError::BidTooLow
        );

        let refund = auction.bidder.replace(bidder).map(|recipient| Payment {
            recipient,
            amount: auction.amount,
        });
        auction.amount = amount;

        // Late bids push the end out so every bidder gets a full buffer to respond
        let remaining = auction.end_time.timestamp_millis() - slot_time.timestamp_millis();
        let extended = remaining < config.time_buffer.millis();
        if extended {
            auction.end_time = slot_time
                .checked_add(config.time_buffer)
                .ok_or(CustomContractError::Overflow)?;
        }

        // Return the previous bid that MUST be refunded
        Ok(BidOutcome {
            refund,
            end_time: auction.end_time,
            extended,
        })
    }

    pub fn settle(&mut self, slot_time: Timestamp) -> Result<Settlement, CustomContractError> {
        let auction = self
            .auction
            .as_mut()
            .ok_or(CustomContractError::NoAuction)?;

        ensure!(!auction.settled, CustomContractError::AlreadySettled);
        ensure!(
            auction.has_ended(slot_time),
            CustomContractError::AuctionNotYetEnded
        );

        auction.settled = true;
        let settlement = match auction.bidder {
            Some(winner) => Settlement::Sold {
                lot_id: auction.lot_id,
                winner,
                amount: auction.amount,
            },
            None => Settlement::Unsold {
                lot_id: auction.lot_id,
            },
        };
        Ok(settlement)
    }

    /// Record value owed to `recipient`.
    pub fn credit(&mut self, recipient: Address, amount: Amount) -> Result<(), CustomContractError> {
        let owed = self
            .credits
            .get(&recipient)
            .map(|owed| *owed)
            .unwrap_or_else(Amount::zero);
        let total = owed
            .micro_ccd
            .checked_add(amount.micro_ccd)
            .ok_or(CustomContractError::Overflow)?;
        self.credits
            .insert(recipient, Amount::from_micro_ccd(total));
        Ok(())
    }

    pub fn credit_of(&self, owner: &Address) -> Amount {
        self.credits
            .get(owner)
            .map(|owed| *owed)
            .unwrap_or_else(Amount::zero)
    }

    /// Remove and return everything owed to `owner`.
    pub fn take_credit(&mut self, owner: &Address) -> Result<Amount, CustomContractError> {
        self.credits
            .remove_and_get(owner)
            .filter(|owed| *owed > Amount::zero())
            .ok_or(CustomContractError::NothingToClaim)
    }

    pub fn escrow_lot(&mut self, lot_id: ContractTokenId, winner: Address) {
        self.escrow.insert(lot_id, winner);
    }

    /// Release an escrowed lot to its winner.
    pub fn release_lot(
        &mut self,
        lot_id: &ContractTokenId,
        claimant: &Address,
    ) -> Result<(), CustomContractError> {
        let winner = self
            .escrow
            .get(lot_id)
            .map(|winner| *winner)
            .ok_or(CustomContractError::NothingToClaim)?;
        ensure_eq!(&winner, claimant, CustomContractError::Unauthorized);
        self.escrow.remove(lot_id);
        Ok(())
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_cis2::TokenIdU32;
    use concordium_std::test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const TREASURY: AccountAddress = AccountAddress([2; 32]);
    const BIDDER_1: AccountAddress = AccountAddress([16; 32]);
    const BIDDER_2: AccountAddress = AccountAddress([17; 32]);
    const TOKEN: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const WCCD: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };

    const START: u64 = 1_000_000;
    const DAY: u64 = 86_400_000;
    const BUFFER: u64 = 900_000;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn params() -> InitParams {
        InitParams {
            token: TOKEN,
            wccd: WCCD,
            config: EngineConfig {
                time_buffer: Duration::from_millis(BUFFER),
                reserve_price: Amount::from_micro_ccd(2),
                min_bid_increment_percentage: 5,
                duration: Duration::from_millis(DAY),
                proceeds_recipient: Address::Account(TREASURY),
            },
        }
    }

    /// State with lot 1 open since `START`.
    fn open_state() -> State<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(&mut state_builder, params(), ADMIN);
        state.paused = false;
        state
            .start_auction(TokenIdU32(1), at(START))
            .expect_report("Lot should open");
        state
    }

    #[concordium_test]
    fn test_new_state_is_paused() {
        let mut state_builder = TestStateBuilder::new();
        let state = State::new(&mut state_builder, params(), ADMIN);

        claim!(state.paused);
        claim!(!state.has_open_lot());
        claim_eq!(
            state.ensure_can_create(),
            Err(CustomContractError::Paused)
        );
        claim!(state.authority.has_admin_rights(&Address::Account(ADMIN)));
    }

    #[concordium_test]
    fn test_start_auction_spans_duration() {
        let state = open_state();
        let auction = state.auction.as_ref().expect_report("Auction expected");

        claim_eq!(auction.start_time, at(START));
        claim_eq!(auction.end_time, at(START + DAY));
        claim_eq!(auction.amount, Amount::zero());
        claim_eq!(auction.bidder, None);
        claim_eq!(
            state.ensure_can_create(),
            Err(CustomContractError::AuctionInProgress)
        );
    }

    #[concordium_test]
    fn test_bid_below_reserve() {
        let mut state = open_state();

        let result = state.bid(
            TokenIdU32(1),
            Address::Account(BIDDER_1),
            Amount::from_micro_ccd(1),
            at(START + 1),
        );
        claim_eq!(result, Err(CustomContractError::BidTooLow));

        let outcome = state
            .bid(
                TokenIdU32(1),
                Address::Account(BIDDER_1),
                Amount::from_micro_ccd(2),
                at(START + 1),
            )
            .expect_report("Reserve price bid should be accepted");
        claim_eq!(outcome.refund, None);
        claim!(!outcome.extended);
    }

    #[concordium_test]
    fn test_bid_increment_rounds_up() {
        let mut state = open_state();
        let _ = state.bid(
            TokenIdU32(1),
            Address::Account(BIDDER_1),
            Amount::from_micro_ccd(100),
            at(START + 1),
        );

        // 5% of 100 is 5, so 104 is short
        let result = state.bid(
            TokenIdU32(1),
            Address::Account(BIDDER_2),
            Amount::from_micro_ccd(104),
            at(START + 2),
        );
        claim_eq!(result, Err(CustomContractError::BidTooLow));

        let outcome = state
            .bid(
                TokenIdU32(1),
                Address::Account(BIDDER_2),
                Amount::from_micro_ccd(105),
                at(START + 2),
            )
            .expect_report("Bid at the increment should be accepted");
        claim_eq!(
            outcome.refund,
            Some(Payment {
                recipient: Address::Account(BIDDER_1),
                amount: Amount::from_micro_ccd(100),
            })
        );

        // 5% of 105 is 5.25, rounded up to 6
        let result = state.bid(
            TokenIdU32(1),
            Address::Account(BIDDER_1),
            Amount::from_micro_ccd(110),
            at(START + 3),
        );
        claim_eq!(result, Err(CustomContractError::BidTooLow));
        claim!(state
            .bid(
                TokenIdU32(1),
                Address::Account(BIDDER_1),
                Amount::from_micro_ccd(111),
                at(START + 3),
            )
            .is_ok());
    }

    #[concordium_test]
    fn test_bid_increment_on_tiny_amounts() {
        let mut state = open_state();
        let _ = state.bid(
            TokenIdU32(1),
            Address::Account(BIDDER_1),
            Amount::from_micro_ccd(2),
            at(START + 1),
        );

        // Equal bids never displace the current bidder
        let result = state.bid(
            TokenIdU32(1),
            Address::Account(BIDDER_2),
            Amount::from_micro_ccd(2),
            at(START + 2),
        );
        claim_eq!(result, Err(CustomContractError::BidTooLow));
        claim!(state
            .bid(
                TokenIdU32(1),
                Address::Account(BIDDER_2),
                Amount::from_micro_ccd(3),
                at(START + 2),
            )
            .is_ok());
    }

    #[concordium_test]
    fn test_bid_wrong_lot() {
        let mut state = open_state();

        let result = state.bid(
            TokenIdU32(2),
            Address::Account(BIDDER_1),
            Amount::from_micro_ccd(10),
            at(START + 1),
        );
        claim_eq!(result, Err(CustomContractError::WrongLot));

        let mut state_builder = TestStateBuilder::new();
        let mut empty = State::new(&mut state_builder, params(), ADMIN);
        let result = empty.bid(
            TokenIdU32(0),
            Address::Account(BIDDER_1),
            Amount::from_micro_ccd(10),
            at(START + 1),
        );
        claim_eq!(result, Err(CustomContractError::WrongLot));
    }

    #[concordium_test]
    fn test_bid_at_end_time_expired() {
        let mut state = open_state();

        let result = state.bid(
            TokenIdU32(1),
            Address::Account(BIDDER_1),
            Amount::from_micro_ccd(10),
            at(START + DAY),
        );
        claim_eq!(result, Err(CustomContractError::AuctionExpired));

        claim!(state
            .bid(
                TokenIdU32(1),
                Address::Account(BIDDER_1),
                Amount::from_micro_ccd(10),
                at(START + DAY - 1),
            )
            .is_ok());
    }

    #[concordium_test]
    fn test_late_bid_extends() {
        let mut state = open_state();
        let slot_time = START + DAY - BUFFER + 1;

        let outcome = state
            .bid(
                TokenIdU32(1),
                Address::Account(BIDDER_1),
                Amount::from_micro_ccd(10),
                at(slot_time),
            )
            .expect_report("Late bid should be accepted");
        claim!(outcome.extended);
        claim_eq!(outcome.end_time, at(slot_time + BUFFER));
        claim_eq!(
            state.auction.as_ref().map(|auction| auction.end_time),
            Some(at(slot_time + BUFFER))
        );
    }

    #[concordium_test]
    fn test_bid_exactly_one_buffer_out_does_not_extend() {
        let mut state = open_state();

        let outcome = state
            .bid(
                TokenIdU32(1),
                Address::Account(BIDDER_1),
                Amount::from_micro_ccd(10),
                at(START + DAY - BUFFER),
            )
            .expect_report("Bid should be accepted");
        claim!(!outcome.extended);
        claim_eq!(outcome.end_time, at(START + DAY));
    }

    #[concordium_test]
    fn test_settle_before_end() {
        let mut state = open_state();

        claim_eq!(
            state.settle(at(START + DAY - 1)),
            Err(CustomContractError::AuctionNotYetEnded)
        );
        claim!(state.has_open_lot());
    }

    #[concordium_test]
    fn test_settle_sold_then_again() {
        let mut state = open_state();
        let _ = state.bid(
            TokenIdU32(1),
            Address::Account(BIDDER_1),
            Amount::from_micro_ccd(10),
            at(START + 1),
        );

        claim_eq!(
            state.settle(at(START + DAY)),
            Ok(Settlement::Sold {
                lot_id: TokenIdU32(1),
                winner: Address::Account(BIDDER_1),
                amount: Amount::from_micro_ccd(10),
            })
        );
        claim!(!state.has_open_lot());
        claim_eq!(
            state.settle(at(START + DAY + 1)),
            Err(CustomContractError::AlreadySettled)
        );

        // A settled lot takes no more bids
        claim_eq!(
            state.bid(
                TokenIdU32(1),
                Address::Account(BIDDER_2),
                Amount::from_micro_ccd(100),
                at(START + DAY + 1),
            ),
            Err(CustomContractError::AuctionExpired)
        );
    }

    #[concordium_test]
    fn test_settle_unsold_and_without_auction() {
        let mut state = open_state();
        claim_eq!(
            state.settle(at(START + DAY)),
            Ok(Settlement::Unsold {
                lot_id: TokenIdU32(1)
            })
        );

        let mut state_builder = TestStateBuilder::new();
        let mut empty = State::new(&mut state_builder, params(), ADMIN);
        claim_eq!(
            empty.settle(at(START)),
            Err(CustomContractError::NoAuction)
        );
    }

    #[concordium_test]
    fn test_credits_accumulate_and_drain() {
        let mut state = open_state();
        let owner = Address::Account(BIDDER_1);

        claim_eq!(
            state.take_credit(&owner),
            Err(CustomContractError::NothingToClaim)
        );
        claim_eq!(state.credit(owner, Amount::from_micro_ccd(7)), Ok(()));
        claim_eq!(state.credit(owner, Amount::from_micro_ccd(5)), Ok(()));
        claim_eq!(state.credit_of(&owner), Amount::from_micro_ccd(12));
        claim_eq!(state.take_credit(&owner), Ok(Amount::from_micro_ccd(12)));
        claim_eq!(state.credit_of(&owner), Amount::zero());
    }

    #[concordium_test]
    fn test_release_lot_only_to_winner() {
        let mut state = open_state();
        state.escrow_lot(TokenIdU32(1), Address::Account(BIDDER_1));

        claim_eq!(
            state.release_lot(&TokenIdU32(1), &Address::Account(BIDDER_2)),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            state.release_lot(&TokenIdU32(1), &Address::Account(BIDDER_1)),
            Ok(())
        );
        claim_eq!(
            state.release_lot(&TokenIdU32(1), &Address::Account(BIDDER_1)),
            Err(CustomContractError::NothingToClaim)
        );
    }
}
