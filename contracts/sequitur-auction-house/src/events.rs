use commons::{
    ContractTokenId, AUCTION_BID_TAG, AUCTION_CREATED_TAG, AUCTION_EXTENDED_TAG,
    AUCTION_SETTLED_TAG, CREDIT_CLAIMED_TAG, LOT_ESCROWED_TAG, PAUSED_TAG, PAYMENT_CREDITED_TAG,
    UNPAUSED_TAG,
};
use concordium_std::*;

/// A new lot went up for auction.
#[derive(Debug, Serialize, SchemaType)]
pub struct AuctionCreatedEvent {
    pub lot_id: ContractTokenId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// A bid was accepted.
#[derive(Debug, Serialize, SchemaType)]
pub struct AuctionBidEvent {
    pub lot_id: ContractTokenId,
    pub sender: Address,
    pub value: Amount,
    /// The bid moved the end time.
    pub extended: bool,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct AuctionExtendedEvent {
    pub lot_id: ContractTokenId,
    pub end_time: Timestamp,
}

/// A lot was settled. Unsold lots carry no winner and a zero amount.
#[derive(Debug, Serialize, SchemaType)]
pub struct AuctionSettledEvent {
    pub lot_id: ContractTokenId,
    pub winner: Option<Address>,
    pub amount: Amount,
}

/// Where value that could not be pushed directly ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub enum CreditKind {
    /// Wrapped into wCCD owned by the recipient.
    Wrapped,
    /// Recorded in the internal ledger, withdrawn with `claimCredit`.
    Ledger,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct PaymentCreditedEvent {
    pub recipient: Address,
    pub amount: Amount,
    pub kind: CreditKind,
}

/// The winner could not receive the lot, so the contract holds it for them.
#[derive(Debug, Serialize, SchemaType)]
pub struct LotEscrowedEvent {
    pub lot_id: ContractTokenId,
    pub winner: Address,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct CreditClaimedEvent {
    pub owner: Address,
    pub amount: Amount,
}

/// Lot creation was halted or resumed by `account`.
#[derive(Debug, Serialize, SchemaType)]
pub struct PauseEvent {
    pub account: Address,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvent {
    Created(AuctionCreatedEvent),
    Bid(AuctionBidEvent),
    Extended(AuctionExtendedEvent),
    Settled(AuctionSettledEvent),
    PaymentCredited(PaymentCreditedEvent),
    LotEscrowed(LotEscrowedEvent),
    CreditClaimed(CreditClaimedEvent),
    Paused(PauseEvent),
    Unpaused(PauseEvent),
}

impl AuctionEvent {
    pub fn created(lot_id: ContractTokenId, start_time: Timestamp, end_time: Timestamp) -> Self {
        Self::Created(AuctionCreatedEvent {
            lot_id,
            start_time,
            end_time,
        })
    }

    pub fn bid(lot_id: ContractTokenId, sender: Address, value: Amount, extended: bool) -> Self {
        Self::Bid(AuctionBidEvent {
            lot_id,
            sender,
            value,
            extended,
        })
    }

    pub fn extended(lot_id: ContractTokenId, end_time: Timestamp) -> Self {
        Self::Extended(AuctionExtendedEvent { lot_id, end_time })
    }

    pub fn settled(lot_id: ContractTokenId, winner: Option<Address>, amount: Amount) -> Self {
        Self::Settled(AuctionSettledEvent {
            lot_id,
            winner,
            amount,
        })
    }

    pub fn payment_credited(recipient: Address, amount: Amount, kind: CreditKind) -> Self {
        Self::PaymentCredited(PaymentCreditedEvent {
            recipient,
            amount,
            kind,
        })
    }

    pub fn lot_escrowed(lot_id: ContractTokenId, winner: Address) -> Self {
        Self::LotEscrowed(LotEscrowedEvent { lot_id, winner })
    }

    pub fn credit_claimed(owner: Address, amount: Amount) -> Self {
        Self::CreditClaimed(CreditClaimedEvent { owner, amount })
    }

    pub fn paused(account: Address) -> Self {
        Self::Paused(PauseEvent { account })
    }

    pub fn unpaused(account: Address) -> Self {
        Self::Unpaused(PauseEvent { account })
    }
}

impl Serial for AuctionEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvent::Created(event) => {
                out.write_u8(AUCTION_CREATED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Bid(event) => {
                out.write_u8(AUCTION_BID_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Extended(event) => {
                out.write_u8(AUCTION_EXTENDED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Settled(event) => {
                out.write_u8(AUCTION_SETTLED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::PaymentCredited(event) => {
                out.write_u8(PAYMENT_CREDITED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::LotEscrowed(event) => {
                out.write_u8(LOT_ESCROWED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::CreditClaimed(event) => {
                out.write_u8(CREDIT_CLAIMED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Paused(event) => {
                out.write_u8(PAUSED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Unpaused(event) => {
                out.write_u8(UNPAUSED_TAG)?;
                event.serial(out)
            }
        }
    }
}
