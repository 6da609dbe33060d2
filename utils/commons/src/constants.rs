// Tags `u8::MAX` down to `u8::MAX - 4` are reserved for CIS-2 events.

/// Tag for the AuctionCreated event.
pub const AUCTION_CREATED_TAG: u8 = u8::MAX - 5;

/// Tag for the AuctionBid event.
pub const AUCTION_BID_TAG: u8 = u8::MAX - 6;

/// Tag for the AuctionExtended event.
pub const AUCTION_EXTENDED_TAG: u8 = u8::MAX - 7;

/// Tag for the AuctionSettled event.
pub const AUCTION_SETTLED_TAG: u8 = u8::MAX - 8;

/// Tag for the PaymentCredited event.
pub const PAYMENT_CREDITED_TAG: u8 = u8::MAX - 9;

/// Tag for the LotEscrowed event.
pub const LOT_ESCROWED_TAG: u8 = u8::MAX - 10;

/// Tag for the CreditClaimed event.
pub const CREDIT_CLAIMED_TAG: u8 = u8::MAX - 11;

/// Tag for the Paused event.
pub const PAUSED_TAG: u8 = u8::MAX - 12;

/// Tag for the Unpaused event.
pub const UNPAUSED_TAG: u8 = u8::MAX - 13;

pub const MINT_ENTRYPOINT: &str = "mint";
pub const BURN_ENTRYPOINT: &str = "burn";
pub const TRANSFER_ENTRYPOINT: &str = "transfer";
pub const OWNER_OF_ENTRYPOINT: &str = "ownerOf";
pub const WRAP_ENTRYPOINT: &str = "wrap";
