//! Continuous English auction for the Sequitur collectible series.
//!
//! Exactly one lot is open at a time. When a lot is settled the next one is
//! minted and put up for auction in the same transaction, until the supply
//! cap of the token contract is reached.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod payout;
mod registry;
mod state;
