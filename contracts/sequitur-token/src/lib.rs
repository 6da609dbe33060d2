//! Capped, sequentially minted CIS-2 collection auctioned by the Sequitur auction house.
//!
//! Every tenth id goes to the founders account as a reward. All other ids are
//! minted to the single configured minter.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod external;
mod state;
