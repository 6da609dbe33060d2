//! Types shared by the Sequitur auction house and the Sequitur token contracts.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{authority::*, constants::*, errors::*, types::*};
use concordium_cis2::*;
use concordium_std::*;

mod authority;
mod constants;
mod errors;
mod types;
