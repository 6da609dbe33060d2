use commons::{ContractTokenId, CustomContractError};
use concordium_cis2::{AdditionalData, Receiver};
use concordium_std::*;

/// Engine parameters fixed at initialization.
#[derive(Debug, Clone, PartialEq, Eq, SchemaType, Serialize)]
pub struct EngineConfig {
    /// A bid landing closer than this to the end pushes the end out to `now + time_buffer`.
    pub time_buffer: Duration,
    /// Smallest acceptable first bid.
    pub reserve_price: Amount,
    /// Every bid after the first must exceed the current one by this share, rounded up.
    pub min_bid_increment_percentage: u8,
    /// Length of a freshly created auction.
    pub duration: Duration,
    /// Receives the proceeds of every sold lot.
    pub proceeds_recipient: Address,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), CustomContractError> {
        ensure!(
            self.duration.millis() > 0,
            CustomContractError::InvalidConfig
        );
        ensure!(
            self.time_buffer.millis() > 0,
            CustomContractError::InvalidConfig
        );
        ensure!(
            self.min_bid_increment_percentage <= 100,
            CustomContractError::InvalidConfig
        );
        Ok(())
    }
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct InitParams {
    /// Token contract minting the lots. The auction house must be its minter.
    pub token: ContractAddress,
    /// wCCD contract used to hand out value that could not be pushed directly.
    pub wccd: ContractAddress,
    pub config: EngineConfig,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct ClaimCreditParams {
    /// Destination of the withdrawn credit.
    pub to: Receiver,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct ClaimLotParams {
    pub lot_id: ContractTokenId,
    /// Destination of the escrowed lot.
    pub to: Receiver,
}

/// Parameter of the wCCD `wrap` entrypoint.
#[derive(Debug, Serialize)]
pub struct WrapParams {
    pub to: Receiver,
    pub data: AdditionalData,
}
