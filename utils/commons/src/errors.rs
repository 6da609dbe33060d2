use super::*;

/// The custom errors the contracts can produce.
///
/// Error codes are assigned in declaration order and are matched on by callers
/// of the token contract, so new variants go at the end.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Failed to invoke a contract (Error code: -4).
    InvokeContractError,
    /// Failed to invoke a transfer (Error code: -5).
    InvokeTransferError,
    /// Invoked contract does not speak the expected interface (Error code: -6).
    Incompatible,
    /// Sender lacks the required authority (Error code: -7).
    Unauthorized,
    /// Init parameters are out of range (Error code: -8).
    InvalidConfig,
    /// Bid names a lot that is not up for auction (Error code: -9).
    WrongLot,
    /// Bid arrived at or after the auction end time (Error code: -10).
    AuctionExpired,
    /// Bid is under the reserve price or the minimum increment (Error code: -11).
    BidTooLow,
    /// Settlement attempted before the auction end time (Error code: -12).
    AuctionNotYetEnded,
    /// The current lot was already settled (Error code: -13).
    AlreadySettled,
    /// No more lots can be minted (Error code: -14).
    SupplyExhausted,
    /// An unsettled lot is still open (Error code: -15).
    AuctionInProgress,
    /// Lot creation is paused (Error code: -16).
    Paused,
    /// No lot has been put up for auction yet (Error code: -17).
    NoAuction,
    /// Sender has no credit or escrowed lot to claim (Error code: -18).
    NothingToClaim,
    /// Unknown token (Error code: -19).
    UnknownToken,
    /// Arithmetic overflow (Error code: -20).
    Overflow,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(_cce: CallContractError<T>) -> Self {
        Self::InvokeContractError
    }
}

/// Mapping errors related to transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}

/// Mapping CustomContractError to ContractError
impl From<CustomContractError> for ContractError {
    fn from(c: CustomContractError) -> Self {
        Cis2Error::Custom(c)
    }
}
