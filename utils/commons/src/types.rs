use super::*;

/// Lots are numbered sequentially from zero and never exceed `u32`.
pub type ContractTokenId = TokenIdU32;

/// Every collectible is unique, so an amount is either 0 or 1.
pub type ContractTokenAmount = TokenAmountU8;

/// Wrapping the custom errors in a type with CIS2 errors.
pub type ContractError = Cis2Error<CustomContractError>;

pub type ContractResult<A> = Result<A, ContractError>;

pub type TransferParameter = TransferParams<ContractTokenId, ContractTokenAmount>;

pub type ContractBalanceOfQueryParams = BalanceOfQueryParams<ContractTokenId>;

pub type ContractBalanceOfQueryResponse = BalanceOfQueryResponse<ContractTokenAmount>;
