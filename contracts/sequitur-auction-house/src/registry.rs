//! Client for the token contract that mints, moves and burns lots.
use commons::{
    ContractTokenId, CustomContractError, TransferParameter, BURN_ENTRYPOINT, MINT_ENTRYPOINT,
    OWNER_OF_ENTRYPOINT, TRANSFER_ENTRYPOINT,
};
use concordium_cis2::{AdditionalData, Receiver, TokenAmountU8, Transfer, TransferParams};
use concordium_std::*;

/// Reject code of `CustomContractError::SupplyExhausted`.
const SUPPLY_EXHAUSTED_CODE: i32 = -14;
/// Reject code of `Cis2Error::Unauthorized`.
const CIS2_UNAUTHORIZED_CODE: i32 = -42000003;

/// Mint the next lot to the calling contract and return its id.
pub fn mint_next<T>(
    host: &mut impl HasHost<T>,
    token: &ContractAddress,
) -> Result<ContractTokenId, CustomContractError> {
    let (_, response) = host
        .invoke_contract(
            token,
            &(),
            EntrypointName::new_unchecked(MINT_ENTRYPOINT),
            Amount::zero(),
        )
        .map_err(handle_call_error)?;
    let mut response = response.ok_or(CustomContractError::Incompatible)?;

    // `None` means the founders reward took the last unit of supply
    <Option<ContractTokenId>>::deserial(&mut response)
        .map_err(|_| CustomContractError::Incompatible)?
        .ok_or(CustomContractError::SupplyExhausted)
}

pub fn transfer<T>(
    host: &mut impl HasHost<T>,
    token: &ContractAddress,
    lot_id: ContractTokenId,
    from: Address,
    to: Receiver,
) -> Result<(), CustomContractError> {
    let mut transfers = Vec::with_capacity(1);
    transfers.push(Transfer {
        token_id: lot_id,
        amount: TokenAmountU8(1),
        from,
        to,
        data: AdditionalData::empty(),
    });
    let params: TransferParameter = TransferParams(transfers);

    host.invoke_contract(
        token,
        &params,
        EntrypointName::new_unchecked(TRANSFER_ENTRYPOINT),
        Amount::zero(),
    )
    .map_err(handle_call_error)?;

    Ok(())
}

pub fn burn<T>(
    host: &mut impl HasHost<T>,
    token: &ContractAddress,
    lot_id: ContractTokenId,
) -> Result<(), CustomContractError> {
    host.invoke_contract(
        token,
        &lot_id,
        EntrypointName::new_unchecked(BURN_ENTRYPOINT),
        Amount::zero(),
    )
    .map_err(handle_call_error)?;

    Ok(())
}

pub fn exists<T>(
    host: &impl HasHost<T>,
    token: &ContractAddress,
    lot_id: &ContractTokenId,
) -> Result<bool, CustomContractError> {
    let mut response = host
        .invoke_contract_read_only(
            token,
            lot_id,
            EntrypointName::new_unchecked(OWNER_OF_ENTRYPOINT),
            Amount::zero(),
        )
        .map_err(handle_call_error)?
        .ok_or(CustomContractError::Incompatible)?;

    let owner = <Option<Address>>::deserial(&mut response)
        .map_err(|_| CustomContractError::Incompatible)?;
    Ok(owner.is_some())
}

fn handle_call_error<R>(error: CallContractError<R>) -> CustomContractError {
    match error {
        CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
            CustomContractError::Incompatible
        }
        CallContractError::LogicReject { reason, .. } => match reason {
            SUPPLY_EXHAUSTED_CODE => CustomContractError::SupplyExhausted,
            // The auction house is not the token minter
            CIS2_UNAUTHORIZED_CODE => CustomContractError::Unauthorized,
            // Parameter not understood
            -1 => CustomContractError::Incompatible,
            _ => CustomContractError::InvokeContractError,
        },
        e => e.into(),
    }
}

#[concordium_cfg_test]
mod tests {
    use concordium_cis2::TokenIdU32;
    use concordium_std::test_infrastructure::*;

    use super::*;

    const TOKEN: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const AUCTION_HOUSE: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };
    const WINNER: AccountAddress = AccountAddress([16; 32]);

    fn unit_host() -> TestHost<()> {
        TestHost::new((), TestStateBuilder::default())
    }

    #[concordium_test]
    fn test_mint_next() {
        let mut host = unit_host();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("mint".into()),
            MockFn::new_v1(|_, _, _, _| Ok((true, Some(TokenIdU32(3))))),
        );

        claim_eq!(mint_next(&mut host, &TOKEN), Ok(TokenIdU32(3)));
    }

    #[concordium_test]
    fn test_mint_next_when_reward_took_last_unit() {
        let mut host = unit_host();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("mint".into()),
            MockFn::new_v1(|_, _, _, _| Ok((true, None::<TokenIdU32>))),
        );

        claim_eq!(
            mint_next(&mut host, &TOKEN),
            Err(CustomContractError::SupplyExhausted)
        );
    }

    #[concordium_test]
    fn test_mint_next_rejected_by_cap() {
        let mut host = unit_host();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("mint".into()),
            MockFn::new_v1(|_, _, _, _| -> Result<(bool, ()), CallContractError<()>> {
                Err(CallContractError::LogicReject {
                    reason: SUPPLY_EXHAUSTED_CODE,
                    return_value: (),
                })
            }),
        );

        claim_eq!(
            mint_next(&mut host, &TOKEN),
            Err(CustomContractError::SupplyExhausted)
        );
    }

    #[concordium_test]
    fn test_transfer_to_account() {
        let mut host = unit_host();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|param, _, _, _| {
                let TransferParams(transfers) =
                    TransferParameter::deserial(&mut Cursor::new(param.as_ref()))
                        .map_err(|_| CallContractError::Trap)?;
                let accepted = transfers.len() == 1
                    && transfers[0].token_id == TokenIdU32(7)
                    && matches!(transfers[0].to, Receiver::Account(account) if account == WINNER);
                if accepted {
                    Ok((true, ()))
                } else {
                    Err(CallContractError::Trap)
                }
            }),
        );

        let result = transfer(
            &mut host,
            &TOKEN,
            TokenIdU32(7),
            Address::Contract(AUCTION_HOUSE),
            Receiver::Account(WINNER),
        );
        claim_eq!(result, Ok(()));
    }

    #[concordium_test]
    fn test_transfer_missing_entrypoint_is_incompatible() {
        let mut host = unit_host();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|_, _, _, _| -> Result<(bool, ()), CallContractError<()>> {
                Err(CallContractError::MissingEntrypoint)
            }),
        );

        let result = transfer(
            &mut host,
            &TOKEN,
            TokenIdU32(7),
            Address::Contract(AUCTION_HOUSE),
            Receiver::Account(WINNER),
        );
        claim_eq!(result, Err(CustomContractError::Incompatible));
    }

    #[concordium_test]
    fn test_exists() {
        let mut host = unit_host();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("ownerOf".into()),
            MockFn::new_v1(|param, _, _, _| {
                let token_id = TokenIdU32::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                let owner = if token_id == TokenIdU32(1) {
                    Some(Address::Account(WINNER))
                } else {
                    None
                };
                Ok((false, owner))
            }),
        );

        claim_eq!(exists(&host, &TOKEN, &TokenIdU32(1)), Ok(true));
        claim_eq!(exists(&host, &TOKEN, &TokenIdU32(2)), Ok(false));
    }

    #[concordium_test]
    fn test_mint_next_when_not_minter() {
        let mut host = unit_host();
        host.setup_mock_entrypoint(
            TOKEN,
            OwnedEntrypointName::new_unchecked("mint".into()),
            MockFn::new_v1(|_, _, _, _| -> Result<(bool, ()), CallContractError<()>> {
                Err(CallContractError::LogicReject {
                    reason: CIS2_UNAUTHORIZED_CODE,
                    return_value: (),
                })
            }),
        );

        claim_eq!(
            mint_next(&mut host, &TOKEN),
            Err(CustomContractError::Unauthorized)
        );
    }
}
