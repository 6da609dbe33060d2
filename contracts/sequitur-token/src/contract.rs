use commons::{
    AuthorityUpdateParams, AuthorityViewParams, ContractBalanceOfQueryParams,
    ContractBalanceOfQueryResponse, ContractError, ContractResult, ContractTokenAmount,
    ContractTokenId, TransferParameter,
};
use concordium_cis2::*;
use concordium_std::*;

use crate::external::InitParams;
use crate::state::State;

const CONTRACT_URI_PREFIX: &str = "ipfs://";
const TOKEN_NAME: &str = "Nouns Sequitur";
const TOKEN_SYMBOL: &str = "NOUNSSEQUITUR";

const SUPPORTS_STANDARDS: [StandardIdentifier<'static>; 2] =
    [CIS0_STANDARD_IDENTIFIER, CIS2_STANDARD_IDENTIFIER];

#[init(contract = "SequiturToken", parameter = "InitParams")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(State::new(state_builder, params, ctx.init_origin()))
}

/// Mint the next token to the minter and return its id.
///
/// Returns `None` when the founders reward consumed the final id.
#[receive(
    contract = "SequiturToken",
    name = "mint",
    return_value = "Option<ContractTokenId>",
    enable_logger,
    mutable
)]
fn mint<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<Option<ContractTokenId>> {
    let minter = ctx.sender();
    ensure!(
        host.state().is_minter(&minter),
        ContractError::Unauthorized
    );

    let founders = Address::Account(host.state().founders);
    let minted = host.state_mut().mint(minter)?;

    if let Some(token_id) = minted.reward {
        logger.log(&Cis2Event::Mint(MintEvent {
            token_id,
            amount: TokenAmountU8(1),
            owner: founders,
        }))?;
    }
    if let Some(token_id) = minted.lot {
        logger.log(&Cis2Event::Mint(MintEvent {
            token_id,
            amount: TokenAmountU8(1),
            owner: minter,
        }))?;
    }

    Ok(minted.lot)
}

/// Burn a token held by the minter.
#[receive(
    contract = "SequiturToken",
    name = "burn",
    parameter = "ContractTokenId",
    enable_logger,
    mutable
)]
fn burn<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let token_id = ContractTokenId::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    ensure!(
        host.state().is_minter(&sender),
        ContractError::Unauthorized
    );

    host.state_mut().burn(&token_id, &sender)?;

    logger.log(&Cis2Event::Burn(BurnEvent {
        token_id,
        amount: TokenAmountU8(1),
        owner: sender,
    }))?;

    Ok(())
}

#[receive(
    contract = "SequiturToken",
    name = "transfer",
    parameter = "TransferParameter",
    enable_logger,
    mutable
)]
fn transfer<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let TransferParams(transfers) = TransferParameter::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();

    for transfer in transfers {
        ensure!(
            host.state().is_operator(&transfer.from, &sender),
            ContractError::Unauthorized
        );

        let to_address = transfer.to.address();
        host.state_mut().transfer(
            &transfer.token_id,
            transfer.amount,
            &transfer.from,
            &to_address,
        )?;

        logger.log(&Cis2Event::Transfer(TransferEvent {
            token_id: transfer.token_id,
            amount: transfer.amount,
            from: transfer.from,
            to: to_address,
        }))?;

        // If the receiver is a contract, notify it through its hook
        if let Receiver::Contract(address, function) = transfer.to {
            let parameter = OnReceivingCis2Params {
                token_id: transfer.token_id,
                amount: transfer.amount,
                from: transfer.from,
                data: transfer.data,
            };

            host.invoke_contract(
                &address,
                &parameter,
                function.as_entrypoint_name(),
                Amount::zero(),
            )?;
        }
    }

    Ok(())
}

/// Enable or disable operators of the sender and log an `UpdateOperator`
/// event for each update.
#[receive(
    contract = "SequiturToken",
    name = "updateOperator",
    parameter = "UpdateOperatorParams",
    enable_logger,
    mutable
)]
fn update_operator<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let UpdateOperatorParams(params) = UpdateOperatorParams::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    let (state, builder) = host.state_and_builder();

    for param in params {
        match param.update {
            OperatorUpdate::Add => state.add_operator(&sender, &param.operator, builder),
            OperatorUpdate::Remove => state.remove_operator(&sender, &param.operator),
        }

        logger.log(
            &Cis2Event::<ContractTokenId, ContractTokenAmount>::UpdateOperator(
                UpdateOperatorEvent {
                    owner: sender,
                    operator: param.operator,
                    update: param.update,
                },
            ),
        )?;
    }

    Ok(())
}

#[receive(
    contract = "SequiturToken",
    name = "operatorOf",
    parameter = "OperatorOfQueryParams",
    return_value = "OperatorOfQueryResponse"
)]
fn operator_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<OperatorOfQueryResponse> {
    let params = OperatorOfQueryParams::deserial(&mut ctx.parameter_cursor())?;
    let response: Vec<bool> = params
        .queries
        .iter()
        .map(|query| host.state().is_operator(&query.owner, &query.address))
        .collect();
    Ok(OperatorOfQueryResponse::from(response))
}

#[receive(
    contract = "SequiturToken",
    name = "balanceOf",
    parameter = "ContractBalanceOfQueryParams",
    return_value = "ContractBalanceOfQueryResponse"
)]
fn balance_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ContractBalanceOfQueryResponse> {
    let params = ContractBalanceOfQueryParams::deserial(&mut ctx.parameter_cursor())?;

    let mut response: Vec<ContractTokenAmount> = Vec::with_capacity(params.queries.len());
    for query in params.queries {
        response.push(host.state().balance(&query.token_id, &query.address)?);
    }

    Ok(BalanceOfQueryResponse::from(response))
}

#[receive(
    contract = "SequiturToken",
    name = "ownerOf",
    parameter = "ContractTokenId",
    return_value = "Option<Address>"
)]
fn owner_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Option<Address>> {
    let token_id = ContractTokenId::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().owner_of(&token_id))
}

#[receive(contract = "SequiturToken", name = "totalSupply", return_value = "u32")]
fn total_supply<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<u32> {
    Ok(host.state().total_supply())
}

#[receive(contract = "SequiturToken", name = "contractUri", return_value = "String")]
fn contract_uri<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<String> {
    let mut uri = String::from(CONTRACT_URI_PREFIX);
    uri.push_str(&host.state().contract_uri_hash);
    Ok(uri)
}

/// Metadata of each token lives under the contract URI, keyed by token id.
#[receive(
    contract = "SequiturToken",
    name = "tokenMetadata",
    parameter = "TokenMetadataQueryParams<ContractTokenId>",
    return_value = "TokenMetadataQueryResponse"
)]
fn token_metadata<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<TokenMetadataQueryResponse> {
    let params = TokenMetadataQueryParams::<ContractTokenId>::deserial(&mut ctx.parameter_cursor())?;

    let mut response = Vec::with_capacity(params.queries.len());
    for token_id in params.queries {
        ensure!(
            host.state().exists(&token_id),
            ContractError::InvalidTokenId
        );
        let mut url = String::from(CONTRACT_URI_PREFIX);
        url.push_str(&host.state().contract_uri_hash);
        url.push('/');
        url.push_str(&token_id.to_string());
        response.push(MetadataUrl { url, hash: None });
    }

    Ok(TokenMetadataQueryResponse::from(response))
}

#[receive(
    contract = "SequiturToken",
    name = "supports",
    parameter = "SupportsQueryParams",
    return_value = "SupportsQueryResponse"
)]
fn supports<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<SupportsQueryResponse> {
    let params = SupportsQueryParams::deserial(&mut ctx.parameter_cursor())?;

    let mut response = Vec::with_capacity(params.queries.len());
    for std_id in params.queries {
        if SUPPORTS_STANDARDS.contains(&std_id.as_standard_identifier()) {
            response.push(SupportResult::Support);
        } else {
            response.push(SupportResult::NoSupport);
        }
    }

    Ok(SupportsQueryResponse::from(response))
}

#[receive(contract = "SequiturToken", name = "name", return_value = "String")]
fn name<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<String> {
    Ok(String::from(TOKEN_NAME))
}

#[receive(contract = "SequiturToken", name = "symbol", return_value = "String")]
fn symbol<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<String> {
    Ok(String::from(TOKEN_SYMBOL))
}

#[receive(
    contract = "SequiturToken",
    name = "setMinter",
    parameter = "Address",
    mutable
)]
fn set_minter<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    ensure!(
        host.state().authority.has_admin_rights(&ctx.sender()),
        ContractError::Unauthorized
    );
    let minter = Address::deserial(&mut ctx.parameter_cursor())?;
    host.state_mut().minter = Some(minter);
    Ok(())
}

#[receive(
    contract = "SequiturToken",
    name = "setContractUriHash",
    parameter = "String",
    mutable
)]
fn set_contract_uri_hash<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    ensure!(
        host.state().authority.has_admin_rights(&ctx.sender()),
        ContractError::Unauthorized
    );
    let hash = String::deserial(&mut ctx.parameter_cursor())?;
    host.state_mut().contract_uri_hash = hash;
    Ok(())
}

#[receive(
    contract = "SequiturToken",
    name = "updateAuthority",
    parameter = "AuthorityUpdateParams",
    mutable
)]
fn update_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    let params = AuthorityUpdateParams::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    host.state_mut()
        .authority
        .handle_update(sender, params)
        .map_err(ContractError::from)
}

#[receive(
    contract = "SequiturToken",
    name = "viewAuthority",
    parameter = "AuthorityViewParams",
    return_value = "Vec<Address>"
)]
fn view_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<Address>> {
    let params = AuthorityViewParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().authority.handle_view(params))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::CustomContractError;
    use concordium_std::test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const FOUNDERS: AccountAddress = AccountAddress([5; 32]);
    const USER: AccountAddress = AccountAddress([16; 32]);
    const AUCTION_HOUSE: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };
    const COLLECTOR: ContractAddress = ContractAddress {
        index: 20,
        subindex: 0,
    };

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        let bytes = to_bytes(&InitParams {
            founders: FOUNDERS,
            minter: Some(Address::Contract(AUCTION_HOUSE)),
            contract_uri_hash: "QmZi1n79FqWt2tTLwCqiy6nLM6xLGRsEPQ5JmReJQKNNzX".into(),
        });
        ctx.set_init_origin(ADMIN).set_parameter(&bytes);

        let mut state_builder = TestStateBuilder::new();
        let state = init(&ctx, &mut state_builder).expect_report("Failed during init_SequiturToken");
        TestHost::new(state, state_builder)
    }

    fn mint_as(host: &mut TestHost<State<TestStateApi>>, sender: Address) -> ContractResult<Option<ContractTokenId>> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender);
        let mut logger = TestLogger::init();
        mint(&ctx, host, &mut logger)
    }

    #[concordium_test]
    fn test_mint_logs_reward_and_lot() {
        let mut host = default_host();
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(AUCTION_HOUSE));
        let mut logger = TestLogger::init();

        let result = mint(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(Some(TokenIdU32(1))));
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&Cis2Event::Mint(MintEvent {
                    token_id: TokenIdU32(0),
                    amount: TokenAmountU8(1),
                    owner: Address::Account(FOUNDERS),
                })),
                to_bytes(&Cis2Event::Mint(MintEvent {
                    token_id: TokenIdU32(1),
                    amount: TokenAmountU8(1),
                    owner: Address::Contract(AUCTION_HOUSE),
                })),
            ]
        );
    }

    #[concordium_test]
    fn test_mint_only_by_minter() {
        let mut host = default_host();

        claim_eq!(
            mint_as(&mut host, Address::Account(USER)),
            Err(ContractError::Unauthorized)
        );
        claim_eq!(
            mint_as(&mut host, Address::Account(ADMIN)),
            Err(ContractError::Unauthorized)
        );
        claim_eq!(host.state().total_supply(), 0);
    }

    #[concordium_test]
    fn test_mint_until_exhausted() {
        let mut host = default_host();
        let minter = Address::Contract(AUCTION_HOUSE);

        let mut minted = 0;
        while let Ok(Some(_)) = mint_as(&mut host, minter) {
            minted += 1;
        }

        claim_eq!(minted, 360);
        claim_eq!(host.state().total_supply(), 401);
        claim_eq!(
            mint_as(&mut host, minter),
            Err(CustomContractError::SupplyExhausted.into())
        );
    }

    #[concordium_test]
    fn test_burn() {
        let mut host = default_host();
        let minter = Address::Contract(AUCTION_HOUSE);
        let _ = mint_as(&mut host, minter);

        let bytes = to_bytes(&TokenIdU32(1));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(USER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();
        claim_eq!(
            burn(&ctx, &mut host, &mut logger),
            Err(ContractError::Unauthorized)
        );

        ctx.set_sender(minter);
        claim_eq!(burn(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(host.state().owner_of(&TokenIdU32(1)), None);
        claim_eq!(
            logger.logs,
            vec![to_bytes(&Cis2Event::Burn(BurnEvent {
                token_id: TokenIdU32(1),
                amount: TokenAmountU8(1),
                owner: minter,
            }))]
        );
    }

    #[concordium_test]
    fn test_transfer_to_account() {
        let mut host = default_host();
        let minter = Address::Contract(AUCTION_HOUSE);
        let _ = mint_as(&mut host, minter);

        let bytes = to_bytes(&TransferParams(vec![Transfer {
            token_id: TokenIdU32(1),
            amount: TokenAmountU8(1),
            from: minter,
            to: Receiver::Account(USER),
            data: AdditionalData::empty(),
        }]));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(USER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        // Only the owner or its operators may move a token
        claim_eq!(
            transfer(&ctx, &mut host, &mut logger),
            Err(ContractError::Unauthorized)
        );

        ctx.set_sender(minter);
        claim_eq!(transfer(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            host.state().owner_of(&TokenIdU32(1)),
            Some(Address::Account(USER))
        );
    }

    #[concordium_test]
    fn test_transfer_to_contract_calls_hook() {
        let mut host = default_host();
        let minter = Address::Contract(AUCTION_HOUSE);
        let _ = mint_as(&mut host, minter);

        host.setup_mock_entrypoint(
            COLLECTOR,
            OwnedEntrypointName::new_unchecked("onReceivingCIS2".into()),
            MockFn::new_v1(|param, _, _, _| {
                let params = OnReceivingCis2Params::<ContractTokenId, ContractTokenAmount>::deserial(
                    &mut Cursor::new(param.as_ref()),
                )
                .map_err(|_| CallContractError::Trap)?;
                if params.token_id == TokenIdU32(1) {
                    Ok((false, ()))
                } else {
                    Err(CallContractError::Trap)
                }
            }),
        );

        let bytes = to_bytes(&TransferParams(vec![Transfer {
            token_id: TokenIdU32(1),
            amount: TokenAmountU8(1),
            from: minter,
            to: Receiver::Contract(
                COLLECTOR,
                OwnedEntrypointName::new_unchecked("onReceivingCIS2".into()),
            ),
            data: AdditionalData::empty(),
        }]));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(minter).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        claim_eq!(transfer(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            host.state().owner_of(&TokenIdU32(1)),
            Some(Address::Contract(COLLECTOR))
        );
    }

    #[concordium_test]
    fn test_balance_of() {
        let mut host = default_host();
        let _ = mint_as(&mut host, Address::Contract(AUCTION_HOUSE));

        let bytes = to_bytes(&BalanceOfQueryParams {
            queries: vec![
                BalanceOfQuery {
                    token_id: TokenIdU32(0),
                    address: Address::Account(FOUNDERS),
                },
                BalanceOfQuery {
                    token_id: TokenIdU32(1),
                    address: Address::Account(FOUNDERS),
                },
            ],
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);

        let response = balance_of(&ctx, &host).expect_report("balanceOf should succeed");
        claim_eq!(response.0, vec![TokenAmountU8(1), TokenAmountU8(0)]);
    }

    #[concordium_test]
    fn test_contract_uri_admin_only() {
        let mut host = default_host();
        let ctx = TestReceiveContext::empty();
        claim_eq!(
            contract_uri(&ctx, &host),
            Ok(String::from("ipfs://QmZi1n79FqWt2tTLwCqiy6nLM6xLGRsEPQ5JmReJQKNNzX"))
        );

        let bytes = to_bytes(&String::from("ABC123"));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(USER)).set_parameter(&bytes);
        claim_eq!(
            set_contract_uri_hash(&ctx, &mut host),
            Err(ContractError::Unauthorized)
        );

        ctx.set_sender(Address::Account(ADMIN));
        claim_eq!(set_contract_uri_hash(&ctx, &mut host), Ok(()));
        claim_eq!(contract_uri(&ctx, &host), Ok(String::from("ipfs://ABC123")));
    }

    #[concordium_test]
    fn test_set_minter() {
        let mut host = default_host();
        let new_minter = Address::Account(USER);
        let bytes = to_bytes(&new_minter);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(AUCTION_HOUSE))
            .set_parameter(&bytes);
        claim_eq!(
            set_minter(&ctx, &mut host),
            Err(ContractError::Unauthorized)
        );

        ctx.set_sender(Address::Account(ADMIN));
        claim_eq!(set_minter(&ctx, &mut host), Ok(()));
        claim_eq!(mint_as(&mut host, new_minter), Ok(Some(TokenIdU32(1))));
        claim_eq!(
            mint_as(&mut host, Address::Contract(AUCTION_HOUSE)),
            Err(ContractError::Unauthorized)
        );
    }

    #[concordium_test]
    fn test_operator_transfer() {
        let mut host = default_host();
        let minter = Address::Contract(AUCTION_HOUSE);
        let _ = mint_as(&mut host, minter);

        let bytes = to_bytes(&UpdateOperatorParams(vec![UpdateOperator {
            update: OperatorUpdate::Add,
            operator: Address::Account(USER),
        }]));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(minter).set_parameter(&bytes);
        let mut logger = TestLogger::init();
        claim_eq!(update_operator(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            logger.logs,
            vec![to_bytes(
                &Cis2Event::<ContractTokenId, ContractTokenAmount>::UpdateOperator(
                    UpdateOperatorEvent {
                        owner: minter,
                        operator: Address::Account(USER),
                        update: OperatorUpdate::Add,
                    }
                )
            )]
        );

        let bytes = to_bytes(&OperatorOfQueryParams {
            queries: vec![
                OperatorOfQuery {
                    owner: minter,
                    address: Address::Account(USER),
                },
                OperatorOfQuery {
                    owner: Address::Account(USER),
                    address: minter,
                },
            ],
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        let response = operator_of(&ctx, &host).expect_report("operatorOf should succeed");
        claim_eq!(response.0, vec![true, false]);

        // The operator moves the minter's token
        let bytes = to_bytes(&TransferParams(vec![Transfer {
            token_id: TokenIdU32(1),
            amount: TokenAmountU8(1),
            from: minter,
            to: Receiver::Account(USER),
            data: AdditionalData::empty(),
        }]));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(USER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();
        claim_eq!(transfer(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            host.state().owner_of(&TokenIdU32(1)),
            Some(Address::Account(USER))
        );

        let bytes = to_bytes(&UpdateOperatorParams(vec![UpdateOperator {
            update: OperatorUpdate::Remove,
            operator: Address::Account(USER),
        }]));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(minter).set_parameter(&bytes);
        let mut logger = TestLogger::init();
        claim_eq!(update_operator(&ctx, &mut host, &mut logger), Ok(()));
        claim!(!host.state().is_operator(&minter, &Address::Account(USER)));
    }

    #[concordium_test]
    fn test_supports() {
        let bytes = to_bytes(&SupportsQueryParams {
            queries: vec![
                StandardIdentifierOwned::new_unchecked("CIS-0".into()),
                StandardIdentifierOwned::new_unchecked("CIS-2".into()),
                StandardIdentifierOwned::new_unchecked("CIS-1".into()),
            ],
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        let host = default_host();

        let response = supports(&ctx, &host).expect_report("supports should succeed");
        claim_eq!(
            to_bytes(&response),
            to_bytes(&SupportsQueryResponse::from(vec![
                SupportResult::Support,
                SupportResult::Support,
                SupportResult::NoSupport,
            ]))
        );
    }

    #[concordium_test]
    fn test_token_metadata() {
        let mut host = default_host();
        let _ = mint_as(&mut host, Address::Contract(AUCTION_HOUSE));

        let bytes = to_bytes(&TokenMetadataQueryParams {
            queries: vec![TokenIdU32(1)],
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        let response = token_metadata(&ctx, &host).expect_report("tokenMetadata should succeed");
        claim_eq!(response.0.len(), 1);
        claim_eq!(
            response.0[0].url,
            format!(
                "ipfs://QmZi1n79FqWt2tTLwCqiy6nLM6xLGRsEPQ5JmReJQKNNzX/{}",
                TokenIdU32(1)
            )
        );
        claim_eq!(response.0[0].hash, None);

        let bytes = to_bytes(&TokenMetadataQueryParams {
            queries: vec![TokenIdU32(1), TokenIdU32(7)],
        });
        ctx.set_parameter(&bytes);
        claim!(matches!(
            token_metadata(&ctx, &host),
            Err(ContractError::InvalidTokenId)
        ));
    }

    #[concordium_test]
    fn test_name_and_symbol() {
        let host = default_host();
        let ctx = TestReceiveContext::empty();
        claim_eq!(name(&ctx, &host), Ok(String::from("Nouns Sequitur")));
        claim_eq!(symbol(&ctx, &host), Ok(String::from("NOUNSSEQUITUR")));
    }
}
