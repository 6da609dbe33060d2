//! Moving value out of the contract without letting the recipient block the caller.
use commons::{CustomContractError, WRAP_ENTRYPOINT};
use concordium_cis2::{AdditionalData, Receiver};
use concordium_std::*;

use crate::events::{AuctionEvent, CreditKind};
use crate::external::WrapParams;
use crate::state::{Payment, State};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The recipient received plain CCD.
    Pushed,
    Credited(CreditKind),
}

/// Push `amount` directly. Only accounts are paid this way: a contract recipient
/// runs arbitrary code that may reject or exhaust the energy of the transaction.
pub fn try_push<T>(host: &mut impl HasHost<T>, recipient: &Address, amount: Amount) -> bool {
    match recipient {
        Address::Account(account) => host.invoke_transfer(account, amount).is_ok(),
        Address::Contract(_) => false,
    }
}

/// Make `amount` available to `recipient` without running any of its code.
///
/// Accounts get the value wrapped into wCCD. Everything else, including a failed
/// wrap, lands in the internal ledger.
pub fn credit<S: HasStateApi>(
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    recipient: Address,
    amount: Amount,
) -> Result<CreditKind, CustomContractError> {
    if let Address::Account(account) = recipient {
        let wccd = host.state().wccd;
        let params = WrapParams {
            to: Receiver::Account(account),
            data: AdditionalData::empty(),
        };
        let wrapped = host.invoke_contract(
            &wccd,
            &params,
            EntrypointName::new_unchecked(WRAP_ENTRYPOINT),
            amount,
        );
        if wrapped.is_ok() {
            return Ok(CreditKind::Wrapped);
        }
    }

    host.state_mut().credit(recipient, amount)?;
    Ok(CreditKind::Ledger)
}

/// Deliver a payment, falling back to a credit when the direct push fails.
pub fn deliver<S: HasStateApi>(
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    payment: Payment,
) -> Result<Delivery, CustomContractError> {
    if payment.amount == Amount::zero()
        || try_push(host, &payment.recipient, payment.amount)
    {
        return Ok(Delivery::Pushed);
    }

    let kind = credit(host, payment.recipient, payment.amount)?;
    logger.log(&AuctionEvent::payment_credited(
        payment.recipient,
        payment.amount,
        kind,
    ))?;
    Ok(Delivery::Credited(kind))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::external::{EngineConfig, InitParams};
    use concordium_std::test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const TREASURY: AccountAddress = AccountAddress([2; 32]);
    const BIDDER: AccountAddress = AccountAddress([16; 32]);
    const BIDDER_CONTRACT: ContractAddress = ContractAddress {
        index: 66,
        subindex: 0,
    };
    const TOKEN: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const WCCD: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };

    fn host_with_balance(balance: Amount) -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let params = InitParams {
            token: TOKEN,
            wccd: WCCD,
            config: EngineConfig {
                time_buffer: Duration::from_minutes(15),
                reserve_price: Amount::from_micro_ccd(2),
                min_bid_increment_percentage: 5,
                duration: Duration::from_days(1),
                proceeds_recipient: Address::Account(TREASURY),
            },
        };
        let state = State::new(&mut state_builder, params, ADMIN);
        let mut host = TestHost::new(state, state_builder);
        host.set_self_balance(balance);
        host
    }

    #[concordium_test]
    fn test_deliver_pushes_to_account() {
        let mut host = host_with_balance(Amount::from_micro_ccd(100));
        let mut logger = TestLogger::init();

        let result = deliver(
            &mut host,
            &mut logger,
            Payment {
                recipient: Address::Account(BIDDER),
                amount: Amount::from_micro_ccd(40),
            },
        );

        claim_eq!(result, Ok(Delivery::Pushed));
        claim!(host.transfer_occurred(&BIDDER, Amount::from_micro_ccd(40)));
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_deliver_to_contract_credits_ledger() {
        let mut host = host_with_balance(Amount::from_micro_ccd(100));
        let mut logger = TestLogger::init();
        let recipient = Address::Contract(BIDDER_CONTRACT);

        let result = deliver(
            &mut host,
            &mut logger,
            Payment {
                recipient,
                amount: Amount::from_micro_ccd(40),
            },
        );

        claim_eq!(result, Ok(Delivery::Credited(CreditKind::Ledger)));
        claim_eq!(
            host.state().credit_of(&recipient),
            Amount::from_micro_ccd(40)
        );
        claim_eq!(
            logger.logs,
            vec![to_bytes(&AuctionEvent::payment_credited(
                recipient,
                Amount::from_micro_ccd(40),
                CreditKind::Ledger
            ))]
        );
    }

    #[concordium_test]
    fn test_credit_account_wraps() {
        let mut host = host_with_balance(Amount::from_micro_ccd(100));
        host.setup_mock_entrypoint(
            WCCD,
            OwnedEntrypointName::new_unchecked("wrap".into()),
            MockFn::new_v1(|param, amount, _, _| {
                let params = WrapParams::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                let to_bidder = matches!(params.to, Receiver::Account(account) if account == BIDDER);
                if to_bidder && amount == Amount::from_micro_ccd(25) {
                    Ok((false, ()))
                } else {
                    Err(CallContractError::Trap)
                }
            }),
        );

        let result = credit(&mut host, Address::Account(BIDDER), Amount::from_micro_ccd(25));

        claim_eq!(result, Ok(CreditKind::Wrapped));
        claim_eq!(
            host.state().credit_of(&Address::Account(BIDDER)),
            Amount::zero()
        );
    }

    #[concordium_test]
    fn test_credit_account_falls_back_to_ledger() {
        let mut host = host_with_balance(Amount::from_micro_ccd(100));
        host.setup_mock_entrypoint(
            WCCD,
            OwnedEntrypointName::new_unchecked("wrap".into()),
            MockFn::new_v1(|_, _, _, _| -> Result<(bool, ()), CallContractError<()>> {
                Err(CallContractError::Trap)
            }),
        );

        let result = credit(&mut host, Address::Account(BIDDER), Amount::from_micro_ccd(25));

        claim_eq!(result, Ok(CreditKind::Ledger));
        claim_eq!(
            host.state().credit_of(&Address::Account(BIDDER)),
            Amount::from_micro_ccd(25)
        );
    }

    #[concordium_test]
    fn test_try_push_never_calls_contracts() {
        let mut host = host_with_balance(Amount::from_micro_ccd(100));

        claim!(!try_push(
            &mut host,
            &Address::Contract(BIDDER_CONTRACT),
            Amount::from_micro_ccd(1)
        ));
        claim!(try_push(
            &mut host,
            &Address::Account(BIDDER),
            Amount::from_micro_ccd(1)
        ));
    }
}
