use commons::{
    Authority, ContractError, ContractResult, ContractTokenAmount, ContractTokenId,
    CustomContractError,
};
use concordium_cis2::{TokenAmountU8, TokenIdU32};
use concordium_std::*;
use core::ops::DerefMut;

use crate::external::InitParams;

/// Total number of tokens that can ever exist, ids `0..=400`.
pub const MAX_SUPPLY: u32 = 401;
/// Ids divisible by this go to the founders.
pub const REWARD_INTERVAL: u32 = 10;

/// Ids created by a single `mint` call.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct Minted {
    pub reward: Option<ContractTokenId>,
    pub lot: Option<ContractTokenId>,
}

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    pub authority: Authority<S>,
    pub founders: AccountAddress,
    pub minter: Option<Address>,
    /// Next id to mint. Ids are never reused, even after a burn.
    pub next_id: u32,
    pub burned: u32,
    pub owners: StateMap<ContractTokenId, Address, S>,
    /// Addresses allowed to move every token of an owner.
    pub operators: StateMap<Address, StateSet<Address, S>, S>,
    pub contract_uri_hash: String,
}

impl<S: HasStateApi> State<S> {
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        params: InitParams,
        origin: AccountAddress,
    ) -> Self {
        Self {
            authority: Authority::new(state_builder, Address::Account(origin)),
            founders: params.founders,
            minter: params.minter,
            next_id: 0,
            burned: 0,
            owners: state_builder.new_map(),
            operators: state_builder.new_map(),
            contract_uri_hash: params.contract_uri_hash,
        }
    }

    pub fn is_minter(&self, address: &Address) -> bool {
        self.minter.as_ref() == Some(address)
    }

    /// Mint the next id to `minter`, preceded by the founders reward when due.
    pub fn mint(&mut self, minter: Address) -> Result<Minted, CustomContractError> {
        ensure!(
            self.next_id < MAX_SUPPLY,
            CustomContractError::SupplyExhausted
        );

        let founders = Address::Account(self.founders);
        let reward = if self.next_id % REWARD_INTERVAL == 0 {
            Some(self.mint_to(founders))
        } else {
            None
        };
        let lot = if self.next_id < MAX_SUPPLY {
            Some(self.mint_to(minter))
        } else {
            None
        };

        Ok(Minted { reward, lot })
    }

    fn mint_to(&mut self, owner: Address) -> ContractTokenId {
        let token_id = TokenIdU32(self.next_id);
        self.owners.insert(token_id, owner);
        self.next_id += 1;
        token_id
    }

    pub fn owner_of(&self, token_id: &ContractTokenId) -> Option<Address> {
        self.owners.get(token_id).map(|owner| *owner)
    }

    pub fn exists(&self, token_id: &ContractTokenId) -> bool {
        self.owners.get(token_id).is_some()
    }

    /// Succeeds even if `operator` already is an operator of `owner`.
    pub fn add_operator(
        &mut self,
        owner: &Address,
        operator: &Address,
        state_builder: &mut StateBuilder<S>,
    ) {
        self.operators
            .entry(*owner)
            .or_insert_with(|| state_builder.new_set())
            .deref_mut()
            .insert(*operator);
    }

    pub fn remove_operator(&mut self, owner: &Address, operator: &Address) {
        if let Some(mut operators) = self.operators.get_mut(owner) {
            operators.remove(operator);
        }
    }

    /// Every owner counts as its own operator.
    pub fn is_operator(&self, owner: &Address, address: &Address) -> bool {
        owner == address
            || self
                .operators
                .get(owner)
                .map(|operators| operators.contains(address))
                .unwrap_or(false)
    }

    pub fn total_supply(&self) -> u32 {
        self.next_id - self.burned
    }

    pub fn balance(
        &self,
        token_id: &ContractTokenId,
        address: &Address,
    ) -> ContractResult<ContractTokenAmount> {
        let owner = self
            .owner_of(token_id)
            .ok_or(ContractError::InvalidTokenId)?;
        Ok(if owner == *address {
            TokenAmountU8(1)
        } else {
            TokenAmountU8(0)
        })
    }

    pub fn transfer(
        &mut self,
        token_id: &ContractTokenId,
        amount: ContractTokenAmount,
        from: &Address,
        to: &Address,
    ) -> ContractResult<()> {
        let owner = self
            .owner_of(token_id)
            .ok_or(ContractError::InvalidTokenId)?;
        if amount == TokenAmountU8(0) {
            return Ok(());
        }
        ensure!(
            amount == TokenAmountU8(1) && owner == *from,
            ContractError::InsufficientFunds
        );
        self.owners.insert(*token_id, *to);
        Ok(())
    }

    pub fn burn(&mut self, token_id: &ContractTokenId, owner: &Address) -> ContractResult<()> {
        let current = self
            .owner_of(token_id)
            .ok_or(ContractError::InvalidTokenId)?;
        ensure_eq!(&current, owner, ContractError::InsufficientFunds);
        self.owners.remove(token_id);
        self.burned += 1;
        Ok(())
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const FOUNDERS: AccountAddress = AccountAddress([5; 32]);
    const AUCTION_HOUSE: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };

    fn default_state() -> State<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        State::new(
            &mut state_builder,
            InitParams {
                founders: FOUNDERS,
                minter: Some(Address::Contract(AUCTION_HOUSE)),
                contract_uri_hash: "QmHash".into(),
            },
            ADMIN,
        )
    }

    #[concordium_test]
    fn test_first_mint_rewards_founders() {
        let mut state = default_state();
        let minter = Address::Contract(AUCTION_HOUSE);

        claim_eq!(
            state.mint(minter),
            Ok(Minted {
                reward: Some(TokenIdU32(0)),
                lot: Some(TokenIdU32(1)),
            })
        );
        claim_eq!(
            state.mint(minter),
            Ok(Minted {
                reward: None,
                lot: Some(TokenIdU32(2)),
            })
        );
        claim_eq!(
            state.owner_of(&TokenIdU32(0)),
            Some(Address::Account(FOUNDERS))
        );
        claim_eq!(state.owner_of(&TokenIdU32(1)), Some(minter));
        claim_eq!(state.total_supply(), 3);
    }

    #[concordium_test]
    fn test_full_supply_split() {
        let mut state = default_state();
        let minter = Address::Contract(AUCTION_HOUSE);

        let mut last = None;
        while let Ok(minted) = state.mint(minter) {
            last = Some(minted);
        }

        // The last reward takes id 400, so the final call mints nothing to the minter
        claim_eq!(
            last,
            Some(Minted {
                reward: Some(TokenIdU32(400)),
                lot: None,
            })
        );
        claim_eq!(state.next_id, MAX_SUPPLY);
        claim_eq!(state.mint(minter), Err(CustomContractError::SupplyExhausted));

        let founders = state
            .owners
            .iter()
            .filter(|(_, owner)| **owner == Address::Account(FOUNDERS))
            .count();
        let auctioned = state
            .owners
            .iter()
            .filter(|(_, owner)| **owner == minter)
            .count();
        claim_eq!(founders, 41);
        claim_eq!(auctioned, 360);
    }

    #[concordium_test]
    fn test_transfer_and_balance() {
        let mut state = default_state();
        let minter = Address::Contract(AUCTION_HOUSE);
        let buyer = Address::Account(AccountAddress([16; 32]));
        let _ = state.mint(minter);

        claim_eq!(
            state.transfer(&TokenIdU32(1), TokenAmountU8(1), &buyer, &minter),
            Err(ContractError::InsufficientFunds)
        );
        claim_eq!(
            state.transfer(&TokenIdU32(1), TokenAmountU8(1), &minter, &buyer),
            Ok(())
        );
        claim_eq!(state.balance(&TokenIdU32(1), &buyer), Ok(TokenAmountU8(1)));
        claim_eq!(state.balance(&TokenIdU32(1), &minter), Ok(TokenAmountU8(0)));
        claim_eq!(
            state.balance(&TokenIdU32(9), &buyer),
            Err(ContractError::InvalidTokenId)
        );
    }

    #[concordium_test]
    fn test_burn_keeps_ids_unique() {
        let mut state = default_state();
        let minter = Address::Contract(AUCTION_HOUSE);
        let _ = state.mint(minter);

        claim_eq!(
            state.burn(&TokenIdU32(0), &minter),
            Err(ContractError::InsufficientFunds)
        );
        claim_eq!(state.burn(&TokenIdU32(1), &minter), Ok(()));
        claim_eq!(state.owner_of(&TokenIdU32(1)), None);
        claim_eq!(state.total_supply(), 1);

        claim_eq!(
            state.mint(minter),
            Ok(Minted {
                reward: None,
                lot: Some(TokenIdU32(2)),
            })
        );
    }

    #[concordium_test]
    fn test_operators() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::new(
            &mut state_builder,
            InitParams {
                founders: FOUNDERS,
                minter: None,
                contract_uri_hash: "QmHash".into(),
            },
            ADMIN,
        );
        let owner = Address::Account(FOUNDERS);
        let operator = Address::Account(AccountAddress([16; 32]));

        claim!(state.is_operator(&owner, &owner));
        claim!(!state.is_operator(&owner, &operator));

        state.add_operator(&owner, &operator, &mut state_builder);
        state.add_operator(&owner, &operator, &mut state_builder);
        claim!(state.is_operator(&owner, &operator));
        claim!(!state.is_operator(&operator, &owner));

        state.remove_operator(&owner, &operator);
        claim!(!state.is_operator(&owner, &operator));
        // Removing an unknown operator is a no-op
        state.remove_operator(&operator, &owner);
    }
}
