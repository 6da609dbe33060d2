use crate::CustomContractError;
use concordium_std::*;

#[derive(Debug, Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct Authority<S: HasStateApi> {
    /// Trusted addresses that run the contract and update both lists
    admins: StateSet<Address, S>,
    /// Addresses that may only pause and update the guardian list
    guardians: StateSet<Address, S>,
}

impl<S: HasStateApi> Authority<S> {
    pub fn new(state_builder: &mut StateBuilder<S>, admin: Address) -> Self {
        let mut admins = state_builder.new_set();
        admins.insert(admin);
        Self {
            admins,
            guardians: state_builder.new_set(),
        }
    }

    pub fn has_admin_rights(&self, address: &Address) -> bool {
        self.admins.contains(address)
    }

    /// Admins implicitly hold guardian rights.
    pub fn has_guardian_rights(&self, address: &Address) -> bool {
        self.guardians.contains(address) || self.has_admin_rights(address)
    }

    pub fn handle_update(
        &mut self,
        sender: Address,
        update: AuthorityUpdateParams,
    ) -> Result<(), CustomContractError> {
        let address_list = match update.field {
            AuthorityField::Guardian => {
                ensure!(
                    self.has_guardian_rights(&sender),
                    CustomContractError::Unauthorized
                );
                &mut self.guardians
            }
            AuthorityField::Admin => {
                ensure!(
                    self.has_admin_rights(&sender),
                    CustomContractError::Unauthorized
                );
                // The contract must never be left without an admin.
                if let AuthorityUpdateKind::Remove = update.kind {
                    ensure!(
                        self.admins.iter().any(|admin| *admin != update.address),
                        CustomContractError::InvalidConfig
                    );
                }
                &mut self.admins
            }
        };

        match update.kind {
            AuthorityUpdateKind::Remove => {
                address_list.remove(&update.address);
            }
            AuthorityUpdateKind::Add => {
                address_list.insert(update.address);
            }
        }

        Ok(())
    }

    pub fn handle_view(&self, view: AuthorityViewParams) -> Vec<Address> {
        let address_list = match view.field {
            AuthorityField::Guardian => &self.guardians,
            AuthorityField::Admin => &self.admins,
        };

        address_list
            .iter()
            .skip(view.skip as usize)
            .take(view.show as usize)
            .map(|a| *a)
            .collect()
    }
}

#[derive(Debug, SchemaType, Serialize)]
pub enum AuthorityField {
    Guardian,
    Admin,
}

#[derive(Debug, SchemaType, Serialize)]
pub enum AuthorityUpdateKind {
    Remove,
    Add,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityUpdateParams {
    pub field: AuthorityField,
    pub kind: AuthorityUpdateKind,
    pub address: Address,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityViewParams {
    pub field: AuthorityField,
    pub skip: u32,
    pub show: u32,
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const GUARDIAN: AccountAddress = AccountAddress([2; 32]);
    const AUCTION_HOUSE: ContractAddress = ContractAddress {
        index: 7,
        subindex: 0,
    };
    const USER: AccountAddress = AccountAddress([16; 32]);

    fn default_authority() -> Authority<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        let mut authority = Authority::new(&mut state_builder, Address::Account(ADMIN));
        authority.guardians.insert(Address::Account(GUARDIAN));
        authority
    }

    fn update(
        field: AuthorityField,
        kind: AuthorityUpdateKind,
        address: Address,
    ) -> AuthorityUpdateParams {
        AuthorityUpdateParams {
            field,
            kind,
            address,
        }
    }

    #[concordium_test]
    fn test_admin_implies_guardian() {
        let authority = default_authority();

        claim!(authority.has_admin_rights(&Address::Account(ADMIN)));
        claim!(authority.has_guardian_rights(&Address::Account(ADMIN)));
        claim!(!authority.has_admin_rights(&Address::Account(GUARDIAN)));
        claim!(authority.has_guardian_rights(&Address::Account(GUARDIAN)));
        claim!(!authority.has_guardian_rights(&Address::Account(USER)));
    }

    #[concordium_test]
    fn test_admin_adds_contract_admin() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Add,
                Address::Contract(AUCTION_HOUSE),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(authority.has_admin_rights(&Address::Contract(AUCTION_HOUSE)));
    }

    #[concordium_test]
    fn test_guardian_cannot_touch_admins() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(GUARDIAN),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Add,
                Address::Account(GUARDIAN),
            ),
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized));
        claim!(!authority.has_admin_rights(&Address::Account(GUARDIAN)));
    }

    #[concordium_test]
    fn test_guardian_manages_guardians() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(GUARDIAN),
            update(
                AuthorityField::Guardian,
                AuthorityUpdateKind::Add,
                Address::Account(USER),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(authority.has_guardian_rights(&Address::Account(USER)));

        let result = authority.handle_update(
            Address::Account(USER),
            update(
                AuthorityField::Guardian,
                AuthorityUpdateKind::Remove,
                Address::Account(GUARDIAN),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(!authority.has_guardian_rights(&Address::Account(GUARDIAN)));
    }

    #[concordium_test]
    fn test_outsider_rejected() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(USER),
            update(
                AuthorityField::Guardian,
                AuthorityUpdateKind::Add,
                Address::Account(USER),
            ),
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized));
        claim!(!authority.has_guardian_rights(&Address::Account(USER)));
    }

    #[concordium_test]
    fn test_last_admin_cannot_be_removed() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Remove,
                Address::Account(ADMIN),
            ),
        );
        claim_eq!(result, Err(CustomContractError::InvalidConfig));
        claim!(authority.has_admin_rights(&Address::Account(ADMIN)));

        // Once a second admin exists the first may step down
        authority.admins.insert(Address::Account(USER));
        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Remove,
                Address::Account(ADMIN),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(!authority.has_admin_rights(&Address::Account(ADMIN)));
        claim!(authority.has_admin_rights(&Address::Account(USER)));
    }

    #[concordium_test]
    fn test_view_guardians_paged() {
        let mut authority = default_authority();
        for n in 16u8..48u8 {
            authority.guardians.insert(Address::Account(AccountAddress([n; 32])));
        }

        let mut seen = Vec::new();
        let mut skip = 0;
        loop {
            let page = authority.handle_view(AuthorityViewParams {
                field: AuthorityField::Guardian,
                skip,
                show: 10,
            });
            let len = page.len();
            seen.extend(page);
            if len < 10 {
                break;
            }
            skip += 10;
        }

        // 32 added plus the default guardian
        claim_eq!(seen.len(), 33);
        claim!(seen.contains(&Address::Account(GUARDIAN)));
    }
}
