use concordium_std::*;

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct InitParams {
    /// Receives every tenth token.
    pub founders: AccountAddress,
    /// Usually the auction house. Can be set later with `setMinter`.
    pub minter: Option<Address>,
    /// IPFS hash of the collection metadata.
    pub contract_uri_hash: String,
}
