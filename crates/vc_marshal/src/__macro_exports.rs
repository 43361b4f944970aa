//! Items used by the code `#[derive(Marshal)]` generates.
//!
//! Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::error::Error;
    use crate::registry::MarshalRegistry;

    /// One `#[marshal(auto_register)]` type.
    pub struct __AutoRegister(pub fn(&mut MarshalRegistry) -> Result<bool, Error>);

    inventory::collect!(__AutoRegister);
}
