use alloy::primitives::{Address, address, hex};

pub const ENTRYPOINT_ADDRESS_V0_6: Address =
    address!("0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

pub const ENTRYPOINT_ADDRESS_V0_7: Address =
    address!("0x0000000071727De22E5E9d8BAf0edAc6f37da032");

/// Placeholder signature with the length and shape of a real ECDSA signature.
/// Bundlers need a signature of this size while estimating verification gas,
/// before the real one can be produced.
pub const DUMMY_SIGNATURE: [u8; 65] = hex!(
    "0xfffffffffffffffffffffffffffffff0000000000000000000000000000000007aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1c"
);

/// Source tag reported by the account descriptor
pub const CUSTOM_ACCOUNT_SOURCE: &str = "CustomSmartAccount";
