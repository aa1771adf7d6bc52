pub mod constants;
pub mod entrypoint;
pub mod error;
pub mod rpc;
pub mod signer;
