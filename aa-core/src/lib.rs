pub mod account;
pub mod account_factory;
pub mod smart_account;

pub use account::{
    AccountDescriptor, CustomSmartAccount, CustomSmartAccountBuilder, CustomSmartAccountParams,
    create_custom_smart_account, create_custom_smart_account as signer_to_custom_smart_account,
};
