mod call_data;
mod deployment;

pub use call_data::*;
pub use deployment::*;
