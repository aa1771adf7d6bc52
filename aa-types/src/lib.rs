mod userop;

pub use userop::*;
