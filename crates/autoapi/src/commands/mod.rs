//! CLI command implementations.

pub(crate) mod generate;
pub(crate) mod nav;

pub(crate) use generate::GenerateArgs;
pub(crate) use nav::NavArgs;
