pub(crate) mod account;
pub(crate) mod configuration;
pub(crate) mod records;
