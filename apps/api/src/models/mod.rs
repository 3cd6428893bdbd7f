pub mod account;
pub mod sow;
pub mod template;
