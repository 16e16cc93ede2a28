// Identity module - Opaque caller identities
// Authentication happens outside the engine; this is just the value it trusts

mod account;

pub use account::AccountId;
