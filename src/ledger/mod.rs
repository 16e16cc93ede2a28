// Ledger module - THE ACCOUNTING CORE
// Bands, members, pooled balances, and the engine that mutates them

mod assets;
mod band;
mod engine;

pub use assets::{AssetTransfer, InMemoryAssets, MockAssets, TransferError};
pub use band::{Band, BandId, BandMember, MemberKey};
pub use engine::{BandLedger, LedgerError};
