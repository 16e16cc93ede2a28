// BandLedger - Ownership-weighted revenue-sharing ledger
//
// Tracks bands (groups with an owner and a pooled balance), their members,
// and each member's percentage claim on whatever the pool currently holds.
// The engine is a strictly serial state machine; moving real funds and
// persisting snapshots are collaborator concerns behind the `AssetTransfer`
// trait and the `storage` module.

pub mod identity;
pub mod ledger;
pub mod storage;
