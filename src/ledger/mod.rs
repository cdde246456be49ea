//! The move ledger: the authoritative match timeline.
//!
//! Every move applied outside a search rollout is appended here with its
//! round, player, and submove index. A player can move at most twice in a
//! round (a double move); the submove index is a counter assigned when the
//! entry is written and is never derived from the move itself.
//!
//! Rendering the ledger as a table is left to presentation code, which
//! reads `MoveLedger::table_order` and the recorded reveal rounds.

mod history;

pub use history::{LedgerEntry, MoveLedger, MAX_MOVES_PER_ROUND};
