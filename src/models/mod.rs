pub mod coerce;
pub mod direction;
pub mod ledger;

pub use coerce::{parse_timestamp, safe_number};
pub use direction::*;
pub use ledger::{CashflowEntry, LedgerEntry, RawLedgerEntry, TradeEntry};
