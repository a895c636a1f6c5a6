//!  Storage is organized through [ledger_storage::LedgerStorage].
//!  The basic idea is:
//!   - The whole ledger lives in one JSON record file.
//!   - The file is read once on start and fully rewritten after every change.
//!   - A missing file is an empty ledger.

pub mod ledger_storage;
