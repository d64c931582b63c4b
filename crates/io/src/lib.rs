//! `rollcall-io` — filesystem collaborators for the reconciliation engine:
//! JSON roster store, attendance feed loading, CRM record output.

pub mod crm;
pub mod error;
pub mod feed;
pub mod roster_store;

pub use crm::{CrmRecord, JsonLinesSink, RecordSink};
pub use error::FileError;
pub use feed::load_input;
pub use roster_store::FileRosterStore;
