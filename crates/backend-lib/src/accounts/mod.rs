//! Accounts: records, short ids and the registry guarding their invariants.

mod model;
mod registry;
pub mod short_id;

pub use model::{Account, AccountId, AccountSnapshot, ShortId};
pub use registry::{AccountRegistry, MAX_SHORT_ID_ATTEMPTS};
pub use short_id::{RandomShortIdGenerator, ShortIdGenerator, SHORT_ID_LENGTH};
