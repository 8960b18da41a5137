// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const ACCOUNT_REGISTERED: &str = "account.registered";
pub const ACCOUNT_RENAMED: &str = "account.renamed";
pub const ACCOUNT_DELETED: &str = "account.deleted";
pub const SHORT_ID_REGENERATED: &str = "short_id.regenerated";
pub const SHORT_ID_COLLISION: &str = "short_id.collision";
/// Labelled with `outcome` = `ok` | `not_found` | `bad_password`
pub const LOGIN_ATTEMPT: &str = "auth.login";
pub const AUTH_REJECTED: &str = "auth.rejected";
