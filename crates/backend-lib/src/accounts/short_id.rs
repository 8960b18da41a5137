//! Short public identifiers.
//!
//! Generation is a plain random draw. Uniqueness is the registry's job: it checks
//! each candidate against live accounts and the store rejects duplicates at commit.
use super::model::ShortId;
use rand::Rng;

/// Length of every generated short id
pub const SHORT_ID_LENGTH: usize = 6;

/// Base58 alphabet without the look-alikes `0`, `O`, `I` and `l`
const ALPHABET: &[u8] = b"123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Source of candidate short ids
pub trait ShortIdGenerator: Send + Sync {
    /// Draw a candidate. Calls are independent of each other.
    fn generate(&self) -> ShortId;
}

/// Default generator backed by the thread-local CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomShortIdGenerator;

impl ShortIdGenerator for RandomShortIdGenerator {
    fn generate(&self) -> ShortId {
        let mut rng = rand::rng();
        let id: String = (0..SHORT_ID_LENGTH)
            .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
            .collect();
        ShortId::new(id)
    }
}

/// Whether `candidate` looks like something this module would generate
pub fn is_well_formed(candidate: &str) -> bool {
    candidate.len() == SHORT_ID_LENGTH && candidate.bytes().all(|b| ALPHABET.contains(&b))
}
