//! Fixed kiss amounts used by the ledger.

use serde::{Deserialize, Serialize};

/// The welcome grant for a consumer's first balance read.
pub const WELCOME_GRANT: i64 = 10;

/// The cost of one image generation, debited from the consumer.
pub const GENERATION_COST: i64 = 10;

/// The reward credited to the preset's creator per generation.
pub const CREATOR_REWARD: i64 = 2;

/// The fixed amounts the ledger moves around.
///
/// Carried in the service configuration so tests can shrink the numbers;
/// production always runs the defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KissAmounts {
    /// Kisses granted when a consumer account is first read.
    pub welcome_grant: i64,

    /// Kisses debited from the consumer per generation.
    pub generation_cost: i64,

    /// Kisses credited to the creator/model account per generation.
    pub creator_reward: i64,
}

impl Default for KissAmounts {
    fn default() -> Self {
        Self {
            welcome_grant: WELCOME_GRANT,
            generation_cost: GENERATION_COST,
            creator_reward: CREATOR_REWARD,
        }
    }
}
