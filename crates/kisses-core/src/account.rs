//! Account identifiers for the kisses ledger.
//!
//! The ledger stores two kinds of accounts in one table: consumer wallets
//! that spend kisses, and creator/model pairs that earn them. Rather than
//! inferring the kind from the shape of a raw string, `AccountId` tags the
//! namespace explicitly and provides a total, reversible encoding to the
//! storage key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between creator and model in a composite storage key.
pub const SEPARATOR: char = '/';

/// A ledger account identifier.
///
/// The storage encoding is the wallet address verbatim for consumers and
/// `"<creator>/<model>"` for creator/model accounts. A consumer address never
/// contains [`SEPARATOR`], so the two namespaces cannot collide and every
/// stored key decodes back to exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AccountId {
    /// A wallet-address-keyed consumer account that pays for generations.
    Consumer(String),

    /// A composite account accruing rewards for a style preset's author.
    CreatorModel {
        /// The preset author (e.g. a Hugging Face username).
        creator: String,
        /// The model slug. May itself contain `/`.
        model: String,
    },
}

impl AccountId {
    /// Build a consumer account id from a wallet address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is empty or contains the separator.
    pub fn consumer(address: impl Into<String>) -> Result<Self, ParseAccountIdError> {
        let address = address.into();
        if address.is_empty() {
            return Err(ParseAccountIdError::Empty);
        }
        if address.contains(SEPARATOR) {
            return Err(ParseAccountIdError::SeparatorInAddress);
        }
        Ok(Self::Consumer(address))
    }

    /// Build a creator/model account id.
    ///
    /// # Errors
    ///
    /// Returns an error if either part is empty or the creator contains the
    /// separator (the model part may, as Hugging Face slugs do).
    pub fn creator_model(
        creator: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ParseAccountIdError> {
        let creator = creator.into();
        let model = model.into();
        if creator.is_empty() || model.is_empty() {
            return Err(ParseAccountIdError::Empty);
        }
        if creator.contains(SEPARATOR) {
            return Err(ParseAccountIdError::SeparatorInCreator);
        }
        Ok(Self::CreatorModel { creator, model })
    }

    /// Whether this is a creator/model account.
    #[must_use]
    pub const fn is_creator_model(&self) -> bool {
        matches!(self, Self::CreatorModel { .. })
    }

    /// The storage key for this account.
    #[must_use]
    pub fn storage_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consumer(address) => f.write_str(address),
            Self::CreatorModel { creator, model } => {
                write!(f, "{creator}{SEPARATOR}{model}")
            }
        }
    }
}

impl FromStr for AccountId {
    type Err = ParseAccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseAccountIdError::Empty);
        }
        match s.split_once(SEPARATOR) {
            None => Ok(Self::Consumer(s.to_string())),
            Some((creator, model)) => Self::creator_model(creator, model),
        }
    }
}

impl TryFrom<String> for AccountId {
    type Error = ParseAccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_string()
    }
}

/// Errors from constructing or parsing an [`AccountId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAccountIdError {
    /// The identifier (or one of its parts) was empty.
    #[error("account identifier must not be empty")]
    Empty,

    /// A consumer address contained the composite separator.
    #[error("consumer address must not contain '{SEPARATOR}'")]
    SeparatorInAddress,

    /// The creator part of a composite id contained the separator.
    #[error("creator must not contain '{SEPARATOR}'")]
    SeparatorInCreator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_round_trip() {
        let id = AccountId::consumer("0xabc123").unwrap();
        let key = id.storage_key();
        assert_eq!(key, "0xabc123");
        assert_eq!(key.parse::<AccountId>().unwrap(), id);
        assert!(!id.is_creator_model());
    }

    #[test]
    fn creator_model_round_trip() {
        let id = AccountId::creator_model("strangerzonehf", "Flux-Icon-Kit-LoRA").unwrap();
        let key = id.storage_key();
        assert_eq!(key, "strangerzonehf/Flux-Icon-Kit-LoRA");
        assert_eq!(key.parse::<AccountId>().unwrap(), id);
        assert!(id.is_creator_model());
    }

    #[test]
    fn model_may_contain_separator() {
        // "alice/org/model" decodes as creator "alice", model "org/model"
        // and encodes back to the same key.
        let id = "alice/org/model".parse::<AccountId>().unwrap();
        assert_eq!(
            id,
            AccountId::CreatorModel {
                creator: "alice".into(),
                model: "org/model".into()
            }
        );
        assert_eq!(id.storage_key(), "alice/org/model");
    }

    #[test]
    fn rejects_empty_parts() {
        assert_eq!("".parse::<AccountId>(), Err(ParseAccountIdError::Empty));
        assert_eq!(
            "/model".parse::<AccountId>(),
            Err(ParseAccountIdError::Empty)
        );
        assert_eq!(
            "creator/".parse::<AccountId>(),
            Err(ParseAccountIdError::Empty)
        );
    }

    #[test]
    fn consumer_rejects_separator() {
        assert_eq!(
            AccountId::consumer("0xabc/def"),
            Err(ParseAccountIdError::SeparatorInAddress)
        );
    }

    #[test]
    fn serde_as_string() {
        let id = AccountId::creator_model("glif", "anime-blockprint-style").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"glif/anime-blockprint-style\"");
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
