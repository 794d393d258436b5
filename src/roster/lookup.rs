//! Character lookup collaborator seam.
//!
//! The third-party lookup service resolves a nickname to a character profile.
//! Only the seam lives here: callers inject an implementation, and the error
//! taxonomy keeps not-found, rate-limit, and generic failure distinct so the
//! UI can phrase each one differently. No retries happen at this layer.

use async_trait::async_trait;
use thiserror::Error;

use crate::roster::types::{NewCharacter, RefreshProfile};

/// Profile returned by the lookup service for a nickname.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupProfile {
    pub name: String,
    pub class_name: String,
    pub server_name: String,
    pub item_level: String,
    /// Source image for the portrait cropper, when the service provides one.
    pub portrait_source: Option<String>,
}

#[derive(Debug, Error)]
pub enum LookupError {
    /// The nickname does not exist on any server.
    #[error("character not found")]
    NotFound,

    /// The service rejected the request for quota reasons; try again later.
    #[error("rate limited by the lookup service")]
    RateLimited,

    /// Anything else: transport failure, malformed response, maintenance.
    #[error("lookup failed: {0}")]
    Failed(String),
}

/// Resolves nicknames against the third-party character database.
#[async_trait]
pub trait CharacterLookup: Send + Sync {
    async fn find(&self, nickname: &str) -> Result<LookupProfile, LookupError>;
}

impl From<LookupProfile> for NewCharacter {
    fn from(profile: LookupProfile) -> Self {
        NewCharacter {
            name: profile.name,
            class_name: profile.class_name,
            server_name: profile.server_name,
            item_level: profile.item_level,
            portrait_source: profile.portrait_source,
            ..Default::default()
        }
    }
}

impl From<LookupProfile> for RefreshProfile {
    fn from(profile: LookupProfile) -> Self {
        RefreshProfile {
            class_name: profile.class_name,
            item_level: profile.item_level,
            server_name: profile.server_name,
            image: profile.portrait_source,
        }
    }
}
