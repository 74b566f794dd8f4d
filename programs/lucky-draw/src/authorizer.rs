use std::collections::{HashMap, HashSet};

use anchor_lang::prelude::*;

use crate::errors::RaffleError;
use crate::state::ParticipantId;

/// Identity of the raffle room (the group chat hosting it).
pub type RoomId = String;

/// Operator and membership lookups owned by the chat side.
///
/// Errors are treated exactly like a negative answer by the engine.
pub trait Authorizer: Send + Sync {
    fn is_operator(&self, actor: &ParticipantId, room: &str) -> Result<bool>;

    fn is_member(&self, actor: &ParticipantId, channel: &str) -> Result<bool>;
}

/// Refuse unless `authorizer` confirms `actor` operates `room`.
pub fn require_operator(
    authorizer: &dyn Authorizer,
    actor: &ParticipantId,
    room: &str,
) -> Result<()> {
    match authorizer.is_operator(actor, room) {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::debug!(%actor, room, "operator check refused");
            err!(RaffleError::Unauthorized)
        }
        Err(error) => {
            tracing::warn!(%actor, room, %error, "operator check failed");
            err!(RaffleError::Unauthorized)
        }
    }
}

/// In-memory authorizer with fixed operator and channel member lists.
#[derive(Clone, Debug, Default)]
pub struct StaticAuthorizer {
    operators: HashSet<ParticipantId>,
    members: HashMap<String, HashSet<ParticipantId>>,
}

impl StaticAuthorizer {
    pub fn new<I>(operators: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ParticipantId>,
    {
        Self {
            operators: operators.into_iter().map(Into::into).collect(),
            members: HashMap::new(),
        }
    }

    pub fn with_members<I>(mut self, channel: &str, members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ParticipantId>,
    {
        self.members
            .entry(channel.trim_start_matches('@').to_string())
            .or_default()
            .extend(members.into_iter().map(Into::into));
        self
    }
}

impl Authorizer for StaticAuthorizer {
    fn is_operator(&self, actor: &ParticipantId, _room: &str) -> Result<bool> {
        Ok(self.operators.contains(actor))
    }

    fn is_member(&self, actor: &ParticipantId, channel: &str) -> Result<bool> {
        let members = self
            .members
            .get(channel.trim_start_matches('@'))
            .ok_or(RaffleError::MembershipUnverified)?;
        Ok(members.contains(actor))
    }
}
