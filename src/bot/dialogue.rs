use crate::core::dialogue::Session;
use std::sync::Arc;
use teloxide::types::{ChatId, UserId};
pub use teloxide::dispatching::dialogue::InMemStorage;

pub type Dialogue = teloxide::dispatching::dialogue::Dialogue<Session, InMemStorage<Session>>;

/// Sessions belong to the sender, not the chat, so people sharing a group
/// never step on each other's half-finished dialogue.
pub fn dialogue_for(storage: Arc<InMemStorage<Session>>, participant: UserId) -> Dialogue {
    Dialogue::new(storage, ChatId::from(participant))
}
