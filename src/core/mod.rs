pub mod dialogue;
pub mod notification;
pub mod record;
