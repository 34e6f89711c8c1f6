use crate::core::dialogue::{Keyboard, BROWSE_LABEL, NO_LABEL, OFFER_LABEL, YES_LABEL};
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(OFFER_LABEL),
        KeyboardButton::new(BROWSE_LABEL),
    ]])
}

pub fn confirm_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(YES_LABEL),
        KeyboardButton::new(NO_LABEL),
    ]])
}

/// `None` leaves whatever keyboard the user already has in place.
pub fn reply_markup(keyboard: Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::Unchanged => None,
        Keyboard::Menu => Some(main_menu().into()),
        Keyboard::YesNo => Some(confirm_menu().into()),
        Keyboard::Remove => Some(KeyboardRemove::new().into()),
    }
}
