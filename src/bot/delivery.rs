use crate::bot::ui::reply_markup;
use crate::core::dialogue::{Keyboard, Reply, Reservation};
use crate::core::notification::render_admin_notice;
use crate::core::record::FieldSet;
use teloxide::prelude::*;

/// One outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Keyboard,
}

pub fn admin_notice(
    admin_chat: Option<ChatId>,
    reservation: &Reservation,
    fields: FieldSet,
) -> Option<Delivery> {
    let Some(chat_id) = admin_chat else {
        log::debug!("No admin chat configured, skipping reservation notice.");
        return None;
    };
    Some(Delivery {
        chat_id,
        text: render_admin_notice(reservation, fields),
        keyboard: Keyboard::Unchanged,
    })
}

/// Orders what a dialogue step sends. The admin notice leads because the
/// reservation is already committed by the time anything is sent.
pub fn plan(
    chat_id: ChatId,
    replies: Vec<Reply>,
    reservation: Option<&Reservation>,
    admin_chat: Option<ChatId>,
    fields: FieldSet,
) -> Vec<Delivery> {
    let notice = reservation.and_then(|r| admin_notice(admin_chat, r, fields));
    notice
        .into_iter()
        .chain(replies.into_iter().map(|reply| Delivery {
            chat_id,
            text: reply.text,
            keyboard: reply.keyboard,
        }))
        .collect()
}

/// Sends everything in order. A failed message is logged and skipped.
pub async fn send_all(bot: &Bot, deliveries: Vec<Delivery>) {
    for delivery in deliveries {
        let chat_id = delivery.chat_id;
        let mut request = bot.send_message(chat_id, delivery.text);
        if let Some(markup) = reply_markup(delivery.keyboard) {
            request = request.reply_markup(markup);
        }
        if let Err(e) = request.await {
            log::error!("Failed to send message to chat {}: {:?}", chat_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{ClassRecord, Participant};

    const STUDENT_CHAT: ChatId = ChatId(22);
    const ADMIN_CHAT: ChatId = ChatId(-100500);

    fn reservation() -> Reservation {
        let values: Vec<String> = ["Monday", "18:00", "150"].iter().map(|v| v.to_string()).collect();
        let teacher = Participant {
            id: 11,
            username: None,
        };
        Reservation {
            record: ClassRecord::from_fields(FieldSet::Basic.fields(), &values, &teacher),
            student: Participant {
                id: 22,
                username: None,
            },
        }
    }

    fn confirmation() -> Vec<Reply> {
        vec![Reply {
            text: "✅ Your class has been reserved successfully.".to_string(),
            keyboard: Keyboard::Remove,
        }]
    }

    #[test]
    fn admin_notice_is_sent_before_student_reply() {
        let r = reservation();
        let deliveries = plan(STUDENT_CHAT, confirmation(), Some(&r), Some(ADMIN_CHAT), FieldSet::Basic);

        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].chat_id, ADMIN_CHAT);
        assert!(deliveries[0].text.starts_with("📌 New class reservation:"));
        assert_eq!(deliveries[0].keyboard, Keyboard::Unchanged);
        assert_eq!(deliveries[1].chat_id, STUDENT_CHAT);
        assert_eq!(deliveries[1].keyboard, Keyboard::Remove);
    }

    #[test]
    fn without_admin_chat_only_the_student_hears_back() {
        let r = reservation();
        assert_eq!(admin_notice(None, &r, FieldSet::Basic), None);

        let deliveries = plan(STUDENT_CHAT, confirmation(), Some(&r), None, FieldSet::Basic);
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].chat_id, STUDENT_CHAT);
    }

    #[test]
    fn no_notice_without_a_reservation() {
        let deliveries = plan(STUDENT_CHAT, confirmation(), None, Some(ADMIN_CHAT), FieldSet::Basic);
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].chat_id, STUDENT_CHAT);
    }
}
