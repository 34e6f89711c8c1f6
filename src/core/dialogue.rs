use crate::core::record::{ClassRecord, FieldSet, Participant};
use crate::infrastructure::registry::{RegistryError, RegistryStore};
use thiserror::Error;

pub const OFFER_LABEL: &str = "🧑‍🏫 Offer a class";
pub const BROWSE_LABEL: &str = "🧑‍🎓 Take a class";
pub const YES_LABEL: &str = "Yes";
pub const NO_LABEL: &str = "No";

const OFFER_PHRASE: &str = "Offer a class";
const BROWSE_PHRASE: &str = "Take a class";

/// Where a chat currently is in the conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Idle,
    Choosing,
    /// `collected` holds the answers so far, so its length is the current step.
    CollectField {
        collected: Vec<String>,
    },
    ShowList,
    /// `index` is 0-based and is checked again against the registry on commit.
    Confirm {
        index: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Start,
    Cancel,
    Text(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyboard {
    Unchanged,
    Menu,
    YesNo,
    Remove,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

/// A class that was just taken, together with who took it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reservation {
    pub record: ClassRecord,
    pub student: Participant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub next: Session,
    pub replies: Vec<Reply>,
    pub reservation: Option<Reservation>,
}

impl Outcome {
    fn reply(next: Session, text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            next,
            replies: vec![Reply::new(text, keyboard)],
            reservation: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{0}' is not a class number")]
    NotANumber(String),
    #[error("Class number {number} is outside 1..={len}")]
    OutOfRange { number: usize, len: usize },
}

/// Turns the 1-based number a student typed into a 0-based index.
pub fn parse_selection(text: &str, len: usize) -> Result<usize, SelectionError> {
    let text = text.trim();
    let number: usize = text
        .parse()
        .map_err(|_| SelectionError::NotANumber(text.to_string()))?;
    if number == 0 || number > len {
        return Err(SelectionError::OutOfRange { number, len });
    }
    Ok(number - 1)
}

pub struct ReservationDialogue<S> {
    store: S,
    fields: FieldSet,
}

impl<S: RegistryStore> ReservationDialogue<S> {
    pub fn new(store: S, fields: FieldSet) -> Self {
        Self { store, fields }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fields(&self) -> FieldSet {
        self.fields
    }

    pub fn handle(&self, session: Session, who: &Participant, input: Input) -> Outcome {
        match input {
            Input::Start => Outcome::reply(
                Session::Choosing,
                "👋 Hi! Please choose one of the options:",
                Keyboard::Menu,
            ),
            Input::Cancel if session == Session::Idle => {
                Outcome::reply(Session::Idle, "ℹ️ There is nothing to cancel.", Keyboard::Remove)
            }
            Input::Cancel => Outcome::reply(
                Session::Idle,
                "Operation cancelled. Send /start whenever you like 🌱",
                Keyboard::Remove,
            ),
            Input::Text(text) => match session {
                Session::Idle => Outcome::reply(
                    Session::Idle,
                    "ℹ️ Send /start to offer or take a class.",
                    Keyboard::Unchanged,
                ),
                Session::Choosing => self.choose(&text),
                Session::CollectField { collected } => self.collect(collected, &text, who),
                Session::ShowList => self.select(&text),
                Session::Confirm { index } => self.confirm(index, &text, who),
            },
        }
    }

    fn choose(&self, text: &str) -> Outcome {
        if text.contains(OFFER_PHRASE) {
            return self.prompt_field(Vec::new());
        }
        if !text.contains(BROWSE_PHRASE) {
            return Outcome::reply(Session::Choosing, "Please use the buttons.", Keyboard::Unchanged);
        }

        let records = self.store.load_all();
        if records.is_empty() {
            return Outcome::reply(
                Session::Idle,
                "No classes have been registered yet 🥲",
                Keyboard::Remove,
            );
        }

        let mut lines = vec!["📚 Available classes:".to_string()];
        lines.extend(
            records
                .iter()
                .enumerate()
                .map(|(i, record)| record.render_listing_line(i + 1, self.fields)),
        );
        lines.push(String::new());
        lines.push("To reserve a class, send its number.".to_string());
        Outcome::reply(Session::ShowList, lines.join("\n"), Keyboard::Remove)
    }

    fn prompt_field(&self, collected: Vec<String>) -> Outcome {
        match self.fields.field(collected.len()) {
            Some(field) => Outcome::reply(
                Session::CollectField { collected },
                field.prompt(),
                Keyboard::Remove,
            ),
            None => Outcome::reply(Session::Idle, "Something went wrong, send /start again.", Keyboard::Remove),
        }
    }

    fn collect(&self, mut collected: Vec<String>, text: &str, teacher: &Participant) -> Outcome {
        collected.push(text.trim().to_string());
        if collected.len() < self.fields.len() {
            return self.prompt_field(collected);
        }

        let record = ClassRecord::from_fields(self.fields.fields(), &collected, teacher);
        match self.store.append(record) {
            Ok(()) => {
                log::info!("Teacher {} registered a new class", teacher.id);
                Outcome::reply(
                    Session::Idle,
                    "✅ The class was registered successfully. Thank you 🙏",
                    Keyboard::Remove,
                )
            }
            Err(e) => {
                log::error!("Failed to save class from teacher {}: {}", teacher.id, e);
                Outcome::reply(
                    Session::Idle,
                    "⚠️ The class could not be saved. Please try again later.",
                    Keyboard::Remove,
                )
            }
        }
    }

    fn select(&self, text: &str) -> Outcome {
        let records = self.store.load_all();
        if records.is_empty() {
            return Outcome::reply(Session::Idle, "No classes are available.", Keyboard::Remove);
        }

        let index = match parse_selection(text, records.len()) {
            Ok(index) => index,
            Err(e) => {
                log::debug!("Rejected selection: {}", e);
                return Outcome::reply(
                    Session::ShowList,
                    "Invalid class number. Please send it again.",
                    Keyboard::Unchanged,
                );
            }
        };

        let summary = format!(
            "You picked this class:\n{}\n\nDo you want this class? ({} / {})",
            records[index].render_summary(self.fields),
            YES_LABEL,
            NO_LABEL
        );
        Outcome::reply(Session::Confirm { index }, summary, Keyboard::YesNo)
    }

    fn confirm(&self, index: usize, text: &str, student: &Participant) -> Outcome {
        match text.trim() {
            NO_LABEL => {
                return Outcome::reply(Session::Idle, "Reservation cancelled.", Keyboard::Remove)
            }
            YES_LABEL => {}
            _ => {
                return Outcome::reply(
                    Session::Confirm { index },
                    "Please choose one of the options.",
                    Keyboard::Unchanged,
                )
            }
        }

        match self.store.remove_at(index) {
            Ok(record) => {
                log::info!(
                    "Student {} reserved a class from teacher {}",
                    student.id,
                    record.teacher_id
                );
                Outcome {
                    next: Session::Idle,
                    replies: vec![Reply::new(
                        "✅ Your class has been reserved successfully.",
                        Keyboard::Remove,
                    )],
                    reservation: Some(Reservation {
                        record,
                        student: student.clone(),
                    }),
                }
            }
            Err(RegistryError::OutOfRange { index, len }) => {
                log::info!("Stale selection {} (registry now holds {})", index, len);
                Outcome::reply(
                    Session::Idle,
                    "😕 This class is no longer available.",
                    Keyboard::Remove,
                )
            }
            Err(e) => {
                log::error!("Failed to reserve class {} for {}: {}", index, student.id, e);
                Outcome::reply(
                    Session::Idle,
                    "⚠️ The reservation could not be completed. Please try again later.",
                    Keyboard::Remove,
                )
            }
        }
    }
}
