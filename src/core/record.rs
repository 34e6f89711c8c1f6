use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const UNKNOWN: &str = "unknown";
pub const NONE: &str = "none";

/// Someone talking to the bot, identified the way Telegram identifies users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: u64,
    pub username: Option<String>,
}

impl Participant {
    pub fn handle(&self) -> String {
        display_handle(self.username.as_deref())
    }
}

fn display_handle(username: Option<&str>) -> String {
    match username {
        Some(name) if !name.is_empty() => format!("@{}", name),
        _ => NONE.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub price: String,
    /// Only ever shown to the admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter: Option<String>,
    pub teacher_id: u64,
    pub teacher_username: Option<String>,
}

impl ClassRecord {
    /// Builds a record from values collected in `fields` order.
    pub fn from_fields(fields: &[Field], values: &[String], teacher: &Participant) -> Self {
        let mut record = ClassRecord {
            subject: None,
            day: String::new(),
            time: String::new(),
            duration: None,
            price: String::new(),
            counter: None,
            teacher_id: teacher.id,
            teacher_username: teacher.username.clone(),
        };
        for (field, value) in fields.iter().zip(values) {
            let value = value.clone();
            match field {
                Field::Subject => record.subject = Some(value),
                Field::Day => record.day = value,
                Field::Time => record.time = value,
                Field::Duration => record.duration = Some(value),
                Field::Price => record.price = value,
                Field::Counter => record.counter = Some(value),
            }
        }
        record
    }

    pub fn value_of(&self, field: Field) -> &str {
        let value = match field {
            Field::Subject => self.subject.as_deref(),
            Field::Day => Some(self.day.as_str()),
            Field::Time => Some(self.time.as_str()),
            Field::Duration => self.duration.as_deref(),
            Field::Price => Some(self.price.as_str()),
            Field::Counter => self.counter.as_deref(),
        };
        match value {
            Some(v) if !v.is_empty() => v,
            _ => UNKNOWN,
        }
    }

    pub fn teacher_handle(&self) -> String {
        display_handle(self.teacher_username.as_deref())
    }

    /// One line of the student-facing listing, `index` is 1-based.
    pub fn render_listing_line(&self, index: usize, fields: FieldSet) -> String {
        let parts: Vec<String> = fields
            .public_fields()
            .map(|field| format!("{}: {}", field.label(), self.value_of(field)))
            .collect();
        format!("{}. {}", index, parts.join(" | "))
    }

    pub fn render_summary(&self, fields: FieldSet) -> String {
        fields
            .public_fields()
            .map(|field| format!("{}: {}", field.label(), self.value_of(field)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Subject,
    Day,
    Time,
    Duration,
    Price,
    Counter,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Subject => "Subject",
            Field::Day => "Day",
            Field::Time => "Time",
            Field::Duration => "Duration",
            Field::Price => "Price",
            Field::Counter => "Counter",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Field::Subject => "📘 Enter the subject of the class:",
            Field::Day => "📅 Enter the day of the class (e.g. Saturday, Monday, ...):",
            Field::Time => "🕕 Enter the time of the class (e.g. 18:00):",
            Field::Duration => "⏱️ Enter the duration of the class (e.g. 90 minutes):",
            Field::Price => "💰 Enter the price of the class (e.g. 150):",
            Field::Counter => "🔢 Enter the counter for this class (only the admin sees this):",
        }
    }

    pub fn is_admin_only(self) -> bool {
        matches!(self, Field::Counter)
    }
}

/// Which fields a teacher is asked for, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldSet {
    Basic,
    #[default]
    Extended,
}

const BASIC_FIELDS: &[Field] = &[Field::Day, Field::Time, Field::Price];
const EXTENDED_FIELDS: &[Field] = &[
    Field::Subject,
    Field::Day,
    Field::Time,
    Field::Duration,
    Field::Price,
    Field::Counter,
];

impl FieldSet {
    pub fn fields(self) -> &'static [Field] {
        match self {
            FieldSet::Basic => BASIC_FIELDS,
            FieldSet::Extended => EXTENDED_FIELDS,
        }
    }

    pub fn len(self) -> usize {
        self.fields().len()
    }

    pub fn field(self, step: usize) -> Option<Field> {
        self.fields().get(step).copied()
    }

    pub fn public_fields(self) -> impl Iterator<Item = Field> {
        self.fields().iter().copied().filter(|f| !f.is_admin_only())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown field set '{0}', expected 'basic' or 'extended'")]
pub struct UnknownFieldSet(pub String);

impl FromStr for FieldSet {
    type Err = UnknownFieldSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(FieldSet::Basic),
            "extended" => Ok(FieldSet::Extended),
            _ => Err(UnknownFieldSet(s.to_string())),
        }
    }
}
