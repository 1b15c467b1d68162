//! Request field validation shared by the handlers.
//!
//! Every failure is `InvalidInput` with `details` naming the field, the
//! offending value when there is one, and a snake_case reason code.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::domain::ports::{CardRef, TaskRef};
use crate::domain::{CardStatus, Error, IdError, TaskPriority, TaskStatus};

/// Reason codes reported in validation details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reason {
    MissingField,
    BlankField,
    InvalidUuid,
    InvalidIndex,
    InvalidStatus,
    InvalidPriority,
    InvalidTimestamp,
}

impl Reason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::BlankField => "blank_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidIndex => "invalid_index",
            Self::InvalidStatus => "invalid_status",
            Self::InvalidPriority => "invalid_priority",
            Self::InvalidTimestamp => "invalid_timestamp",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn rejection(field: FieldName, reason: Reason, message: String, value: Option<&str>) -> Error {
    let mut details = json!({ "field": field.as_str(), "code": reason.as_str() });
    if let (Some(value), Some(map)) = (value, details.as_object_mut()) {
        map.insert("value".to_owned(), Value::String(value.to_owned()));
    }
    Error::invalid_input(message).with_details(details)
}

/// Present, non-blank text, trimmed.
pub(crate) fn required_text(
    value: Option<String>,
    field: FieldName,
    label: &str,
) -> Result<String, Error> {
    let Some(raw) = value else {
        return Err(rejection(
            field,
            Reason::MissingField,
            format!("{label} is required"),
            None,
        ));
    };
    non_blank(raw, field, label)
}

/// Replacement text for a patch: absent is fine, blank is not.
pub(crate) fn optional_text(
    value: Option<String>,
    field: FieldName,
    label: &str,
) -> Result<Option<String>, Error> {
    value.map(|raw| non_blank(raw, field, label)).transpose()
}

fn non_blank(raw: String, field: FieldName, label: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(rejection(
            field,
            Reason::BlankField,
            format!("{label} must not be blank"),
            None,
        ));
    }
    Ok(trimmed.to_owned())
}

/// A typed identifier from path or body text.
pub(crate) fn parse_id<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdError>,
{
    raw.parse().map_err(|_| {
        rejection(
            field,
            Reason::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            Some(raw),
        )
    })
}

/// A required identifier from a request body.
pub(crate) fn required_id<T>(raw: Option<&str>, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdError>,
{
    let Some(raw) = raw else {
        return Err(rejection(
            field,
            Reason::MissingField,
            format!("{} is required", field.as_str()),
            None,
        ));
    };
    parse_id(raw, field)
}

/// Insertion index given as a JSON number or a numeric string.
///
/// Accepts integral non-negative values only; `2.0` is integral, `2.5` and
/// `-1` are not.
pub(crate) fn parse_index(value: Option<&Value>, field: FieldName) -> Result<usize, Error> {
    let parsed = match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(integral_f64)),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_f64))
        }
        _ => None,
    };
    parsed
        .and_then(|index| usize::try_from(index).ok())
        .ok_or_else(|| {
            rejection(
                field,
                Reason::InvalidIndex,
                "Invalid index: must be a non-negative integer".to_owned(),
                value.map(ToString::to_string).as_deref(),
            )
        })
}

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_991.0;

fn integral_f64(value: f64) -> Option<u64> {
    let integral = (0.0..=MAX_EXACT_F64).contains(&value) && value.fract() == 0.0;
    integral.then(|| value as u64)
}

fn parse_enum<T: FromStr>(
    raw: &str,
    field: FieldName,
    reason: Reason,
    allowed: &str,
) -> Result<T, Error> {
    raw.parse().map_err(|_| {
        rejection(
            field,
            reason,
            format!("{} must be one of {allowed}", field.as_str()),
            Some(raw),
        )
    })
}

pub(crate) fn parse_card_status(raw: &str, field: FieldName) -> Result<CardStatus, Error> {
    parse_enum(
        raw,
        field,
        Reason::InvalidStatus,
        "icebox, backlog, ongoing, review, done",
    )
}

pub(crate) fn parse_task_status(raw: &str, field: FieldName) -> Result<TaskStatus, Error> {
    parse_enum(raw, field, Reason::InvalidStatus, "todo, in_progress, completed")
}

pub(crate) fn parse_priority(raw: &str, field: FieldName) -> Result<TaskPriority, Error> {
    parse_enum(raw, field, Reason::InvalidPriority, "low, medium, high")
}

pub(crate) fn parse_rfc3339(raw: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            rejection(
                field,
                Reason::InvalidTimestamp,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
                Some(raw),
            )
        })
}

/// Serde helper keeping an explicit `null` apart from an absent field.
///
/// Pair with `#[serde(default)]` so absence yields `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) const BOARD_ID: FieldName = FieldName::new("boardId");
pub(crate) const CARD_ID: FieldName = FieldName::new("id");
pub(crate) const TASK_ID: FieldName = FieldName::new("taskId");

/// Card addressed by `/boards/{boardId}/cards/{id}`.
pub(crate) fn card_ref(board_id: &str, card_id: &str) -> Result<CardRef, Error> {
    Ok(CardRef {
        board_id: parse_id(board_id, BOARD_ID)?,
        card_id: parse_id(card_id, CARD_ID)?,
    })
}

/// Task addressed by `/boards/{boardId}/cards/{id}/tasks/{taskId}`.
pub(crate) fn task_ref(board_id: &str, card_id: &str, task_id: &str) -> Result<TaskRef, Error> {
    Ok(TaskRef {
        card: card_ref(board_id, card_id)?,
        task_id: parse_id(task_id, TASK_ID)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoardId;
    use rstest::rstest;

    const INDEX: FieldName = FieldName::new("index");

    fn reason_of(error: &Error) -> Option<&str> {
        error.details().and_then(|details| details["code"].as_str())
    }

    #[rstest]
    #[case(json!(0), 0)]
    #[case(json!(3), 3)]
    #[case(json!(2.0), 2)]
    #[case(json!("4"), 4)]
    #[case(json!(" 7 "), 7)]
    fn index_accepts_integral_values(#[case] raw: Value, #[case] expected: usize) {
        assert_eq!(parse_index(Some(&raw), INDEX).expect("valid index"), expected);
    }

    #[rstest]
    #[case(json!(-1))]
    #[case(json!(1.5))]
    #[case(json!("abc"))]
    #[case(json!(null))]
    #[case(json!(true))]
    fn index_rejects_other_values(#[case] raw: Value) {
        let error = parse_index(Some(&raw), INDEX).expect_err("invalid index");
        assert_eq!(error.message(), "Invalid index: must be a non-negative integer");
        assert_eq!(reason_of(&error), Some("invalid_index"));
    }

    #[rstest]
    fn missing_index_is_rejected() {
        assert!(parse_index(None, INDEX).is_err());
    }

    #[rstest]
    fn blank_text_is_rejected_and_text_is_trimmed() {
        let name = FieldName::new("name");
        let error = required_text(Some("   ".to_owned()), name, "Card name").expect_err("blank");
        assert_eq!(reason_of(&error), Some("blank_field"));
        let missing = required_text(None, name, "Card name").expect_err("missing");
        assert_eq!(missing.message(), "Card name is required");
        assert_eq!(
            required_text(Some(" Ship it ".to_owned()), name, "Card name").expect("valid"),
            "Ship it"
        );
    }

    #[rstest]
    fn ids_report_the_offending_value() {
        let error = parse_id::<BoardId>("nope", FieldName::new("boardId")).expect_err("bad uuid");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "boardId");
        assert_eq!(details["value"], "nope");
    }

    #[test]
    fn task_ref_names_the_bad_segment() {
        let board = BoardId::random().to_string();
        let card = uuid::Uuid::new_v4().to_string();
        let error = task_ref(&board, &card, "42").expect_err("bad task id");
        assert_eq!(error.details().expect("details")["field"], "taskId");
    }

    #[rstest]
    #[case("done", CardStatus::Done)]
    #[case("icebox", CardStatus::Icebox)]
    fn card_status_parses_lanes(#[case] raw: &str, #[case] expected: CardStatus) {
        assert_eq!(parse_card_status(raw, FieldName::new("status")).expect("lane"), expected);
    }

    #[rstest]
    fn unknown_lane_is_rejected() {
        let error = parse_card_status("archived", FieldName::new("status")).expect_err("bad lane");
        assert_eq!(reason_of(&error), Some("invalid_status"));
    }

    #[rstest]
    fn deadline_requires_rfc3339() {
        let field = FieldName::new("deadline");
        assert!(parse_rfc3339("2026-05-01T12:00:00+02:00", field).is_ok());
        assert!(parse_rfc3339("tomorrow", field).is_err());
    }
}
