//! Member submission schema
//!
//! `MemberSubmission::from_json` is the only way to build a submission from
//! client input. Fields are checked in declaration order and each field
//! reports at most one error, so the error list is deterministic.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde_json::{Map, Value};
use sqlx::FromRow;

use super::validation::{FieldError, FieldErrorKind, ValidationErrors};
use super::EmailAddress;

/// Calendar date format for `dob`, `date_of_joining` and `end_of_membership`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Naive timestamp layouts accepted for `submitted_at` (read as UTC)
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Fractional-second digits kept on `submitted_at` (TIMESTAMPTZ precision)
const TIMESTAMP_SUBSEC_DIGITS: u16 = 6;

/// A validated registration, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSubmission {
    pub name: String,
    pub dob: NaiveDate,
    pub age: i32,
    pub date_of_joining: NaiveDate,
    pub height: f64,
    pub weight: f64,
    pub occupation: String,
    pub address: String,
    pub email: EmailAddress,
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub looking_for: String,
    pub membership_mode: String,
    pub end_of_membership: NaiveDate,
    pub physical_problems: String,
    pub physical_description: Option<String>,
    pub fractures: String,
    pub fracture_description: Option<String>,
    pub agreed_to_terms: bool,
    /// Base64-encoded image
    pub photo: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl MemberSubmission {
    /// Validate an untyped JSON payload.
    ///
    /// Returns every field error found, never a partially built record.
    /// Unknown keys (including a client-supplied `id`) are ignored.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let obj = payload
            .as_object()
            .ok_or_else(|| ValidationErrors::single("$root", FieldErrorKind::TypeMismatch))?;

        let mut r = FieldReader::new(obj);

        let name = r.text("name");
        let dob = r.date("dob");
        let age = r.non_negative_int("age");
        let date_of_joining = r.date("date_of_joining");
        let height = r.non_negative_float("height");
        let weight = r.non_negative_float("weight");
        let occupation = r.text("occupation");
        let address = r.text("address");
        let email = r.email("email");
        let phone = r.text("phone");
        let alternate_phone = r.optional_text("alternate_phone");
        let looking_for = r.text("looking_for");
        let membership_mode = r.text("membership_mode");
        let end_of_membership = r.date("end_of_membership");
        let physical_problems = r.text("physical_problems");
        let physical_description = r.optional_text("physicalDescription");
        let fractures = r.text("fractures");
        let fracture_description = r.optional_text("fractureDescription");
        let agreed_to_terms = r.boolean("agreed_to_terms");
        let photo = r.optional_text("photo");
        let submitted_at = r.timestamp("submitted_at");

        // Every `None` below was recorded as an error by the reader.
        let (
            Some(name),
            Some(dob),
            Some(age),
            Some(date_of_joining),
            Some(height),
            Some(weight),
            Some(occupation),
            Some(address),
            Some(email),
            Some(phone),
            Some(alternate_phone),
            Some(looking_for),
            Some(membership_mode),
            Some(end_of_membership),
            Some(physical_problems),
            Some(physical_description),
            Some(fractures),
            Some(fracture_description),
            Some(agreed_to_terms),
            Some(photo),
            Some(submitted_at),
        ) = (
            name,
            dob,
            age,
            date_of_joining,
            height,
            weight,
            occupation,
            address,
            email,
            phone,
            alternate_phone,
            looking_for,
            membership_mode,
            end_of_membership,
            physical_problems,
            physical_description,
            fractures,
            fracture_description,
            agreed_to_terms,
            photo,
            submitted_at,
        )
        else {
            return Err(r.into_errors());
        };

        Ok(Self {
            name,
            dob,
            age,
            date_of_joining,
            height,
            weight,
            occupation,
            address,
            email,
            phone,
            alternate_phone,
            looking_for,
            membership_mode,
            end_of_membership,
            physical_problems,
            physical_description,
            fractures,
            fracture_description,
            agreed_to_terms,
            photo,
            submitted_at,
        })
    }
}

/// A persisted member row
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub dob: NaiveDate,
    pub age: i32,
    pub date_of_joining: NaiveDate,
    pub height: f64,
    pub weight: f64,
    pub occupation: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub looking_for: String,
    pub membership_mode: String,
    pub end_of_membership: NaiveDate,
    pub physical_problems: String,
    pub physical_description: Option<String>,
    pub fractures: String,
    pub fracture_description: Option<String>,
    pub agreed_to_terms: bool,
    pub photo: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Member {
    /// Attach a store-assigned id to a validated submission.
    pub fn from_submission(id: i64, s: MemberSubmission) -> Self {
        Self {
            id,
            name: s.name,
            dob: s.dob,
            age: s.age,
            date_of_joining: s.date_of_joining,
            height: s.height,
            weight: s.weight,
            occupation: s.occupation,
            address: s.address,
            email: s.email.into_string(),
            phone: s.phone,
            alternate_phone: s.alternate_phone,
            looking_for: s.looking_for,
            membership_mode: s.membership_mode,
            end_of_membership: s.end_of_membership,
            physical_problems: s.physical_problems,
            physical_description: s.physical_description,
            fractures: s.fractures,
            fracture_description: s.fracture_description,
            agreed_to_terms: s.agreed_to_terms,
            photo: s.photo,
            submitted_at: s.submitted_at,
        }
    }
}

/// Reads typed fields out of a JSON object, recording one error per bad field.
///
/// Every method returns `None` exactly when it pushed an error.
struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            errors: Vec::new(),
        }
    }

    fn into_errors(self) -> ValidationErrors {
        ValidationErrors::new(self.errors)
    }

    fn fail<T>(&mut self, field: &'static str, kind: FieldErrorKind) -> Option<T> {
        self.errors.push(FieldError::new(field, kind));
        None
    }

    /// Present, non-null value or a `Missing` error
    fn required(&mut self, field: &'static str) -> Option<&'a Value> {
        let obj = self.obj;
        match obj.get(field) {
            None | Some(Value::Null) => self.fail(field, FieldErrorKind::Missing),
            Some(v) => Some(v),
        }
    }

    fn text(&mut self, field: &'static str) -> Option<String> {
        let value = self.required(field)?;
        match value.as_str() {
            Some(s) if s.contains('\0') => self.fail(field, FieldErrorKind::InvalidText),
            Some(s) => Some(s.to_owned()),
            None => self.fail(field, FieldErrorKind::TypeMismatch),
        }
    }

    /// Outer `None` means error; inner `None` means absent or null.
    fn optional_text(&mut self, field: &'static str) -> Option<Option<String>> {
        let obj = self.obj;
        match obj.get(field) {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(s)) if s.contains('\0') => {
                self.fail(field, FieldErrorKind::InvalidText)
            }
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => self.fail(field, FieldErrorKind::TypeMismatch),
        }
    }

    fn boolean(&mut self, field: &'static str) -> Option<bool> {
        let value = self.required(field)?;
        match value.as_bool() {
            Some(b) => Some(b),
            None => self.fail(field, FieldErrorKind::TypeMismatch),
        }
    }

    fn non_negative_int(&mut self, field: &'static str) -> Option<i32> {
        let value = self.required(field)?;
        let Some(n) = whole_number(value) else {
            return self.fail(field, FieldErrorKind::TypeMismatch);
        };
        if n < 0 {
            return self.fail(field, FieldErrorKind::ConstraintViolation);
        }
        match i32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => self.fail(field, FieldErrorKind::TypeMismatch),
        }
    }

    fn non_negative_float(&mut self, field: &'static str) -> Option<f64> {
        let value = self.required(field)?;
        let Some(n) = finite_number(value) else {
            return self.fail(field, FieldErrorKind::TypeMismatch);
        };
        if n < 0.0 {
            return self.fail(field, FieldErrorKind::ConstraintViolation);
        }
        Some(n)
    }

    fn email(&mut self, field: &'static str) -> Option<EmailAddress> {
        let raw = self.text(field)?;
        match EmailAddress::parse(&raw) {
            Some(email) => Some(email),
            None => self.fail(field, FieldErrorKind::InvalidEmail),
        }
    }

    fn date(&mut self, field: &'static str) -> Option<NaiveDate> {
        let raw = self.text(field)?;
        match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => self.fail(field, FieldErrorKind::InvalidDate),
        }
    }

    fn timestamp(&mut self, field: &'static str) -> Option<DateTime<Utc>> {
        let raw = self.text(field)?;
        match parse_timestamp(&raw) {
            Some(ts) => Some(ts),
            None => self.fail(field, FieldErrorKind::InvalidDate),
        }
    }
}

/// JSON integer, integral float (`30.0`) or a string holding an integer.
///
/// Floats beyond `i64` saturate and are caught by the caller's range check.
fn whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Any JSON number, or a string holding a finite decimal.
fn finite_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// RFC 3339 with offset, or a naive timestamp taken as UTC. Truncated to
/// microseconds.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let ts = match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(_) => NAIVE_TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?
            .and_utc(),
    };
    Some(ts.trunc_subsecs(TIMESTAMP_SUBSEC_DIGITS))
}
