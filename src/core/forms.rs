use crate::core::models::{
    choice::Choice,
    poll::Submit as PollSubmit,
    user::{PasswordChange, Register},
};
use crate::error::Error;
use serde::Serialize;
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const PASSWORDS_DIFFER: &str = "Passwords Not the Same";
pub const EMAIL_TAKEN: &str = "Email Already Registered";
pub const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";
pub const OLD_PASSWORD_INCORRECT: &str = "Your old password was entered incorrectly.";
pub const NEW_PASSWORDS_DIFFER: &str = "The two password fields didn't match.";

pub const COMMENT_MAX_LENGTH: usize = 200;

/// Errors keyed by the form field they belong to.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    /// Folds `validator` failures in, keyed by the failing field.
    pub fn merge(&mut self, errors: ValidationErrors) {
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let message = failure.message.as_ref().map_or_else(|| failure.code.to_string(), |m| m.to_string());
                self.add(&field, message);
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[cfg(test)]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, Error> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(Error::Validation(self))
        }
    }
}

fn required(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED);
        return false;
    }
    true
}

/// `validator` accepts single-label and numeric domains; a registrable
/// address also needs an alphabetic top-level label.
fn has_dotted_domain(email: &str) -> bool {
    let domain = email.rsplit_once('@').map_or("", |(_, d)| d);
    match domain.rsplit_once('.') {
        Some((_, tld)) => tld.starts_with("xn--") || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())),
        None => false,
    }
}

/// The error reported for an address that already has an account.
pub fn email_taken_error() -> Error {
    Error::Validation(FieldErrors::single("email", EMAIL_TAKEN))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRegistration {
    pub email: String,
    pub password: String,
}

pub struct RegisterUserForm {
    data: Register,
}

impl RegisterUserForm {
    pub fn new(mut data: Register) -> Self {
        data.email = data.email.trim().to_owned();
        Self { data }
    }

    pub fn email(&self) -> &str {
        &self.data.email
    }

    /// `email_taken` is looked up by the caller before cleaning. An existing
    /// account is only reported, never touched.
    pub fn clean(self, email_taken: bool) -> Result<CleanedRegistration, Error> {
        let mut errors = FieldErrors::default();
        if required(&mut errors, "email", &self.data.email) {
            if let Err(invalid) = self.data.validate() {
                errors.merge(invalid);
            } else if !has_dotted_domain(&self.data.email) {
                errors.add("email", INVALID_EMAIL);
            }
        }
        let has_p1 = required(&mut errors, "password1", &self.data.password1);
        let has_p2 = required(&mut errors, "password2", &self.data.password2);
        if has_p1 && has_p2 && self.data.password1 != self.data.password2 {
            errors.add("password1", PASSWORDS_DIFFER);
            errors.add("password2", PASSWORDS_DIFFER);
        }
        if email_taken {
            errors.add("email", EMAIL_TAKEN);
        }
        errors.into_result(CleanedRegistration {
            email: self.data.email,
            password: self.data.password1,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedPoll {
    pub choice_id: i32,
    pub comment: String,
}

/// Comment form whose choice field only accepts the choices it was built with.
#[derive(Debug, Serialize)]
pub struct PollForm {
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<PollInitial>,
}

#[derive(Debug, Serialize)]
pub struct PollInitial {
    pub choice: i32,
    pub comment: String,
}

impl PollForm {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self { choices, initial: None }
    }

    pub fn with_initial(mut self, choice: i32, comment: String) -> Self {
        self.initial = Some(PollInitial { choice, comment });
        self
    }

    pub fn allows(&self, choice_id: i32) -> bool {
        self.choices.iter().any(|c| c.id == choice_id)
    }

    pub fn clean(&self, submit: PollSubmit) -> Result<CleanedPoll, Error> {
        let mut errors = FieldErrors::default();
        let raw_choice = submit.choice.unwrap_or_default();
        let mut choice_id = 0;
        if required(&mut errors, "choice", &raw_choice) {
            match raw_choice.trim().parse::<i32>() {
                Ok(id) if self.allows(id) => choice_id = id,
                _ => errors.add("choice", INVALID_CHOICE),
            }
        }
        let comment = submit.comment.unwrap_or_default().trim().to_owned();
        if required(&mut errors, "comment", &comment) && comment.chars().count() > COMMENT_MAX_LENGTH {
            errors.add(
                "comment",
                format!("Ensure this value has at most {} characters (it has {}).", COMMENT_MAX_LENGTH, comment.chars().count()),
            );
        }
        errors.into_result(CleanedPoll { choice_id, comment })
    }
}

pub struct PasswordChangeForm {
    data: PasswordChange,
}

impl PasswordChangeForm {
    pub fn new(data: PasswordChange) -> Self {
        Self { data }
    }

    pub fn old_password(&self) -> &str {
        &self.data.old_password
    }

    pub fn clean(self, old_password_matches: bool) -> Result<String, Error> {
        let mut errors = FieldErrors::default();
        if required(&mut errors, "old_password", &self.data.old_password) && !old_password_matches {
            errors.add("old_password", OLD_PASSWORD_INCORRECT);
        }
        let has_p1 = required(&mut errors, "new_password1", &self.data.new_password1);
        let has_p2 = required(&mut errors, "new_password2", &self.data.new_password2);
        if has_p1 && has_p2 && self.data.new_password1 != self.data.new_password2 {
            errors.add("new_password2", NEW_PASSWORDS_DIFFER);
        }
        errors.into_result(self.data.new_password1)
    }
}
