//! Declarative form validation.
//!
//! A [`Ruleset`] lists the rules for each form field. Validating a form runs
//! every rule that needs no I/O and returns a [`Validation`] holding the
//! messages so far plus the foreign-key [`ExistsCheck`]s that still need a
//! database lookup. Callers resolve those with [`Validation::finish`].
//!
//! ```
//! use apola_core::validation::{Lookup, Rule, Ruleset};
//!
//! let rules = Ruleset::new()
//!     .field("title", &[Rule::Required, Rule::Min(5)])
//!     .field("price", &[Rule::Required, Rule::Numeric])
//!     .field("category_id", &[Rule::Required, Rule::Exists(Lookup::Category)]);
//!
//! let input = [("title", "Kaos"), ("price", "abc"), ("category_id", "3")];
//! let validation = rules.validate(&input[..]);
//!
//! assert_eq!(
//!     validation.errors().first("title"),
//!     Some("The title field must be at least 5 characters.")
//! );
//! assert_eq!(validation.errors().first("price"), Some("The price field must be a number."));
//! assert_eq!(validation.pending().len(), 1);
//! ```

use std::collections::HashMap;
use std::future::Future;

use serde::Serialize;

use crate::storage::extension_for;
use crate::types::{decimal_digits, is_numeric};

/// Tables that `exists` rules can check against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// `categories.id`
    Category,
    /// `rajaongkir_provinces.id`
    Province,
    /// `rajaongkir_cities.id`
    City,
}

impl Lookup {
    /// Name of the table holding the referenced rows.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Province => "rajaongkir_provinces",
            Self::City => "rajaongkir_cities",
        }
    }
}

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not blank.
    Required,
    /// At least this many characters.
    Min(usize),
    /// Parses as a decimal number.
    Numeric,
    /// Whole number without fraction or exponent that fits in 32 bits.
    Integer,
    /// Fits a `NUMERIC(precision, scale)` column. Non-numbers are left to
    /// [`Rule::Numeric`].
    Decimal {
        /// Total significant digits.
        precision: u64,
        /// Digits after the decimal point.
        scale: u64,
    },
    /// Content type of an uploaded raster image.
    Image,
    /// Positive integer id of an existing row.
    Exists(Lookup),
}

impl Rule {
    /// Whether the rule also runs for empty values.
    const fn is_implicit(self) -> bool {
        matches!(self, Self::Required)
    }
}

/// Source of submitted form values.
pub trait FormInput {
    /// The submitted value of `field`, if any.
    fn value(&self, field: &str) -> Option<&str>;
}

impl FormInput for [(&str, &str)] {
    fn value(&self, field: &str) -> Option<&str> {
        self.iter().find(|(name, _)| *name == field).map(|(_, v)| *v)
    }
}

impl FormInput for HashMap<String, String> {
    fn value(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

/// Ordered per-field validation rules.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl Ruleset {
    /// An empty ruleset.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add the rules for `name`.
    #[must_use]
    pub fn field(mut self, name: &'static str, rules: &[Rule]) -> Self {
        self.fields.push((name, rules.to_vec()));
        self
    }

    /// The rules registered for `name`.
    #[must_use]
    pub fn rules_for(&self, name: &str) -> Option<&[Rule]> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, rules)| rules.as_slice())
    }

    /// Run every rule that needs no I/O.
    ///
    /// Values are trimmed first. Blank values only run implicit rules
    /// (`Required`); every failing rule of a field is reported.
    pub fn validate<I: FormInput + ?Sized>(&self, input: &I) -> Validation {
        let mut validation = Validation::default();

        for (field, rules) in self.fields.iter().map(|(f, r)| (*f, r)) {
            let value = input.value(field).map_or("", str::trim);

            for rule in rules {
                if value.is_empty() && !rule.is_implicit() {
                    continue;
                }

                match *rule {
                    Rule::Required => {
                        if value.is_empty() {
                            validation
                                .errors
                                .add(field, format!("The {} field is required.", attr(field)));
                        }
                    }
                    Rule::Min(min) => {
                        if value.chars().count() < min {
                            validation.errors.add(
                                field,
                                format!(
                                    "The {} field must be at least {min} characters.",
                                    attr(field)
                                ),
                            );
                        }
                    }
                    Rule::Numeric => {
                        if !is_numeric(value) {
                            validation
                                .errors
                                .add(field, format!("The {} field must be a number.", attr(field)));
                        }
                    }
                    Rule::Integer => {
                        if value.parse::<i32>().is_err() {
                            validation.errors.add(
                                field,
                                format!("The {} field must be an integer.", attr(field)),
                            );
                        }
                    }
                    Rule::Decimal { precision, scale } => {
                        let Some(digits) = decimal_digits(value) else {
                            continue;
                        };
                        let before = precision.saturating_sub(scale);
                        if digits.integer > before {
                            validation.errors.add(
                                field,
                                format!(
                                    "The {} field must not have more than {before} digits before the decimal point.",
                                    attr(field)
                                ),
                            );
                        }
                        if digits.fraction > scale {
                            validation.errors.add(
                                field,
                                format!(
                                    "The {} field must not have more than {scale} decimal places.",
                                    attr(field)
                                ),
                            );
                        }
                    }
                    Rule::Image => {
                        if extension_for(value).is_none() {
                            validation
                                .errors
                                .add(field, format!("The {} field must be an image.", attr(field)));
                        }
                    }
                    Rule::Exists(lookup) => match value.parse::<i32>() {
                        Ok(id) if id > 0 => validation.pending.push(ExistsCheck {
                            field,
                            lookup,
                            id,
                        }),
                        _ => validation.errors.add(field, exists_message(field)),
                    },
                }
            }
        }

        validation
    }
}

/// A foreign-key lookup deferred to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistsCheck {
    /// Field the id came from.
    pub field: &'static str,
    /// Table to look in.
    pub lookup: Lookup,
    /// The submitted id.
    pub id: i32,
}

/// Outcome of the synchronous validation pass.
#[derive(Debug, Default)]
#[must_use]
pub struct Validation {
    errors: ValidationErrors,
    pending: Vec<ExistsCheck>,
}

impl Validation {
    /// Messages collected so far.
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Lookups still to resolve.
    pub fn pending(&self) -> &[ExistsCheck] {
        &self.pending
    }

    /// Resolve the pending lookups with `exists` and produce the final result.
    ///
    /// The outer `Result` carries lookup failures (e.g. database errors); the
    /// inner one carries the validation verdict.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `exists`.
    pub async fn finish<F, Fut, E>(mut self, mut exists: F) -> Result<Result<(), ValidationErrors>, E>
    where
        F: FnMut(Lookup, i32) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        let pending = std::mem::take(&mut self.pending);
        for check in pending {
            let found = exists(check.lookup, check.id).await?;
            self.resolve(check, found);
        }

        Ok(self.into_result())
    }

    /// Record the outcome of one deferred lookup.
    pub fn resolve(&mut self, check: ExistsCheck, exists: bool) {
        self.pending.retain(|c| *c != check);
        if !exists {
            self.errors.add(check.field, exists_message(check.field));
        }
    }

    /// Final verdict. Unresolved lookups are ignored.
    ///
    /// # Errors
    ///
    /// Returns the collected messages when any field failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

/// Field-level validation messages, in ruleset order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{} field(s) failed validation", .fields.len())]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    /// Record a message for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        if let Some((_, messages)) = self.fields.iter_mut().find(|(name, _)| name == field) {
            messages.push(message);
        } else {
            self.fields.push((field.to_owned(), vec![message]));
        }
    }

    /// First message for `field`.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// All messages for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map_or(&[], |(_, messages)| messages.as_slice())
    }

    /// Whether `field` has any message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over failing fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// `Ok` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when any field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Human-readable attribute name.
fn attr(field: &str) -> String {
    field.replace('_', " ")
}

fn exists_message(field: &str) -> String {
    format!("The selected {} is invalid.", attr(field))
}
