//! Contact identifier routing for the submission form.

use tracing::debug;

/// Contact info entered through a single field: values containing `@` are
/// stored as the email, everything else as the phone. Both fields always
/// travel in the submission payload, but at most one is non-empty at a
/// time as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    email: String,
    phone: String,
}

impl ContactInfo {
    /// Empty contact info.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a raw input value. Storing one side clears the other, so
    /// editing a previously entered value replaces it wholesale.
    pub fn set(&mut self, value: &str) {
        if value.contains('@') {
            self.email = value.to_string();
            self.phone = String::new();
        } else {
            self.phone = value.to_string();
            self.email = String::new();
        }

        debug!(
            has_email = !self.email.is_empty(),
            has_phone = !self.phone.is_empty(),
            "Contact info updated"
        );
    }

    /// Email as routed, possibly empty.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Phone as routed, possibly empty.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// At least one identifier present.
    pub fn is_present(&self) -> bool {
        !self.email.is_empty() || !self.phone.is_empty()
    }

    /// Reset both fields.
    pub fn clear(&mut self) {
        self.email.clear();
        self.phone.clear();
    }
}
