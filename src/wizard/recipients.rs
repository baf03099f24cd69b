//! Recipient list editing for the mailing-list step.

use crate::types::Domain;
use crate::validate::{validate_local_part, ValidationError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipientEditor {
    pub addresses: Vec<String>,
    /// Username being typed, not yet added.
    pub input: String,
    pub domain: Domain,
    pub error: Option<ValidationError>,
}

impl RecipientEditor {
    pub fn new(addresses: Vec<String>, domain: Domain) -> Self {
        Self {
            addresses,
            domain,
            ..Default::default()
        }
    }

    /// Add `input` + `domain`. Blank input is ignored; an invalid username
    /// sets the inline error and leaves the list alone. Duplicates are kept.
    /// Returns true when the list changed.
    pub fn add(&mut self) -> bool {
        let local = self.input.trim();
        if local.is_empty() {
            return false;
        }
        if let Err(e) = validate_local_part(&self.input) {
            self.error = Some(e);
            return false;
        }
        let address = format!("{}{}", self.input, self.domain.suffix());
        self.addresses.push(address);
        self.input.clear();
        self.error = None;
        true
    }

    /// Remove one entry equal to `address`; absent addresses are ignored.
    pub fn remove(&mut self, address: &str) -> bool {
        match self.addresses.iter().position(|a| a == address) {
            Some(pos) => {
                self.addresses.remove(pos);
                true
            }
            None => false,
        }
    }
}
