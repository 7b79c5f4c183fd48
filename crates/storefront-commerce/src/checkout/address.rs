//! Customer contact and shipping address types.

use serde::{Deserialize, Serialize};

/// Customer contact details copied onto an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
}

impl Contact {
    /// Get full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A postal shipping address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    /// Address line 1.
    pub line1: String,
    /// Address line 2 (apt, suite, etc.).
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// State/province name.
    pub state_province: String,
    /// Postal/ZIP code.
    pub postal_code: String,
    /// Country name.
    pub country: String,
}

impl Address {
    /// Format as single line, e.g. `"Durbar Marg, Kathmandu, Bagmati 44600, Nepal"`.
    pub fn one_line(&self) -> String {
        let mut out = self.line1.clone();
        if let Some(ref line2) = self.line2 {
            out.push_str(", ");
            out.push_str(line2);
        }
        out.push_str(&format!(
            ", {}, {} {}",
            self.city, self.state_province, self.postal_code
        ));
        if !self.country.is_empty() {
            out.push_str(", ");
            out.push_str(&self.country);
        }
        out
    }
}
