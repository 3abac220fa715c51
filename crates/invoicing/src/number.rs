//! Human-readable invoice numbers (`INV-0001`).

use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use pizzapos_core::{DomainError, ValueObject};

const PREFIX: &str = "INV-";
const MIN_DIGITS: usize = 4;

/// Sequential invoice number, rendered as `INV-` plus the sequence
/// zero-padded to four digits. Sequences past 9999 simply grow wider.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvoiceNumber(u64);

impl ValueObject for InvoiceNumber {}

impl InvoiceNumber {
    pub fn from_sequence(sequence: u64) -> Self {
        Self(sequence)
    }

    pub fn sequence(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{PREFIX}{:0width$}", self.0, width = MIN_DIGITS)
    }
}

impl FromStr for InvoiceNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(PREFIX).ok_or_else(|| {
            DomainError::invalid_id(format!("invoice number must start with {PREFIX}"))
        })?;
        if digits.len() < MIN_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_id(format!(
                "invoice number must be {PREFIX} followed by at least {MIN_DIGITS} digits"
            )));
        }
        let sequence = digits
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("invoice number: {e}")))?;
        Ok(Self(sequence))
    }
}

impl Serialize for InvoiceNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InvoiceNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
