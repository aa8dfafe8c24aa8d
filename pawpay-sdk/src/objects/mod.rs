pub mod admin;
pub mod checkout;
pub mod orders;
pub mod payments;

use serde::{Deserialize, Serialize};

/// Currencies accepted for donations.
///
/// Wire format is the uppercase ISO 4217 code. Unknown codes are rejected
/// at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Inr,
    Usd,
    Eur,
    Gbp,
}

/// Donation cadence chosen by the donor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DonationType {
    OneTime,
    Monthly,
}

/// Settlement status of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Pending,
    Failed,
}

/// Minimal `{"success": …}` acknowledgement body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

/// Error envelope returned by the payment API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn currency_uses_uppercase_wire_codes() {
        assert_eq!(serde_json::to_string(&Currency::Inr).unwrap(), r#""INR""#);
        let parsed: Currency = serde_json::from_str(r#""USD""#).unwrap();
        assert_eq!(parsed, Currency::Usd);
        assert!(serde_json::from_str::<Currency>(r#""XYZ""#).is_err());
    }

    #[test]
    fn donation_type_uses_hyphenated_wire_names() {
        assert_eq!(
            serde_json::to_string(&DonationType::OneTime).unwrap(),
            r#""one-time""#
        );
        assert_eq!(
            serde_json::to_string(&DonationType::Monthly).unwrap(),
            r#""monthly""#
        );
    }
}
