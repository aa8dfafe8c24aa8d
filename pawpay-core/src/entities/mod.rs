pub mod donation_records;
pub mod failure_records;
pub mod order_records;

use pawpay_sdk::objects::{
    Currency as SdkCurrency, DonationType as SdkDonationType, PaymentStatus as SdkPaymentStatus,
};

/// Currency code for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `pawpay_sdk::objects::Currency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "currency_code")]
pub enum CurrencyCode {
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl From<CurrencyCode> for SdkCurrency {
    fn from(value: CurrencyCode) -> Self {
        match value {
            CurrencyCode::Inr => SdkCurrency::Inr,
            CurrencyCode::Usd => SdkCurrency::Usd,
            CurrencyCode::Eur => SdkCurrency::Eur,
            CurrencyCode::Gbp => SdkCurrency::Gbp,
        }
    }
}

impl From<SdkCurrency> for CurrencyCode {
    fn from(value: SdkCurrency) -> Self {
        match value {
            SdkCurrency::Inr => CurrencyCode::Inr,
            SdkCurrency::Usd => CurrencyCode::Usd,
            SdkCurrency::Eur => CurrencyCode::Eur,
            SdkCurrency::Gbp => CurrencyCode::Gbp,
        }
    }
}

/// Donation cadence for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `pawpay_sdk::objects::DonationType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "donation_kind")]
pub enum DonationKind {
    OneTime,
    Monthly,
}

impl From<DonationKind> for SdkDonationType {
    fn from(value: DonationKind) -> Self {
        match value {
            DonationKind::OneTime => SdkDonationType::OneTime,
            DonationKind::Monthly => SdkDonationType::Monthly,
        }
    }
}

impl From<SdkDonationType> for DonationKind {
    fn from(value: SdkDonationType) -> Self {
        match value {
            SdkDonationType::OneTime => DonationKind::OneTime,
            SdkDonationType::Monthly => DonationKind::Monthly,
        }
    }
}

/// Payment settlement state for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `pawpay_sdk::objects::PaymentStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "payment_state")]
pub enum PaymentState {
    Success,
    Pending,
    Failed,
}

impl From<PaymentState> for SdkPaymentStatus {
    fn from(value: PaymentState) -> Self {
        match value {
            PaymentState::Success => SdkPaymentStatus::Success,
            PaymentState::Pending => SdkPaymentStatus::Pending,
            PaymentState::Failed => SdkPaymentStatus::Failed,
        }
    }
}

impl From<SdkPaymentStatus> for PaymentState {
    fn from(value: SdkPaymentStatus) -> Self {
        match value {
            SdkPaymentStatus::Success => PaymentState::Success,
            SdkPaymentStatus::Pending => PaymentState::Pending,
            SdkPaymentStatus::Failed => PaymentState::Failed,
        }
    }
}
