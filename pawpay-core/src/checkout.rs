//! Checkout session state machine.
//!
//! One session per order walks
//! `choosing method → collecting details → ready → processing → closed`.
//! A rejected transition never mutates the session, and `begin_processing`
//! is a one-shot guard so each order gets at most one authorization draw at
//! a time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use compact_str::CompactString;
use pawpay_sdk::objects::checkout::{PaymentDetails, PaymentMethod, SessionStage};
use tokio::sync::RwLock;

use crate::entities::CurrencyCode;

/// Errors produced by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("invalid payment details: {0}")]
    InvalidDetails(&'static str),
    #[error("payment method not selected")]
    MethodNotSelected,
    #[error("details do not match the selected method")]
    MethodMismatch,
    #[error("selected method does not take details")]
    DetailsNotRequired,
    #[error("payment details incomplete")]
    NotReadyToProcess,
    #[error("payment already processing")]
    AlreadyProcessing,
    #[error("session closed")]
    SessionClosed,
}

/// Where a session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStage {
    ChoosingMethod,
    CollectingDetails {
        method: PaymentMethod,
    },
    /// Net-banking reaches this stage with `details: None`; card and UPI
    /// carry their validated details here.
    ReadyToProcess {
        method: PaymentMethod,
        details: Option<PaymentDetails>,
    },
    Processing,
    Succeeded {
        payment_id: CompactString,
    },
    Failed {
        reason: CompactString,
    },
}

impl CheckoutStage {
    /// The method selected so far, if any.
    pub fn method(&self) -> Option<PaymentMethod> {
        match self {
            CheckoutStage::CollectingDetails { method }
            | CheckoutStage::ReadyToProcess { method, .. } => Some(*method),
            _ => None,
        }
    }
}

impl From<&CheckoutStage> for SessionStage {
    fn from(value: &CheckoutStage) -> Self {
        match value {
            CheckoutStage::ChoosingMethod => SessionStage::ChoosingMethod,
            CheckoutStage::CollectingDetails { .. } => SessionStage::CollectingDetails,
            CheckoutStage::ReadyToProcess { .. } => SessionStage::ReadyToProcess,
            CheckoutStage::Processing => SessionStage::Processing,
            CheckoutStage::Succeeded { .. } => SessionStage::Succeeded,
            CheckoutStage::Failed { .. } => SessionStage::Failed,
        }
    }
}

// ---------------------------------------------------------------------------
// CheckoutSession
// ---------------------------------------------------------------------------

/// A live checkout dialog for one order.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub order_id: CompactString,
    pub amount: i64,
    pub currency: CurrencyCode,
    pub stage: CheckoutStage,
    last_touched: Instant,
}

impl CheckoutSession {
    pub fn new(order_id: CompactString, amount: i64, currency: CurrencyCode) -> Self {
        Self {
            order_id,
            amount,
            currency,
            stage: CheckoutStage::ChoosingMethod,
            last_touched: Instant::now(),
        }
    }

    /// Select (or re-select) a payment method.
    ///
    /// Net-banking needs no details and goes straight to ready;
    /// re-selecting discards any previously collected details.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        match &self.stage {
            CheckoutStage::ChoosingMethod
            | CheckoutStage::CollectingDetails { .. }
            | CheckoutStage::ReadyToProcess { .. } => {
                self.stage = match method {
                    PaymentMethod::Netbanking => CheckoutStage::ReadyToProcess {
                        method,
                        details: None,
                    },
                    PaymentMethod::Card | PaymentMethod::Upi => {
                        CheckoutStage::CollectingDetails { method }
                    }
                };
                Ok(())
            }
            CheckoutStage::Processing => Err(CheckoutError::AlreadyProcessing),
            CheckoutStage::Succeeded { .. } | CheckoutStage::Failed { .. } => {
                Err(CheckoutError::SessionClosed)
            }
        }
    }

    /// Submit instrument details for the selected method.
    ///
    /// Re-submitting while ready overwrites the previous details.
    pub fn submit_details(&mut self, details: PaymentDetails) -> Result<(), CheckoutError> {
        let method = match &self.stage {
            CheckoutStage::ChoosingMethod => return Err(CheckoutError::MethodNotSelected),
            CheckoutStage::CollectingDetails { method } => *method,
            CheckoutStage::ReadyToProcess {
                method,
                details: Some(_),
            } => *method,
            CheckoutStage::ReadyToProcess { details: None, .. } => {
                return Err(CheckoutError::DetailsNotRequired);
            }
            CheckoutStage::Processing => return Err(CheckoutError::AlreadyProcessing),
            CheckoutStage::Succeeded { .. } | CheckoutStage::Failed { .. } => {
                return Err(CheckoutError::SessionClosed);
            }
        };
        if details.method() != method {
            return Err(CheckoutError::MethodMismatch);
        }
        validate_details(&details)?;
        self.stage = CheckoutStage::ReadyToProcess {
            method,
            details: Some(details),
        };
        Ok(())
    }

    /// One-shot transition into `Processing`.
    pub fn begin_processing(&mut self) -> Result<(), CheckoutError> {
        match &self.stage {
            CheckoutStage::ReadyToProcess { .. } => {
                self.stage = CheckoutStage::Processing;
                Ok(())
            }
            CheckoutStage::ChoosingMethod => Err(CheckoutError::MethodNotSelected),
            CheckoutStage::CollectingDetails { .. } => Err(CheckoutError::NotReadyToProcess),
            CheckoutStage::Processing => Err(CheckoutError::AlreadyProcessing),
            CheckoutStage::Succeeded { .. } | CheckoutStage::Failed { .. } => {
                Err(CheckoutError::SessionClosed)
            }
        }
    }

    /// Close the session as authorized. The caller owns the `Processing`
    /// stage, so this does not re-check it.
    pub fn finish_succeeded(&mut self, payment_id: CompactString) {
        self.stage = CheckoutStage::Succeeded { payment_id };
    }

    /// Close the session as declined. The caller owns the `Processing`
    /// stage, so this does not re-check it.
    pub fn finish_failed(&mut self, reason: CompactString) {
        self.stage = CheckoutStage::Failed { reason };
    }

    pub fn idle_for(&self) -> Duration {
        self.last_touched.elapsed()
    }

    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }
}

/// Validate instrument details the way the donation dialog does.
pub fn validate_details(details: &PaymentDetails) -> Result<(), CheckoutError> {
    match details {
        PaymentDetails::Card {
            number,
            expiry,
            cvv,
            holder,
        } => {
            let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
            if digits.len() < 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(CheckoutError::InvalidDetails(
                    "card number must be at least 16 digits",
                ));
            }
            if expiry.len() != 5 {
                return Err(CheckoutError::InvalidDetails("expiry must be in MM/YY form"));
            }
            if cvv.len() < 3 || !cvv.chars().all(|c| c.is_ascii_digit()) {
                return Err(CheckoutError::InvalidDetails("cvv must be at least 3 digits"));
            }
            if holder.trim().len() < 2 {
                return Err(CheckoutError::InvalidDetails("card holder name is too short"));
            }
            Ok(())
        }
        PaymentDetails::Upi { vpa } => {
            if !vpa.contains('@') || vpa.len() < 5 {
                return Err(CheckoutError::InvalidDetails(
                    "upi id must look like name@bank",
                ));
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// In-memory session registry keyed by order id.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<CompactString, CheckoutSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for an order, or return the existing one unchanged.
    pub async fn open(
        &self,
        order_id: CompactString,
        amount: i64,
        currency: CurrencyCode,
    ) -> CheckoutSession {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(order_id.clone())
            .or_insert_with(|| CheckoutSession::new(order_id, amount, currency));
        session.touch();
        session.clone()
    }

    /// Snapshot a session without touching its idle clock.
    pub async fn get(&self, order_id: &str) -> Option<CheckoutSession> {
        self.sessions.read().await.get(order_id).cloned()
    }

    /// Run a transition on a live session under the write lock.
    ///
    /// Returns `None` when no session exists for the order. Any access
    /// through here counts as activity for idle sweeping.
    pub async fn with_session<T>(
        &self,
        order_id: &str,
        f: impl FnOnce(&mut CheckoutSession) -> Result<T, CheckoutError>,
    ) -> Option<Result<T, CheckoutError>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(order_id)?;
        session.touch();
        Some(f(session))
    }

    /// Discard a session. Returns whether one existed.
    pub async fn remove(&self, order_id: &str) -> bool {
        self.sessions.write().await.remove(order_id).is_some()
    }

    /// Drop sessions idle longer than `ttl`. Returns how many were removed.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() <= ttl);
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn session() -> CheckoutSession {
        CheckoutSession::new("order_test".into(), 50_000, CurrencyCode::Inr)
    }

    fn valid_card() -> PaymentDetails {
        PaymentDetails::Card {
            number: "4111 1111 1111 1111".into(),
            expiry: "12/30".into(),
            cvv: "123".into(),
            holder: "Asha Rao".into(),
        }
    }

    #[test]
    fn card_flow_walks_the_happy_path() {
        let mut s = session();
        assert_eq!(s.stage.method(), None);
        s.select_method(PaymentMethod::Card).unwrap();
        assert!(matches!(s.stage, CheckoutStage::CollectingDetails { .. }));
        s.submit_details(valid_card()).unwrap();
        assert!(matches!(
            s.stage,
            CheckoutStage::ReadyToProcess {
                method: PaymentMethod::Card,
                details: Some(_)
            }
        ));
        s.begin_processing().unwrap();
        s.finish_succeeded("pay_1".into());
        assert!(matches!(s.stage, CheckoutStage::Succeeded { .. }));
    }

    #[test]
    fn netbanking_skips_detail_collection() {
        let mut s = session();
        s.select_method(PaymentMethod::Netbanking).unwrap();
        assert!(matches!(
            s.stage,
            CheckoutStage::ReadyToProcess { details: None, .. }
        ));
        assert_eq!(
            s.submit_details(valid_card()),
            Err(CheckoutError::DetailsNotRequired)
        );
        s.begin_processing().unwrap();
    }

    #[test]
    fn submit_before_select_is_rejected() {
        let mut s = session();
        assert_eq!(
            s.submit_details(valid_card()),
            Err(CheckoutError::MethodNotSelected)
        );
        assert_eq!(s.stage, CheckoutStage::ChoosingMethod);
    }

    #[test]
    fn details_must_match_selected_method() {
        let mut s = session();
        s.select_method(PaymentMethod::Upi).unwrap();
        assert_eq!(
            s.submit_details(valid_card()),
            Err(CheckoutError::MethodMismatch)
        );
    }

    #[test]
    fn second_begin_processing_is_rejected() {
        let mut s = session();
        s.select_method(PaymentMethod::Netbanking).unwrap();
        s.begin_processing().unwrap();
        assert_eq!(s.begin_processing(), Err(CheckoutError::AlreadyProcessing));
        assert_eq!(
            s.select_method(PaymentMethod::Card),
            Err(CheckoutError::AlreadyProcessing)
        );
    }

    #[test]
    fn closed_session_rejects_transitions() {
        let mut s = session();
        s.select_method(PaymentMethod::Netbanking).unwrap();
        s.begin_processing().unwrap();
        s.finish_failed("payment_failed".into());
        assert_eq!(
            s.select_method(PaymentMethod::Card),
            Err(CheckoutError::SessionClosed)
        );
        assert_eq!(s.begin_processing(), Err(CheckoutError::SessionClosed));
    }

    #[test]
    fn reselecting_discards_collected_details() {
        let mut s = session();
        s.select_method(PaymentMethod::Card).unwrap();
        s.submit_details(valid_card()).unwrap();
        s.select_method(PaymentMethod::Upi).unwrap();
        assert!(matches!(
            s.stage,
            CheckoutStage::CollectingDetails {
                method: PaymentMethod::Upi
            }
        ));
        assert_eq!(s.begin_processing(), Err(CheckoutError::NotReadyToProcess));
    }

    #[test]
    fn card_validation_rules() {
        let cases = [
            ("4111", "12/30", "123", "Asha Rao"),
            ("4111 1111 1111 111x", "12/30", "123", "Asha Rao"),
            ("4111 1111 1111 1111", "1/30", "123", "Asha Rao"),
            ("4111 1111 1111 1111", "12/30", "12", "Asha Rao"),
            ("4111 1111 1111 1111", "12/30", "123", " A "),
        ];
        for (number, expiry, cvv, holder) in cases {
            let details = PaymentDetails::Card {
                number: number.into(),
                expiry: expiry.into(),
                cvv: cvv.into(),
                holder: holder.into(),
            };
            assert!(
                matches!(
                    validate_details(&details),
                    Err(CheckoutError::InvalidDetails(_))
                ),
                "expected rejection for {number:?} {expiry:?} {cvv:?} {holder:?}"
            );
        }
        assert!(validate_details(&valid_card()).is_ok());
    }

    #[test]
    fn upi_validation_rules() {
        let bad = PaymentDetails::Upi { vpa: "asha".into() };
        assert!(validate_details(&bad).is_err());
        let short = PaymentDetails::Upi { vpa: "a@b".into() };
        assert!(validate_details(&short).is_err());
        let good = PaymentDetails::Upi {
            vpa: "asha@okbank".into(),
        };
        assert!(validate_details(&good).is_ok());
    }

    #[tokio::test]
    async fn open_is_idempotent() {
        let store = SessionStore::new();
        let first = store.open("order_1".into(), 100, CurrencyCode::Inr).await;
        store
            .with_session("order_1", |s| s.select_method(PaymentMethod::Card))
            .await
            .unwrap()
            .unwrap();
        let reopened = store.open("order_1".into(), 100, CurrencyCode::Inr).await;
        assert_eq!(first.order_id, reopened.order_id);
        assert!(matches!(
            reopened.stage,
            CheckoutStage::CollectingDetails { .. }
        ));
    }

    #[tokio::test]
    async fn with_session_on_unknown_order_returns_none() {
        let store = SessionStore::new();
        assert!(
            store
                .with_session("order_missing", |s| s.begin_processing())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn evict_idle_removes_only_stale_sessions() {
        let store = SessionStore::new();
        store.open("order_old".into(), 100, CurrencyCode::Inr).await;
        store.open("order_new".into(), 100, CurrencyCode::Inr).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        // Any access through the store counts as activity.
        store
            .with_session("order_new", |_s| Ok(()))
            .await
            .unwrap()
            .unwrap();

        let removed = store.evict_idle(Duration::from_millis(15)).await;
        assert_eq!(removed, 1);
        assert!(store.get("order_old").await.is_none());
        assert!(store.get("order_new").await.is_some());
    }
}
