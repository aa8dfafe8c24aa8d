//! Checkout API client (hosted checkout frontend → PawPay server).

use reqwest::{Client, StatusCode};
use url::Url;

use super::ClientError;
use crate::objects::checkout::{
    CheckoutSessionResponse, PaymentDetails, PaymentFailureBody, PaymentMethod,
    PaymentSuccessBody, SelectMethodRequest,
};
use crate::objects::Ack;

/// Outcome of a payment attempt.
///
/// A declined payment is an expected business outcome, not a client error,
/// so it gets its own variant instead of surfacing as [`ClientError::Api`].
#[derive(Debug, Clone)]
pub enum PayOutcome {
    Authorized(PaymentSuccessBody),
    Declined(PaymentFailureBody),
}

/// Typed HTTP client for the PawPay **checkout API**.
///
/// The checkout API drives one session per order through method selection,
/// detail collection and payment.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    http: Client,
    base_url: Url,
}

impl CheckoutClient {
    /// Create a new `CheckoutClient`.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /checkout/{order_id}/session` – open a checkout session.
    ///
    /// Opening is idempotent: re-opening an existing session returns its
    /// current state unchanged.
    pub async fn open_session(
        &self,
        order_id: &str,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/checkout/{order_id}/session"))?;

        let resp = self.http.post(url).send().await?;

        parse_response(resp).await
    }

    /// `GET /checkout/{order_id}` – fetch the current session state.
    pub async fn session(&self, order_id: &str) -> Result<CheckoutSessionResponse, ClientError> {
        let url = self.base_url.join(&format!("/checkout/{order_id}"))?;

        let resp = self.http.get(url).send().await?;

        parse_response(resp).await
    }

    /// `POST /checkout/{order_id}/method` – select a payment method.
    pub async fn select_method(
        &self,
        order_id: &str,
        method: PaymentMethod,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/checkout/{order_id}/method"))?;

        let resp = self
            .http
            .post(url)
            .json(&SelectMethodRequest { method })
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /checkout/{order_id}/details` – submit instrument details.
    pub async fn submit_details(
        &self,
        order_id: &str,
        details: PaymentDetails,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/checkout/{order_id}/details"))?;

        let resp = self.http.post(url).json(&details).send().await?;

        parse_response(resp).await
    }

    /// `POST /checkout/{order_id}/pay` – run the payment through the
    /// gateway.
    ///
    /// Returns [`PayOutcome::Authorized`] on 200 and
    /// [`PayOutcome::Declined`] on 402; any other non-2xx status is a
    /// [`ClientError::Api`].
    pub async fn pay(&self, order_id: &str) -> Result<PayOutcome, ClientError> {
        let url = self.base_url.join(&format!("/checkout/{order_id}/pay"))?;

        let resp = self.http.post(url).send().await?;

        let status = resp.status();
        if status == StatusCode::PAYMENT_REQUIRED {
            let bytes = resp.bytes().await?;
            let body: PaymentFailureBody =
                serde_json::from_slice(&bytes).map_err(ClientError::Json)?;
            return Ok(PayOutcome::Declined(body));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }
        let bytes = resp.bytes().await?;
        let body: PaymentSuccessBody = serde_json::from_slice(&bytes).map_err(ClientError::Json)?;
        Ok(PayOutcome::Authorized(body))
    }

    /// `POST /checkout/{order_id}/cancel` – discard the session.
    pub async fn cancel(&self, order_id: &str) -> Result<Ack, ClientError> {
        let url = self
            .base_url
            .join(&format!("/checkout/{order_id}/cancel"))?;

        let resp = self.http.post(url).send().await?;

        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
