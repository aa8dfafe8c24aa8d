//! Platform API client (donation page backend → PawPay server).

use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::orders::{CreateOrderRequest, CreateOrderResponse};
use crate::objects::payments::{PaymentFailureReport, VerifyPaymentRequest, VerifyPaymentResponse};
use crate::objects::Ack;

/// Typed HTTP client for the PawPay **payments API**.
///
/// The payments API is called by the donation page: it creates orders
/// before the checkout opens, verifies payments after the gateway hands
/// back a signature, and reports declined payments.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: Url,
}

impl PlatformClient {
    /// Create a new `PlatformClient`.
    ///
    /// * `base_url` – root URL of the PawPay server
    ///   (e.g. `https://donate.example.com`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /payments/create-order` – create a new donation order.
    pub async fn create_order(
        &self,
        payload: CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError> {
        let url = self.base_url.join("/payments/create-order")?;

        let resp = self.http.post(url).json(&payload).send().await?;

        parse_response(resp).await
    }

    /// `POST /payments/verify-payment` – verify a gateway signature and
    /// record the donation.
    ///
    /// A rejected verification surfaces as [`ClientError::Api`] with
    /// status 400.
    pub async fn verify_payment(
        &self,
        payload: VerifyPaymentRequest,
    ) -> Result<VerifyPaymentResponse, ClientError> {
        let url = self.base_url.join("/payments/verify-payment")?;

        let resp = self.http.post(url).json(&payload).send().await?;

        parse_response(resp).await
    }

    /// `POST /payments/payment-failure` – report a declined payment for
    /// audit logging.
    pub async fn report_failure(
        &self,
        report: PaymentFailureReport,
    ) -> Result<Ack, ClientError> {
        let url = self.base_url.join("/payments/payment-failure")?;

        let resp = self.http.post(url).json(&report).send().await?;

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
