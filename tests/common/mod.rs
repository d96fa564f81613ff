//! Client for a server listening on [`BASE_URL`] over a seeded database.

use cinema_backend::api;
use constcat::concat;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

const BASE_URL: &str = "http://localhost:3000";

pub struct Client {
    inner: reqwest::Client,
    pub auth_token: Option<String>,
}

/// Status and `detail` of an error response.
pub type Failure = (StatusCode, String);

impl Client {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
            auth_token: None,
        }
    }

    pub async fn login_customer(mut self, email: &str, password: &str) -> Self {
        const URL: &str = concat!(BASE_URL, "/auth/customer/login");

        let customer = self
            .inner
            .post(URL)
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .expect("wrong status code")
            .json::<api::auth::Customer>()
            .await
            .expect("failed to get a response");
        self.auth_token = customer.token;

        self
    }

    pub async fn login_admin(mut self, email: &str, password: &str) -> Self {
        const URL: &str = concat!(BASE_URL, "/auth/admin/login");

        let admin = self
            .inner
            .post(URL)
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .expect("wrong status code")
            .json::<api::auth::Admin>()
            .await
            .expect("failed to get a response");
        self.auth_token = admin.token;

        self
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut req: RequestBuilder,
    ) -> Result<T, Failure> {
        if let Some(token) = &self.auth_token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let resp = req.send().await.expect("failed to send a request");
        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<api::Detail>()
                .await
                .expect("failed to get an error detail");
            return Err((status, detail.detail));
        }
        Ok(resp.json::<T>().await.expect("failed to get a response"))
    }

    pub async fn create_receipt(
        &self,
        purchase: &api::receipt::Purchase,
    ) -> Result<api::receipt::Created, Failure> {
        const URL: &str = concat!(BASE_URL, "/receipts/");

        self.send(self.inner.post(URL).json(purchase)).await
    }

    pub async fn membership(
        &self,
        customer_id: i32,
    ) -> Result<api::membership::Overview, Failure> {
        const URL: &str = concat!(BASE_URL, "/customers");

        self.send(self.inner.get(format!("{URL}/{customer_id}/membership")))
            .await
    }

    pub async fn movies(
        &self,
        filter: &api::movie::Filter,
    ) -> Result<Vec<api::Movie>, Failure> {
        const URL: &str = concat!(BASE_URL, "/movies");

        self.send(self.inner.get(URL).query(filter)).await
    }

    pub async fn admin_vouchers(
        &self,
    ) -> Result<Vec<api::voucher::Voucher>, Failure> {
        const URL: &str = concat!(BASE_URL, "/admin/vouchers");

        self.send(self.inner.get(URL)).await
    }
}
