use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::http_client::ApiClient;

/// Orders of the logged-in user
pub struct OrderService<'a> {
    client: &'a ApiClient,
}

impl<'a> OrderService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn mine(&self) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::GET, "/orders/my/")?)
            .await
    }
}
