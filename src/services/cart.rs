use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::http_client::ApiClient;
use crate::models::cart::{AddToCart, UpdateQuantity};

/// Shopping cart under `/cart/`
pub struct CartService<'a> {
    client: &'a ApiClient,
}

impl<'a> CartService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::GET, "/cart/")?)
            .await
    }

    pub async fn add(&self, product: u64, quantity: u32) -> Result<Value> {
        let body = AddToCart { product, quantity };
        self.client
            .send_json(self.client.request(Method::POST, "/cart/add/")?.json(&body))
            .await
    }

    pub async fn update(&self, item_id: u64, quantity: u32) -> Result<Value> {
        let body = UpdateQuantity { quantity };
        self.client
            .send_json(
                self.client
                    .request(Method::PATCH, &format!("/cart/item/{}/update/", item_id))?
                    .json(&body),
            )
            .await
    }

    pub async fn remove(&self, item_id: u64) -> Result<Value> {
        self.client
            .send_json(
                self.client
                    .request(Method::DELETE, &format!("/cart/item/{}/remove/", item_id))?,
            )
            .await
    }

    pub async fn clear(&self) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::POST, "/cart/clear/")?)
            .await
    }
}
