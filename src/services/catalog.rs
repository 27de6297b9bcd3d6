use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::http_client::ApiClient;

/// Product CRUD under `/products/`
pub struct ProductService<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::GET, "/products/")?)
            .await
    }

    pub async fn get(&self, id: u64) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::GET, &format!("/products/{}/", id))?)
            .await
    }

    pub async fn by_category(&self, category: &str) -> Result<Value> {
        self.client
            .send_json(
                self.client
                    .request(Method::GET, "/products/")?
                    .query(&[("category", category)]),
            )
            .await
    }

    pub async fn create(&self, fields: &Value) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::POST, "/products/")?.json(fields))
            .await
    }

    pub async fn update(&self, id: u64, fields: &Value) -> Result<Value> {
        self.client
            .send_json(
                self.client
                    .request(Method::PUT, &format!("/products/{}/", id))?
                    .json(fields),
            )
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client
            .send(self.client.request(Method::DELETE, &format!("/products/{}/", id))?)
            .await?;
        Ok(())
    }
}

/// Read-only category listing under `/categories/`
pub struct CategoryService<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoryService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::GET, "/categories/")?)
            .await
    }

    pub async fn get(&self, id: u64) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::GET, &format!("/categories/{}/", id))?)
            .await
    }
}
