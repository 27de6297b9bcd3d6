// Typed entry points for the storefront REST surface
// Every call goes through the authenticated request pipeline

mod account;
mod cart;
mod catalog;
mod orders;
mod search;

pub use account::AuthService;
pub use cart::CartService;
pub use catalog::{CategoryService, ProductService};
pub use orders::OrderService;
pub use search::SearchService;

use crate::http_client::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn products(&self) -> ProductService<'_> {
        ProductService::new(self)
    }

    pub fn categories(&self) -> CategoryService<'_> {
        CategoryService::new(self)
    }

    pub fn cart(&self) -> CartService<'_> {
        CartService::new(self)
    }

    pub fn search(&self) -> SearchService<'_> {
        SearchService::new(self)
    }

    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(self)
    }
}
