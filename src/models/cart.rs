use serde::Serialize;

/// Body of `POST /cart/add/`
#[derive(Debug, Clone, Serialize)]
pub struct AddToCart {
    pub product: u64,
    pub quantity: u32,
}

/// Body of `PATCH /cart/item/{id}/update/`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateQuantity {
    pub quantity: u32,
}
