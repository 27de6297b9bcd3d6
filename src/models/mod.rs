// Request bodies the client constructs itself
// Response payloads stay untyped (`serde_json::Value`)

pub mod account;
pub mod cart;
