use bytes::{BufMut, Bytes, BytesMut};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::http_client::ApiClient;

/// Text and image product search
pub struct SearchService<'a> {
    client: &'a ApiClient,
}

impl<'a> SearchService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn products(&self, query: &str) -> Result<Value> {
        self.client
            .send_json(
                self.client
                    .request(Method::GET, "/search/")?
                    .query(&[("q", query)]),
            )
            .await
    }

    /// Upload an image as the `image` form field
    pub async fn by_image(&self, file_name: &str, image: Bytes) -> Result<Value> {
        let boundary = format!("----storefront-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_body(&boundary, "image", file_name, &image);

        self.client
            .send_json(
                self.client
                    .request(Method::POST, "/search/image/")?
                    .header(
                        CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(body),
            )
            .await
    }
}

/// Single-file multipart body, buffered so the request can be replayed
fn multipart_body(boundary: &str, field: &str, file_name: &str, data: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(data.len() + 256);

    buf.put_slice(format!("--{}\r\n", boundary).as_bytes());
    buf.put_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field,
            file_name.replace('"', "")
        )
        .as_bytes(),
    );
    buf.put_slice(format!("Content-Type: {}\r\n\r\n", image_mime(file_name)).as_bytes());
    buf.put_slice(data);
    buf.put_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    buf.freeze()
}

fn image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
