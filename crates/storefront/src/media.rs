//! Product image URLs.
//!
//! The API returns image paths relative to the backend origin
//! (`/static/images/...`). These helpers turn them into absolute URLs.

use url::Url;

use crate::api::Product;

/// Resolves media paths against the API origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrls {
    origin: String,
}

impl MediaUrls {
    /// Derive the media origin from the API base URL by dropping a trailing
    /// `/api` segment.
    ///
    /// ```rust
    /// # use bazaar_storefront::media::MediaUrls;
    /// # use url::Url;
    /// let base = Url::parse("https://shop.example/api/").unwrap();
    /// let media = MediaUrls::from_api_base(&base);
    /// assert_eq!(media.origin(), "https://shop.example");
    /// ```
    #[must_use]
    pub fn from_api_base(api_base_url: &Url) -> Self {
        let base = api_base_url.as_str().trim_end_matches('/');
        let origin = base.strip_suffix("/api").unwrap_or(base);
        Self {
            origin: origin.to_string(),
        }
    }

    /// Media origin, without a trailing slash.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Make `url` absolute. Empty stays empty; `http(s)` URLs pass through.
    #[must_use]
    pub fn to_absolute_media_url(&self, url: &str) -> String {
        if url.is_empty() {
            String::new()
        } else if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.origin)
        } else {
            format!("{}/{url}", self.origin)
        }
    }

    /// Absolute URLs of a product's images, primary first.
    #[must_use]
    pub fn product_images(&self, product: &Product) -> Vec<String> {
        raw_product_images(product)
            .into_iter()
            .map(|url| self.to_absolute_media_url(url))
            .collect()
    }

    /// Absolute URL of a product's primary image, or `""` if it has none.
    #[must_use]
    pub fn primary_product_image(&self, product: &Product) -> String {
        raw_product_images(product)
            .first()
            .map(|url| self.to_absolute_media_url(url))
            .unwrap_or_default()
    }
}

/// Trimmed non-empty image paths, falling back to the legacy `image_url`.
fn raw_product_images(product: &Product) -> Vec<&str> {
    let images: Vec<&str> = product
        .images
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .collect();
    if !images.is_empty() {
        return images;
    }

    product
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .into_iter()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn media() -> MediaUrls {
        MediaUrls::from_api_base(&Url::parse("http://localhost:8000/api/").unwrap())
    }

    fn product(images: &[&str], image_url: Option<&str>) -> Product {
        serde_json::from_value(json!({
            "id": 1,
            "name": "Tea",
            "price": "1.00",
            "category_id": 1,
            "images": images,
            "image_url": image_url
        }))
        .unwrap()
    }

    #[test]
    fn test_origin_without_api_suffix() {
        let cdn = MediaUrls::from_api_base(&Url::parse("https://cdn.example/v2/").unwrap());
        assert_eq!(cdn.origin(), "https://cdn.example/v2");
        assert_eq!(media().origin(), "http://localhost:8000");
    }

    #[test]
    fn test_to_absolute_media_url() {
        let media = media();
        assert_eq!(media.to_absolute_media_url(""), "");
        assert_eq!(
            media.to_absolute_media_url("https://img.example/a.jpg"),
            "https://img.example/a.jpg"
        );
        assert_eq!(
            media.to_absolute_media_url("/static/a.jpg"),
            "http://localhost:8000/static/a.jpg"
        );
        assert_eq!(
            media.to_absolute_media_url("static/a.jpg"),
            "http://localhost:8000/static/a.jpg"
        );
    }

    #[test]
    fn test_product_images_prefer_gallery() {
        let product = product(&[" /a.jpg ", "", "b.jpg"], Some("/legacy.jpg"));
        assert_eq!(
            media().product_images(&product),
            vec!["http://localhost:8000/a.jpg", "http://localhost:8000/b.jpg"]
        );
        assert_eq!(
            media().primary_product_image(&product),
            "http://localhost:8000/a.jpg"
        );
    }

    #[test]
    fn test_product_images_fall_back_to_image_url() {
        let product = product(&["  "], Some(" /legacy.jpg"));
        assert_eq!(
            media().product_images(&product),
            vec!["http://localhost:8000/legacy.jpg"]
        );
    }

    #[test]
    fn test_product_without_images() {
        let product = product(&[], None);
        assert!(media().product_images(&product).is_empty());
        assert_eq!(media().primary_product_image(&product), "");
    }
}
