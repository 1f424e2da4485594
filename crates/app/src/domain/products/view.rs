//! Localized product views

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::products::records::{CategoryUuid, ProductRecord, ProductUuid},
    locale::Locale,
};

/// Turns stored media paths into absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrls {
    base_url: String,
}

impl MediaUrls {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Category as shown alongside a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub uuid: CategoryUuid,
    pub name: String,
    pub slug: String,
}

/// Product resolved for one locale, with absolute media URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub uuid: ProductUuid,
    pub category: CategoryView,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub final_price: Decimal,
    pub file_format: Option<String>,
    pub file_size: Option<Decimal>,
    pub is_featured: bool,
    pub downloads_count: i32,
    pub views_count: i32,
    pub images: Vec<String>,
    pub preview_images: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductView {
    #[must_use]
    pub fn localize(product: &ProductRecord, locale: Locale, media: &MediaUrls) -> Self {
        Self {
            uuid: product.uuid,
            category: CategoryView {
                uuid: product.category.uuid,
                name: product.category.name.resolve(locale).to_string(),
                slug: product.category.slug.clone(),
            },
            name: product.name.resolve(locale).to_string(),
            description: product.description.resolve(locale).to_string(),
            sku: product.sku.clone(),
            price: product.price,
            discount_price: product.discount_price,
            final_price: product.final_price(),
            file_format: product.file_format.clone(),
            file_size: product.file_size,
            is_featured: product.is_featured,
            downloads_count: product.downloads_count,
            views_count: product.views_count,
            images: product
                .images
                .iter()
                .map(|path| media.absolute(path))
                .collect(),
            preview_images: product
                .preview_images
                .iter()
                .map(|path| media.absolute(path))
                .collect(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::{domain::products::records::CategoryRecord, locale::Translations};

    use super::*;

    fn record() -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            category: CategoryRecord {
                uuid: CategoryUuid::new(),
                name: Translations::new()
                    .with(Locale::En, "Rings")
                    .with(Locale::Ar, "خواتم"),
                slug: "rings".to_string(),
                is_active: true,
            },
            name: Translations::new()
                .with(Locale::En, "Lotus Ring")
                .with(Locale::Ar, "خاتم اللوتس"),
            description: Translations::new().with(Locale::En, "Printable ring"),
            sku: "RING-001".to_string(),
            price: dec!(100.00),
            discount_price: Some(dec!(80.00)),
            file_format: Some("STL".to_string()),
            file_size: None,
            is_featured: true,
            is_active: true,
            downloads_count: 3,
            views_count: 9,
            images: vec!["products/lotus.png".to_string()],
            preview_images: vec!["https://cdn.example.com/lotus-3d.png".to_string()],
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    #[test]
    fn media_urls_are_made_absolute_once() {
        let media = MediaUrls::new("https://auvea.test/storage/");

        assert_eq!(
            media.absolute("/products/a.png"),
            "https://auvea.test/storage/products/a.png"
        );
        assert_eq!(
            media.absolute("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn localize_resolves_translations_and_final_price() {
        let media = MediaUrls::new("https://auvea.test/storage");
        let view = ProductView::localize(&record(), Locale::Ar, &media);

        assert_eq!(view.name, "خاتم اللوتس");
        assert_eq!(view.category.name, "خواتم");
        assert_eq!(view.description, "Printable ring", "falls back to english");
        assert_eq!(view.final_price, dec!(80.00));
        assert_eq!(
            view.images,
            vec!["https://auvea.test/storage/products/lotus.png".to_string()]
        );
        assert_eq!(
            view.preview_images,
            vec!["https://cdn.example.com/lotus-3d.png".to_string()]
        );
    }
}
