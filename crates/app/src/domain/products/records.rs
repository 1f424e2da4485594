//! Product Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{locale::Translations, uuids::TypedUuid};

/// Category UUID
pub type CategoryUuid = TypedUuid<CategoryRecord>;

/// Category Record
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub uuid: CategoryUuid,
    pub name: Translations,
    pub slug: String,
    pub is_active: bool,
}

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub category: CategoryRecord,
    pub name: Translations,
    pub description: Translations,
    pub sku: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub file_format: Option<String>,
    pub file_size: Option<Decimal>,
    pub is_featured: bool,
    pub is_active: bool,
    pub downloads_count: i32,
    pub views_count: i32,
    pub images: Vec<String>,
    pub preview_images: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    /// Price a shopper pays: the discount price when one is set.
    #[must_use]
    pub fn final_price(&self) -> Decimal {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whether the product may be added to a cart or ordered.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}
