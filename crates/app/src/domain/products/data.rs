//! Products Data

use rust_decimal::Decimal;

use crate::{
    domain::products::records::{CategoryUuid, ProductUuid},
    locale::{Locale, Translations},
    pagination::PageRequest,
};

/// New Category Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub name: Translations,
    pub slug: String,
    pub is_active: bool,
}

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub category: CategoryUuid,
    pub name: Translations,
    pub description: Translations,
    pub sku: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub is_featured: bool,
    pub is_active: bool,
    pub images: Vec<String>,
    pub preview_images: Vec<String>,
}

/// Product Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub category: CategoryUuid,
    pub name: Translations,
    pub description: Translations,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub is_featured: bool,
    pub is_active: bool,
}

/// Catalog listing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogQuery {
    pub locale: Locale,
    pub category: Option<CategoryUuid>,
    pub featured: Option<bool>,
    pub page: PageRequest,
}
