//! Product Responses

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auvea_app::domain::products::view::{CategoryView, ProductView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    pub id: Uuid,

    /// Name in the request locale
    pub name: String,

    pub slug: String,
}

impl From<CategoryView> for CategoryResponse {
    fn from(category: CategoryView) -> Self {
        Self {
            id: category.uuid.into_uuid(),
            name: category.name,
            slug: category.slug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub id: Uuid,

    pub category_id: Uuid,

    pub category: CategoryResponse,

    /// Name in the request locale
    pub name: String,

    /// Description in the request locale
    pub description: String,

    pub sku: String,

    /// List price
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub price: Decimal,

    /// Sale price, when the product is discounted
    #[serde(with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub discount_price: Option<Decimal>,

    /// The price charged: the sale price when set, the list price otherwise
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub final_price: Decimal,

    pub file_format: Option<String>,

    /// Download size in megabytes
    #[serde(with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub file_size: Option<Decimal>,

    pub is_featured: bool,

    pub downloads_count: i32,

    pub views_count: i32,

    /// Absolute image URLs
    pub images: Vec<String>,

    /// Absolute 3D preview image URLs
    pub preview_images: Vec<String>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ProductView> for ProductResponse {
    fn from(product: ProductView) -> Self {
        Self {
            id: product.uuid.into_uuid(),
            category_id: product.category.uuid.into_uuid(),
            category: product.category.into(),
            name: product.name,
            description: product.description,
            sku: product.sku,
            price: product.price,
            discount_price: product.discount_price,
            final_price: product.final_price,
            file_format: product.file_format,
            file_size: product.file_size,
            is_featured: product.is_featured,
            downloads_count: product.downloads_count,
            views_count: product.views_count,
            images: product.images,
            preview_images: product.preview_images,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}
