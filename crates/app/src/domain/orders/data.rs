//! Order Data

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{orders::records::UnknownVariant, products::records::ProductUuid};

/// Notes stored on an order placed without any.
pub const DEFAULT_ORDER_NOTES: &str = "Digital Download Order";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cod",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cod" => Ok(Self::CashOnDelivery),
            other => Err(UnknownVariant {
                kind: "payment method",
                value: other.to_string(),
            }),
        }
    }
}

/// Contact details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// An item as submitted by the client. `price` is advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedItem {
    pub product: ProductUuid,
    pub quantity: u32,
    pub price: Decimal,
}

/// New Order Data
///
/// Client-claimed amounts are checked against server prices, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub items: Vec<ProposedItem>,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub customer: CustomerDetails,
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
    pub coupon_code: Option<String>,
}
