//! Order Requests

use std::borrow::Cow;

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use auvea_app::domain::orders::data::{CustomerDetails, NewOrder, PaymentMethod, ProposedItem};

use crate::errors::{ApiError, FieldErrors};

/// Order Item Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct OrderItemRequest {
    pub product_id: Uuid,

    #[validate(range(min = 1, max = 4294967295, message = "must be between 1 and 4294967295"))]
    pub quantity: i64,

    /// Price the client displayed; never charged
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    #[validate(custom = "non_negative")]
    pub price: Decimal,
}

/// Create Order Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct CreateOrderRequest {
    #[validate(length(min = 1, message = "at least one item is required"))]
    pub items: Vec<OrderItemRequest>,

    /// Client-computed subtotal
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    #[validate(custom = "non_negative")]
    pub subtotal: Decimal,

    /// Client-computed total, checked against the server total
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    #[validate(custom = "non_negative")]
    pub total: Decimal,

    #[validate(length(min = 1, max = 255, message = "is required and at most 255 characters"))]
    pub customer_name: String,

    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "may not be longer than 255 characters")
    )]
    pub customer_email: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "is too long"))]
    pub customer_phone: Option<String>,

    #[serde(default)]
    #[validate(length(max = 500, message = "is too long"))]
    pub address: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "is too long"))]
    pub city: Option<String>,

    #[serde(default)]
    #[validate(length(max = 1000, message = "is too long"))]
    pub notes: Option<String>,

    /// Only `cod` is accepted
    pub payment_method: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "is too long"))]
    pub coupon_code: Option<String>,
}

impl CreateOrderRequest {
    /// Trim text fields and drop blank optional ones.
    fn normalized(self) -> Self {
        Self {
            customer_name: self.customer_name.trim().to_string(),
            customer_email: self.customer_email.trim().to_string(),
            customer_phone: non_blank(self.customer_phone),
            address: non_blank(self.address),
            city: non_blank(self.city),
            notes: non_blank(self.notes),
            coupon_code: non_blank(self.coupon_code),
            ..self
        }
    }

    /// Validate and convert in one pass, keyed like `customer_email` or
    /// `items.0.quantity` on failure.
    fn into_order(self) -> Result<NewOrder, FieldErrors> {
        let request = self.normalized();
        let mut errors = FieldErrors::new();

        if let Err(invalid) = request.validate() {
            collect_errors("", &invalid, &mut errors);
        }

        for (index, item) in request.items.iter().enumerate() {
            if let Err(invalid) = item.validate() {
                collect_errors(&format!("items.{index}."), &invalid, &mut errors);
            }
        }

        let payment_method = if let Ok(method) = request.payment_method.parse::<PaymentMethod>() {
            Some(method)
        } else {
            errors
                .entry("payment_method".to_string())
                .or_default()
                .push("must be cod".to_string());
            None
        };

        let items: Option<Vec<ProposedItem>> = request
            .items
            .iter()
            .map(|item| {
                u32::try_from(item.quantity)
                    .ok()
                    .map(|quantity| ProposedItem {
                        product: item.product_id.into(),
                        quantity,
                        price: item.price,
                    })
            })
            .collect();

        match (payment_method, items) {
            (Some(payment_method), Some(items)) if errors.is_empty() => Ok(NewOrder {
                items,
                subtotal: request.subtotal,
                total: request.total,
                customer: CustomerDetails {
                    name: request.customer_name,
                    email: request.customer_email,
                    phone: request.customer_phone,
                    address: request.address,
                    city: request.city,
                },
                notes: request.notes,
                payment_method,
                coupon_code: request.coupon_code,
            }),
            _ => Err(errors),
        }
    }
}

impl TryFrom<CreateOrderRequest> for NewOrder {
    type Error = ApiError;

    fn try_from(request: CreateOrderRequest) -> Result<Self, Self::Error> {
        request.into_order().map_err(ApiError::validation)
    }
}

fn non_negative(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some(Cow::Borrowed("must be at least 0"));

        return Err(error);
    }

    Ok(())
}

fn collect_errors(prefix: &str, invalid: &ValidationErrors, into: &mut FieldErrors) {
    for (field, kind) in invalid.errors() {
        let key = format!("{prefix}{field}");

        match kind {
            ValidationErrorsKind::Field(problems) => {
                into.entry(key).or_default().extend(problems.iter().map(|problem| {
                    problem
                        .message
                        .as_ref()
                        .map_or_else(|| problem.code.to_string(), ToString::to_string)
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_errors(&format!("{key}."), nested, into);
            }
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect_errors(&format!("{key}.{index}."), nested, into);
                }
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn make_request() -> CreateOrderRequest {
        CreateOrderRequest {
            items: vec![OrderItemRequest {
                product_id: Uuid::now_v7(),
                quantity: 2,
                price: dec!(80.00),
            }],
            subtotal: dec!(160.00),
            total: dec!(160.00),
            customer_name: "  Layla Haddad ".to_string(),
            customer_email: "layla@example.com".to_string(),
            customer_phone: Some("  ".to_string()),
            address: None,
            city: Some("Amman".to_string()),
            notes: None,
            payment_method: "cod".to_string(),
            coupon_code: Some(" save10 ".to_string()),
        }
    }

    #[test]
    fn valid_request_becomes_a_trimmed_order() -> Result<(), ApiError> {
        let order = NewOrder::try_from(make_request())?;

        assert_eq!(order.customer.name, "Layla Haddad");
        assert_eq!(order.customer.phone, None, "blank phone is dropped");
        assert_eq!(order.customer.city.as_deref(), Some("Amman"));
        assert_eq!(order.coupon_code.as_deref(), Some("save10"));
        assert_eq!(order.payment_method, PaymentMethod::CashOnDelivery);
        assert_eq!(order.items[0].quantity, 2);

        Ok(())
    }

    fn problems(request: CreateOrderRequest) -> FieldErrors {
        request.into_order().err().unwrap_or_default()
    }

    #[test]
    fn every_problem_is_reported_by_field() {
        let request = CreateOrderRequest {
            items: vec![OrderItemRequest {
                product_id: Uuid::now_v7(),
                quantity: 0,
                price: dec!(-1),
            }],
            total: dec!(-0.01),
            customer_name: " ".to_string(),
            customer_email: "not-an-email".to_string(),
            customer_phone: Some("0".repeat(21)),
            payment_method: "card".to_string(),
            ..make_request()
        };

        let problems = problems(request);

        for field in [
            "items.0.quantity",
            "items.0.price",
            "total",
            "customer_name",
            "customer_email",
            "customer_phone",
            "payment_method",
        ] {
            assert!(problems.contains_key(field), "expected a problem for {field}");
        }

        assert_eq!(
            problems.get("payment_method"),
            Some(&vec!["must be cod".to_string()])
        );
        assert!(!problems.contains_key("subtotal"), "subtotal is fine");
    }

    #[test]
    fn empty_items_are_rejected() {
        let request = CreateOrderRequest {
            items: vec![],
            ..make_request()
        };

        assert!(problems(request).contains_key("items"), "expected items error");
    }

    #[test]
    fn out_of_range_quantities_are_field_errors() {
        for quantity in [-3, i64::from(u32::MAX) + 1] {
            let request = CreateOrderRequest {
                items: vec![OrderItemRequest {
                    product_id: Uuid::now_v7(),
                    quantity,
                    price: dec!(80.00),
                }],
                ..make_request()
            };

            let problems = problems(request);

            assert_eq!(
                problems.keys().collect::<Vec<_>>(),
                vec!["items.0.quantity"],
                "quantity {quantity}"
            );
        }
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in [
            "a@b..c",
            "a@-b.c",
            "a@b.c-",
            "a@b_c.d",
            "a\"b@c.d",
            "@b.co",
            "a b@c.co",
            "a@b@c.co",
            "a@.co",
        ] {
            let request = CreateOrderRequest {
                customer_email: email.to_string(),
                ..make_request()
            };

            assert!(
                problems(request).contains_key("customer_email"),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn padded_email_is_trimmed_before_validation() -> Result<(), ApiError> {
        let request = CreateOrderRequest {
            customer_email: "  layla@example.com ".to_string(),
            ..make_request()
        };

        let order = NewOrder::try_from(request)?;

        assert_eq!(order.customer.email, "layla@example.com");

        Ok(())
    }
}
