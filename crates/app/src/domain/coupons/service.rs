//! Coupons service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::coupons::{
        data::NewCoupon,
        errors::CouponsServiceError,
        records::{CouponRecord, normalize_code},
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn find_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError> {
        let code = normalize_code(code);

        if code.is_empty() {
            return Err(CouponsServiceError::NotFound);
        }

        let mut tx = self.db.begin_transaction().await?;

        let coupon = self.repository.find_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        coupon.ok_or(CouponsServiceError::NotFound)
    }

    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        let code = normalize_code(&coupon.code);

        if code.is_empty() {
            return Err(CouponsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_coupon(&mut tx, &coupon, &code).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Find a coupon by code, ignoring case and surrounding whitespace.
    async fn find_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError>;

    /// Create a coupon. The code is stored normalized.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        domain::coupons::records::{CouponType, CouponUuid},
        test::TestContext,
    };

    use super::*;

    fn new_coupon(code: &str) -> NewCoupon {
        NewCoupon {
            uuid: CouponUuid::new(),
            code: code.to_string(),
            name: Some("Ten off".to_string()),
            description: None,
            kind: CouponType::Percent,
            value: dec!(10),
            minimum_amount: Some(dec!(50)),
            usage_limit: None,
            user_limit: None,
            starts_at: None,
            expires_at: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn created_coupon_is_found_case_insensitively() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.coupons.create_coupon(new_coupon(" save10 ")).await?;

        assert_eq!(created.code, "SAVE10");
        assert_eq!(created.usage_count, 0);

        let found = ctx.coupons.find_by_code("  Save10").await?;

        assert_eq!(found.uuid, created.uuid);
        assert_eq!(found.minimum_amount, Some(dec!(50.00)));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_normalized_code_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons.create_coupon(new_coupon("SAVE10")).await?;

        let result = ctx.coupons.create_coupon(new_coupon("save10")).await;

        assert!(
            matches!(result, Err(CouponsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_or_blank_code_returns_not_found() {
        let ctx = TestContext::new().await;

        let unknown = ctx.coupons.find_by_code("NOPE").await;
        let blank = ctx.coupons.find_by_code("   ").await;

        assert!(
            matches!(unknown, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {unknown:?}"
        );
        assert!(
            matches!(blank, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {blank:?}"
        );
    }

    #[tokio::test]
    async fn negative_value_returns_invalid_data() {
        let ctx = TestContext::new().await;
        let mut coupon = new_coupon("NEGATIVE");

        coupon.value = dec!(-5);

        let result = ctx.coupons.create_coupon(coupon).await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }
}
