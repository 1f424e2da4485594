use auvea_app::{
    database::{self, Db},
    domain::coupons::{
        CouponsService, PgCouponsService,
        data::NewCoupon,
        records::{CouponType, CouponUuid},
    },
};
use clap::Args;
use jiff::Timestamp;
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct CreateCouponArgs {
    /// Redemption code; stored upper-cased
    #[arg(long)]
    code: String,

    /// `percent` or `fixed`
    #[arg(long = "type")]
    kind: CouponType,

    /// Percentage (0-100) or fixed amount
    #[arg(long)]
    value: Decimal,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Smallest subtotal the coupon applies to
    #[arg(long)]
    minimum_amount: Option<Decimal>,

    /// Total redemptions allowed
    #[arg(long)]
    usage_limit: Option<i32>,

    /// Validity window start (RFC 3339)
    #[arg(long)]
    starts_at: Option<Timestamp>,

    /// Validity window end (RFC 3339)
    #[arg(long)]
    expires_at: Option<Timestamp>,

    /// Create the coupon disabled
    #[arg(long)]
    inactive: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    if let (Some(starts_at), Some(expires_at)) = (args.starts_at, args.expires_at)
        && expires_at <= starts_at
    {
        return Err("expires-at must be after starts-at".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let coupon = PgCouponsService::new(Db::new(pool))
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code,
            name: args.name,
            description: args.description,
            kind: args.kind,
            value: args.value,
            minimum_amount: args.minimum_amount,
            usage_limit: args.usage_limit,
            user_limit: None,
            starts_at: args.starts_at,
            expires_at: args.expires_at,
            is_active: !args.inactive,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("coupon_code: {}", coupon.code);
    println!("coupon_type: {}", coupon.kind);
    println!("coupon_value: {}", coupon.value);

    Ok(())
}
