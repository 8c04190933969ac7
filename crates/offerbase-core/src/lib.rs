//! Shared domain types and configuration for the offerbase workspace.
//!
//! The canonical coupon document lives here, together with the fixed
//! category / consumer-status / discount-type catalogs, the storage seam
//! used by the import pipeline, and environment-driven app configuration.

pub mod app_config;
pub mod config;
pub mod coupon;
pub mod store;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use coupon::{
    CouponRecord, DiscountType, CATEGORIES, CONSUMER_STATUSES, TERMS_SENTINEL,
};
pub use store::{CouponStore, StoreError};
