//! Cartwright
//!
//! Cartwright is the client-side cart and checkout pricing core of a storefront: a persisted cart,
//! coupon validation, shipping and order totals, and the wishlist, compare and recently viewed
//! shelves that sit next to it.

pub mod backend;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod coupons;
pub mod fixtures;
pub mod money;
pub mod observability;
pub mod prelude;
pub mod products;
pub mod receipt;
pub mod requests;
pub mod shelves;
pub mod storage;
pub mod totals;
pub mod uuids;
