//! Cartwright prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    backend::{BackendError, CatalogSnapshots, CouponLookup, OrderGateway},
    cart::{CART_STORAGE_KEY, CartError, CartLine, CartStore, LineUuid, NewCartLine},
    checkout::{
        ApplyCouponError, Checkout, CheckoutError, OrderItem, OrderRequest, PaymentMethod,
        PendingCouponLookup, PlacedOrder, ShippingAddress,
    },
    coupons::{
        AppliedCoupon, Coupon, CouponCode, CouponDiscount, CouponError, CouponRecord,
        CouponRecordError, DiscountType, evaluate,
    },
    money::{PriceError, apply_cap, percent_of, round_currency},
    products::{Product, ProductSnapshot, ProductUuid},
    receipt::{Receipt, ReceiptError},
    requests::{RequestSequencer, RequestTicket},
    shelves::{
        AddOutcome, CompareList, RecentlyViewed, ShelfEntry, ShelfError, Wishlist,
        WishlistAlert, WishlistInsight, wishlist_insights,
    },
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    totals::{OrderTotals, ShippingPolicy, TotalsError, compute_totals},
};
