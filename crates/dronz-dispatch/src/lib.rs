//! Shared library surface for the dispatch binary and its tests.

pub mod backoff;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod output;

pub use cache::RouteCache;
pub use config::Config;
pub use dispatch::{dispatch_orders, DeliveryDay, DispatchError, OrderFlight, APPLETON_TOWER};
