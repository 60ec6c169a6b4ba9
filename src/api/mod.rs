pub mod auth;
pub mod client;
pub mod resources;
pub mod types;
pub mod wire;

pub use auth::AuthClient;
pub use client::ApiClient;
pub use resources::{ProductResource, PurchaseResource};
pub use types::{Allocation, Product, PurchaseOrder, Warehouse};
