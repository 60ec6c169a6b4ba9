//! Generic list-query machinery: query state bound to a route query
//! string, request payload construction, and the controller that drives
//! fetching through the cache engine.

pub mod controller;
pub mod params;
pub mod resource;
pub mod state;

pub use controller::ListController;
pub use params::{ListOptions, PaginationMode, Payload, SortDirection};
pub use resource::{Page, Resource};
pub use state::ListQueryState;
