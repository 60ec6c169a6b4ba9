mod entity_list;
mod product_detail;
mod product_list;
mod purchase_detail;
mod purchase_list;

pub use entity_list::{Column, EntityListView, SortFieldSpec};
pub use product_detail::ProductDetailView;
pub use product_list::product_list;
pub use purchase_detail::PurchaseDetailView;
pub use purchase_list::PurchaseListView;
