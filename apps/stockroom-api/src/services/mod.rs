//! Service implementations for the Stockroom API.

pub mod product_service;
pub mod sale_service;

pub use product_service::ProductService;
pub use sale_service::SaleService;
