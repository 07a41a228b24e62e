pub mod auth;
pub mod dashboard_service;
pub mod navigation_service;
pub mod product_service;
pub mod quote_service;
pub mod simulation_service;
pub mod storage_service;

pub use dashboard_service::DashboardService;
pub use product_service::ProductService;
pub use quote_service::QuoteService;
pub use simulation_service::SimulationService;
pub use storage_service::StorageService;
