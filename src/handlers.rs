pub mod auth;
pub mod dashboard;
pub mod exporter;
pub mod navigation;
pub mod products;
pub mod quote_requests;
pub mod simulations;
pub mod uploads;
