pub mod auth;
pub mod dashboard;
pub mod navigation;
pub mod product;
pub mod quote;
pub mod simulation;
pub mod storage;
