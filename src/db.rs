pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod quote_repo;
pub use quote_repo::QuoteRepository;
pub mod simulation_repo;
pub use simulation_repo::SimulationRepository;

#[cfg(test)]
pub mod test_support;
