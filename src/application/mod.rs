/// Application layer - Use cases and DTOs
///
/// This layer contains the application logic that orchestrates
/// domain services and coordinates with infrastructure through ports.
pub mod cache;
pub mod dto;
pub mod factories;
pub mod resolvers;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;
