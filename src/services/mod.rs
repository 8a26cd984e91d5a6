pub mod health;
pub mod prefetch;
