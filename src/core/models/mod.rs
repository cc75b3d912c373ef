pub mod audit;
pub mod expense;
pub mod flat;
pub mod forecast;
pub mod payment;
pub mod user;
