pub mod diagnose;
pub mod health;
pub mod symptoms;
