// tests/keys/mod.rs
pub mod descriptor;
pub mod provider;
