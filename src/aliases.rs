// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! Plaintext data keys only ever cross the provider boundary wrapped in
//! these aliases, so they are zeroized as soon as the caller drops them.

pub use secure_gate::dynamic_alias;

// Plaintext data key handed to / returned from a key provider
dynamic_alias!(pub DataKey, Vec<u8>);
