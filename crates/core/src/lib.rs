//! Countersign domain logic.
//!
//! Pure, database-free building blocks shared by the repository and API
//! layers: the domain error type, id/time aliases, plan ceilings, document
//! lifecycle rules, token generation, hashing, webhook signature
//! verification, and the signed-PDF certificate composer.

pub mod certificate;
pub mod error;
pub mod hashing;
pub mod lifecycle;
pub mod plan;
pub mod token;
pub mod types;
pub mod webhook;
