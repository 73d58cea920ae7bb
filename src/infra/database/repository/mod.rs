//! Queries by schema.
//!
//! Every function takes any postgres executor, so the use case decides
//! whether it runs on the pool or inside a transaction.

pub mod event;
pub mod hardware;
pub mod iam;
pub mod registration;
pub mod review;
