pub mod datatype;
pub mod entity;
pub mod schedule;
pub mod service;
mod transform;
pub mod validation;
