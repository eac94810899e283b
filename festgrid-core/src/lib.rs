pub mod common;
pub mod domain;
pub mod reconcile;
pub mod storage;

pub use domain::*;
