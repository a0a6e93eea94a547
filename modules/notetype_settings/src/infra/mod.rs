//! Infrastructure layer - storage and template catalog

pub mod catalog;
pub mod storage;
