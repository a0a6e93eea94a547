//! API layer - REST binder and in-process client

pub mod native;
pub mod rest;
