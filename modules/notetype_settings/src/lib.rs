//! Notetype Settings Module
//!
//! Reads and rewrites the user-tweakable settings embedded in the card
//! templates and stylesheets of authored notetype families, keeps copies of
//! a family in sync and upgrades them to newer authored versions.

// Public exports
pub mod contract;
pub use contract::{
    client::NotetypeSettingsApi, error::NotetypeSettingsError, BatchReport, CardTemplate,
    FailedSetting, FamilyStatus, Notetype, NotetypeField, SessionSnapshot, SettingDescriptor,
    SettingSection, SettingTarget, SettingValue,
};

pub mod module;
pub use module::NotetypeSettingsModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
