//! Domain layer - business logic and services

pub mod codec;
pub mod definitions;
pub mod events;
pub mod reorder;
pub mod report;
pub mod repository;
pub mod service;
pub mod session;
pub mod settings;
pub mod store;
pub mod upgrade;
pub mod validation;
pub mod versions;

pub use codec::{Codec, ElementPattern, SettingParseError};
pub use definitions::{DefinitionError, DefinitionTable, SettingDefinition};
pub use events::{EventPublisher, NoOpEventPublisher, NotetypeEvent, TracingEventPublisher};
pub use report::{FailureReport, SettingFailure};
pub use repository::{NotetypeRepository, TemplateCatalog};
pub use service::{Service, ServiceOptions};
pub use session::{EditingSession, SessionManager};
pub use store::{ConfigStore, GENERAL_SCOPE};
