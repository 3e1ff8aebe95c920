pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod filter;
pub mod form;
pub mod metrics;
pub mod notifications;
pub mod store;
pub mod telemetry;

pub use error::{FormError, StoreError, ValidationError};
pub use filter::{visible, DateFilter, Filters, PetFilter};
pub use form::{FormSession, FormState, Submitted};
pub use store::RecordStore;
