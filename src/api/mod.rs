//! Client for the relief coordination REST backend

pub mod auth;
pub mod client;
pub mod errors;
pub mod grid;
pub mod reference;
pub mod session;
pub mod shipments;
pub mod types;
pub mod volunteers;

pub use auth::{AuthApi, AuthStatus, AuthUser};
pub use client::ApiClient;
pub use errors::{ApiError, ApiResult};
pub use grid::{FilterItem, FilterValue, GridQuery, SortDirection, SortItem, VolunteerListParams};
pub use reference::{CargoType, ShipmentStatus, VolunteerType, CITIES};
pub use session::{connect, SessionStore};
pub use shipments::ShipmentsApi;
pub use types::*;
pub use volunteers::VolunteersApi;
