//! Domain types and models

pub mod auth;
pub mod device;
pub mod inventory;
pub mod punch;
pub mod timecard;
pub mod timezone;
pub mod work;

pub use auth::{AuthenticateRequest, AuthenticateResponse, AuthenticatedUser, Credential, PinLogin};
pub use device::{DeviceMetadata, GeoLocation};
pub use inventory::{normalize_bar_code, InventoryConsumptionRequest, InventoryItem};
pub use punch::{ActivePunch, PunchInRequest, PunchOutRequest, PunchState};
pub use timecard::TimecardEntryRequest;
pub use timezone::TimeZoneCatalog;
pub use work::{Customer, Job, SelectableItem, Task, TaskNumber};
