//! One-shot submissions: timecard entries and inventory consumption.

pub mod inventory;
pub mod timesheet;

pub use inventory::InventoryConsumptionSubmitter;
pub use timesheet::TimesheetSubmitter;
