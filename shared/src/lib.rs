pub mod error;
pub mod model;
pub mod types;

// Re-export commonly used items
pub use error::{EngineError, EngineResult};
pub use model::{
    CalendarDay, Employee, EmployeeId, EmployeeImportRow, ManualPins, Schedule, ShiftCode,
    Settings,
};
pub use types::{Department, Rank, RunStatus, ShiftFamily};
