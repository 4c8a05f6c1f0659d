pub mod config;
pub mod datetime;
pub mod edit;
pub mod filter;
pub mod gesture;
pub mod grid;
pub mod layout;
pub mod store;
pub mod task;

pub use config::AlmanacConfig;
pub use edit::{
  EditOutcome,
  EditRequest,
  apply_edit
};
pub use filter::{
  TaskFilter,
  TimeWindow
};
pub use gesture::{
  GestureMachine,
  GestureOutcome
};
pub use grid::MonthGrid;
pub use layout::{
  MonthLayout,
  layout_month
};
pub use store::TaskStore;
pub use task::{
  Category,
  Task,
  TaskId
};
