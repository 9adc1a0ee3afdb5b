//! Domain model (ids, tasks, columns, board, progress, rejections, events).

pub mod board;
pub mod column;
pub mod errors;
pub mod events;
pub mod ids;
pub mod progress;
pub mod task;

pub use board::{Board, InvalidBoard};
pub use column::{Column, ColumnId, ColumnTitles};
pub use errors::Rejection;
pub use events::BoardEvent;
pub use ids::{OperationId, TaskId};
pub use progress::{FlowStatus, ProgressKind, ProgressProfile};
pub use task::{Priority, Task};
