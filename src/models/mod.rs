pub mod task;
pub mod user;

pub use task::{Task, TaskCreate, TaskListQuery, TaskPriority, TaskRow, TaskUpdate};
pub use user::{User, UserResponse};
