pub mod task;
pub mod user;

pub use task::{
    CreateTaskInput, NewTask, Task, TaskChanges, TaskQuery, TaskStatus, UpdateTaskInput,
};
pub use user::{NewUser, User};
