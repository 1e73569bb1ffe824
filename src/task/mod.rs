mod descriptor;
mod name;
mod registry;
mod wrapper;

pub use descriptor::{normalize, TaskDescriptor};
pub use name::{derive_task_name, DEFAULT_TASK};
pub use registry::{RegisteredTask, TaskRegistry};
pub use wrapper::{assemble_slots, invoke, ArgSlot, Done};
pub(crate) use wrapper::register_done_type;
