//! Domain types shared by the poller, the ledger, and the adapters.

pub mod item;
pub mod stage;
pub mod task;

pub use item::{BoardSnapshot, FieldValue, Item, ItemContent, ItemId, ItemKind, LinkedContent, OptionId};
pub use stage::{
    FieldDefinition, FieldOption, FieldSchema, ProjectFields, Stage, StageNames, StatusUpdate,
};
pub use task::{extract_task_text, Task};
