mod file;

pub use file::{FileKind, FileRecord, NewFileRecord, ParentRef};
