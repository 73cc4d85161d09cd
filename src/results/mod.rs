pub mod columns;
pub mod format;
pub mod pagination;
pub mod table;
