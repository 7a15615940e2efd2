pub mod format;
pub mod map;
pub mod panels;
pub mod table;
