mod table;

pub use table::Formatter;
