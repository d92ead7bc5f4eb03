pub mod field_row;
