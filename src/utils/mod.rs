pub mod buffer_text;
pub mod format_key_values;
