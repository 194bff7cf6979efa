pub mod diff_error;
pub mod diff_op;
pub mod primitive;
pub mod word_diff;
