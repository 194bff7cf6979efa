pub const DEFAULT_CONTEXT_WORDS: usize = 2;
pub const DEFAULT_CONTEXT_WINDOW: usize = 3;
pub const DEFAULT_ELLIPSIS: &str = "...";
