pub mod symbol_table;
pub mod word_tokenizer;
