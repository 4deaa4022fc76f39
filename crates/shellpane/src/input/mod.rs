pub mod key_translator;
