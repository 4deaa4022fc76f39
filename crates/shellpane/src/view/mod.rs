pub mod console_view;
pub mod layout;
pub mod theme;
