mod color_choice;
mod log_level;
mod print_order;

pub use color_choice::ColorChoice;
pub use log_level::LogLevel;
pub use print_order::PrintOrder;
