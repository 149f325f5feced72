// Handlers module

pub mod generate;
pub mod list_models;
pub mod rejection;

pub use generate::generate_handler;
pub use list_models::list_models_handler;
pub use rejection::handle_rejection;
