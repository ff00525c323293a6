mod index;

pub use index::home_handler;
