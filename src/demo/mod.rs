pub mod book_data_loader;

pub use book_data_loader::load_book_test_data;
