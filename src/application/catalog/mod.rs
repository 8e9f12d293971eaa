mod book_service;
mod errors;

pub use book_service::{
    ServiceDependencies, add_book_to_catalog, delete_book_from_catalog, edit_book, get_book,
    get_books,
};
pub use errors::{CatalogError, Result};
