use crate::application::catalog::{
    Result, ServiceDependencies, add_book_to_catalog, delete_book_from_catalog,
};
use crate::domain::book::Book;

/// 起動時のテストデータ投入
///
/// TESTDATA=trueのときだけmainから呼ばれる。各フィクスチャを
/// 削除してから登録し直すため、再起動をまたいでも冪等。
pub async fn load_book_test_data(deps: &ServiceDependencies) -> Result<()> {
    let fixtures = [
        Book::new("1234567890", "Northern Lights", "Lyra Silverstar", 9.9),
        Book::new("1234567891", "Polar Journey", "Iorek Polarson", 12.90),
    ];

    for book in fixtures {
        let isbn = book.isbn.clone();
        delete_book_from_catalog(deps, &isbn).await?;
        add_book_to_catalog(deps, book).await?;
        tracing::info!("loaded fixture book {}", isbn);
    }

    Ok(())
}
