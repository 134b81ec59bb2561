//! List the detail page paths of the first page

use anyhow::Result;

use crate::navigation::{Navigator, Route};
use crate::Blog;

/// Print one detail path per post on the first page
pub async fn run(blog: &Blog) -> Result<()> {
    let page = blog
        .source()
        .query_first_page(blog.config.page_size)
        .await?;
    let nav = blog.navigator();

    for post in page.items {
        println!("{}", nav.go_to(&Route::Post(post.key)));
    }

    Ok(())
}
