//! List posts from the content source

use anyhow::Result;

use crate::helpers::format_post_date;
use crate::pagination::LoadMore;
use crate::Blog;

/// Print the first page of posts, or every page with `all`
pub async fn run(blog: &Blog, all: bool) -> Result<()> {
    let mut controller = blog.listing(1).await?;
    if all {
        while let LoadMore::Appended(_) = controller.load_more().await? {}
    }
    let state = controller.state();
    let tz = blog.config.tz();

    println!("Posts ({}):", state.items.len());
    for post in &state.items {
        let date = format_post_date(post.published.as_ref(), &tz, &blog.config.date_format);
        println!("  {:<11} - {} [{}]", date, post.title, post.key);
    }
    if state.has_more() {
        println!("  ... more posts available");
    }

    Ok(())
}
