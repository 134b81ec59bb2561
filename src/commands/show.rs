//! Show a single post

use anyhow::Result;

use crate::content::{estimate_reading_time, word_count, PostKey};
use crate::helpers::format_post_date;
use crate::Blog;

/// Print the header of a post and its reading time
pub async fn run(blog: &Blog, slug: &str) -> Result<()> {
    let key = PostKey::parse(slug)?;
    let post = blog.source().query_by_key(&key).await?;
    let date = format_post_date(
        post.published.as_ref(),
        &blog.config.tz(),
        &blog.config.date_format,
    );

    println!("{}", post.title);
    println!("  author:       {}", post.author);
    println!("  published:    {}", if date.is_empty() { "-" } else { date.as_str() });
    println!("  sections:     {}", post.content.len());
    println!("  words:        {}", word_count(&post.content));
    println!("  reading time: {} min", estimate_reading_time(&post.content));

    Ok(())
}
