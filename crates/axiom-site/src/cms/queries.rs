//! GROQ queries for blog content.

/// Published posts, newest first, at most `limit` of them
pub fn recent_posts(limit: usize) -> String {
    format!(
        r#"*[_type == "post" && publishedAt <= now()] | order(publishedAt desc)[0...{limit}] {{
  _id, title, slug, author->{{name}}, publishedAt, excerpt
}}"#
    )
}

pub const PUBLISHED_POSTS: &str = r#"*[_type == "post" && publishedAt <= now()] | order(publishedAt desc) {
  _id, title, slug, author->{name, image}, publishedAt, excerpt, mainImage, tags, featured
}"#;

pub const FEATURED_POST: &str = r#"*[_type == "post" && featured == true && publishedAt <= now()] | order(publishedAt desc)[0] {
  _id, title, slug, author->{name, image}, publishedAt, excerpt, mainImage, tags, featured
}"#;

/// Takes `$slug`
pub const POST_BY_SLUG: &str = r#"*[_type == "post" && slug.current == $slug && publishedAt <= now()][0] {
  _id, title, slug, author->{name, image, bio}, publishedAt, excerpt, mainImage, body, tags, seo
}"#;

/// Takes `$currentPostId` and `$tags`
pub fn related_posts(limit: usize) -> String {
    format!(
        r#"*[_type == "post" && _id != $currentPostId && count(tags[@ in $tags]) > 0 && publishedAt <= now()] | order(publishedAt desc)[0...{limit}] {{
  _id, title, slug, author->{{name, image}}, publishedAt, excerpt, mainImage, tags
}}"#
    )
}
