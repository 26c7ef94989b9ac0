//! RSS 2.0 feed rendering.

use axiom_common::BlogPost;
use axiom_common::constants::feed;
use chrono::{DateTime, Utc};

const NAMESPACES: &str = concat!(
    r#"xmlns:content="http://purl.org/rss/1.0/modules/content/" "#,
    r#"xmlns:wfw="http://wellformedweb.org/CommentAPI/" "#,
    r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
    r#"xmlns:atom="http://www.w3.org/2005/Atom" "#,
    r#"xmlns:sy="http://purl.org/rss/1.0/modules/syndication/" "#,
    r#"xmlns:slash="http://purl.org/rss/1.0/modules/slash/""#,
);

/// Escape text for XML element content and attribute values
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap text in CDATA, splitting any terminator inside it
fn cdata(input: &str) -> String {
    format!("<![CDATA[{}]]>", input.replace("]]>", "]]]]><![CDATA[>"))
}

fn render_item(site_url: &str, post: &BlogPost) -> String {
    let link = escape_xml(&format!("{}/blog/{}", site_url, post.slug.current));

    format!(
        r#"
    <item>
      <title>{title}</title>
      <link>{link}</link>
      <guid isPermaLink="true">{link}</guid>
      <description>{description}</description>
      <pubDate>{pub_date}</pubDate>
      <author>{email} ({author})</author>
    </item>"#,
        title = cdata(&post.title),
        description = cdata(post.excerpt.as_deref().unwrap_or_default()),
        pub_date = post.published_at.to_rfc2822(),
        email = feed::AUTHOR_EMAIL,
        author = escape_xml(post.author_name()),
    )
}

/// Render the blog feed. Zero posts yields a channel with no items.
pub fn render_feed(site_url: &str, posts: &[BlogPost], build_date: DateTime<Utc>) -> String {
    let site = escape_xml(site_url.trim_end_matches('/'));
    let items: String = posts
        .iter()
        .map(|post| render_item(site_url.trim_end_matches('/'), post))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0" {NAMESPACES}>
  <channel>
    <title>{title}</title>
    <atom:link href="{site}/api/rss" rel="self" type="application/rss+xml" />
    <link>{site}</link>
    <description>{description}</description>
    <language>{language}</language>
    <lastBuildDate>{build_date}</lastBuildDate>
    <managingEditor>{editor}</managingEditor>
    <webMaster>{editor}</webMaster>
    <image>
      <url>{site}{logo}</url>
      <title>{title}</title>
      <link>{site}</link>
    </image>{items}
  </channel>
</rss>
"#,
        title = feed::TITLE,
        description = escape_xml(feed::DESCRIPTION),
        language = feed::LANGUAGE,
        build_date = build_date.to_rfc2822(),
        editor = feed::EDITOR,
        logo = feed::LOGO_PATH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiom_common::{AuthorRef, Slug};
    use chrono::TimeZone;

    fn post(slug: &str, title: &str, excerpt: Option<&str>) -> BlogPost {
        BlogPost {
            id: format!("id-{slug}"),
            title: title.to_string(),
            slug: Slug {
                current: slug.to_string(),
            },
            author: Some(AuthorRef {
                name: "Jane Counsel".into(),
                image: None,
                bio: None,
            }),
            published_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            excerpt: excerpt.map(str::to_string),
            main_image: None,
            body: None,
            tags: vec![],
            featured: false,
        }
    }

    fn build_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 2, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_empty_feed_is_well_formed() {
        let xml = render_feed("https://axiomlegaldata.com", &[], build_date());

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" ?>"#));
        assert!(xml.contains("<title>Axiom Legal Data Blog</title>"));
        assert!(xml.contains(r#"<atom:link href="https://axiomlegaldata.com/api/rss""#));
        assert!(xml.contains("<lastBuildDate>Sun, 2 Mar 2025 08:30:00 +0000</lastBuildDate>"));
        assert!(!xml.contains("<item>"));
        assert!(xml.trim_end().ends_with("</rss>"));
    }

    #[test]
    fn test_items() {
        let posts = vec![
            post("legal-ai", "Legal AI", Some("Why synthetic data")),
            post("no-excerpt", "Second", None),
        ];
        let xml = render_feed("https://axiomlegaldata.com/", &posts, build_date());

        assert_eq!(xml.matches("<item>").count(), 2);
        assert!(xml.contains("<title><![CDATA[Legal AI]]></title>"));
        assert!(xml.contains("<link>https://axiomlegaldata.com/blog/legal-ai</link>"));
        assert!(xml.contains(
            r#"<guid isPermaLink="true">https://axiomlegaldata.com/blog/legal-ai</guid>"#
        ));
        assert!(xml.contains("<description><![CDATA[]]></description>"));
        assert!(xml.contains("<pubDate>Sat, 1 Mar 2025 12:00:00 +0000</pubDate>"));
        assert!(xml.contains("<author>noreply@axiomlegaldata.com (Jane Counsel)</author>"));
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let posts = vec![post("tricky", "Ends with ]]> here", None)];
        let xml = render_feed("https://axiomlegaldata.com", &posts, build_date());
        assert!(xml.contains("<![CDATA[Ends with ]]]]><![CDATA[> here]]>"));
    }

    #[test]
    fn test_link_is_escaped() {
        let posts = vec![post("a&b", "Amp", None)];
        let xml = render_feed("https://axiomlegaldata.com", &posts, build_date());
        assert!(xml.contains("<link>https://axiomlegaldata.com/blog/a&amp;b</link>"));
    }
}
