//! URL helper functions

/// Site-relative path of a post, e.g. `blog/` + `hello` -> `blog/hello`
pub fn post_link(blog_prefix: &str, slug: &str) -> String {
    format!("{}{}", blog_prefix, slug)
}

/// Join a base URL and a path without doubling or dropping the slash
///
/// # Examples
/// ```ignore
/// full_url("https://example.com/", "/blog/a") // -> "https://example.com/blog/a"
/// ```
pub fn full_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Root-relative URL for links inside generated pages
pub fn url_for(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_link() {
        assert_eq!(post_link("blog/", "a"), "blog/a");
        assert_eq!(post_link("", "a"), "a");
    }

    #[test]
    fn test_full_url() {
        assert_eq!(full_url("https://example.com", "blog/a"), "https://example.com/blog/a");
        assert_eq!(full_url("https://example.com/", "/blog/a"), "https://example.com/blog/a");
        assert_eq!(full_url("https://example.com/", ""), "https://example.com/");
    }

    #[test]
    fn test_url_for() {
        assert_eq!(url_for("blog/a/"), "/blog/a/");
        assert_eq!(url_for("/rss.xml"), "/rss.xml");
    }
}
