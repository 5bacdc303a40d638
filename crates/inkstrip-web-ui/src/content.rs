use std::borrow::Cow;

use jotdown::{Attributes, Container, Event};
use maud::{Markup, PreEscaped};

const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Replace destinations with a scheme outside [`ALLOWED_URL_SCHEMES`]
///
/// Relative urls have no scheme and pass through.
fn sanitize_url(url: Cow<'_, str>) -> Cow<'_, str> {
    let scheme_end = url.find(':');
    let path_start = url.find(['/', '?', '#']);
    let scheme = match (scheme_end, path_start) {
        (Some(colon), Some(path)) if path < colon => None,
        (Some(colon), _) => Some(url[..colon].trim()),
        (None, _) => None,
    };

    let allowed = scheme.is_none_or(|scheme| {
        ALLOWED_URL_SCHEMES
            .iter()
            .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
    });

    if allowed { url } else { Cow::Borrowed("#") }
}

/// Render a post body written in djot
///
/// Raw html turns into code blocks, author-supplied attributes are dropped
/// and link and image destinations are limited to web and mail schemes.
/// Images are made responsive and lazy loaded.
pub(crate) fn render_post_body(body: &str) -> Markup {
    let sanitized = jotdown::Parser::new(body).map(|e| match e {
        Event::Start(Container::RawBlock { format }, _attrs) if format == "html" => {
            Event::Start(Container::CodeBlock { language: format }, Attributes::new())
        }
        Event::End(Container::RawBlock { format }) if format == "html" => {
            Event::End(Container::CodeBlock { language: format })
        }
        Event::Start(Container::RawInline { format }, _attr) if format == "html" => {
            Event::Start(Container::CodeBlock { language: format }, Attributes::new())
        }
        Event::End(Container::RawInline { format }) if format == "html" => {
            Event::End(Container::CodeBlock { language: format })
        }
        Event::Start(Container::Image(src, link_type), _attr) => Event::Start(
            Container::Image(sanitize_url(src), link_type),
            Attributes::try_from("{ .img-responsive loading=lazy }").expect("Can't fail"),
        ),
        Event::Start(Container::Link(dst, link_type), _attr) => Event::Start(
            Container::Link(sanitize_url(dst), link_type),
            Attributes::new(),
        ),
        Event::Start(container, _attr) => Event::Start(container, Attributes::new()),
        e => e,
    });

    PreEscaped(jotdown::html::render_to_string(sanitized))
}

#[cfg(test)]
mod tests {
    use super::{render_post_body, sanitize_url};

    #[test]
    fn renders_markup() {
        let html = render_post_body("Hello _world_").into_string();
        assert!(html.contains("<em>world</em>"), "{html}");
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_post_body("`<script>alert(1)</script>`{=html}").into_string();
        assert!(!html.contains("<script>"), "{html}");
        assert!(html.contains("&lt;script&gt;"), "{html}");

        let html = render_post_body("```=html\n<iframe src=x></iframe>\n```\n").into_string();
        assert!(!html.contains("<iframe"), "{html}");
    }

    #[test]
    fn author_attributes_are_dropped() {
        let html = render_post_body("{onclick=\"steal()\"}\nparagraph").into_string();
        assert!(!html.contains("onclick"), "{html}");
    }

    #[test]
    fn images_are_responsive() {
        let html = render_post_body("![page 1](https://cdn.example.com/p1.png)").into_string();
        assert!(html.contains("img-responsive"), "{html}");
        assert!(html.contains("loading=\"lazy\""), "{html}");
        assert!(html.contains("src=\"https://cdn.example.com/p1.png\""), "{html}");
    }

    #[test]
    fn unsafe_url_schemes_are_dropped() {
        for url in [
            "javascript:alert(1)",
            "JavaScript:alert(1)",
            "data:text/html,x",
            " vbscript:x",
        ] {
            assert_eq!(sanitize_url(url.into()), "#", "{url}");
        }
        for url in [
            "https://a.example/p.png",
            "http://a.example/",
            "mailto:me@a.example",
            "/2",
            "p.png",
            "/x?q=a:b",
            "#top",
        ] {
            assert_eq!(sanitize_url(url.into()), url, "{url}");
        }

        let html = render_post_body("[click](javascript:void)").into_string();
        assert!(!html.contains("javascript"), "{html}");
        let html = render_post_body("![x](javascript:void)").into_string();
        assert!(!html.contains("javascript"), "{html}");
        let html = render_post_body("[next](/2)").into_string();
        assert!(html.contains("href=\"/2\""), "{html}");
    }
}
