//! Site-wide settings keys and defaults.

/// Settings key of the banner image URL
pub const SETTING_BANNER_URL: &str = "banner_url";
/// Settings key of the site title override
pub const SETTING_SITE_TITLE: &str = "site_title";

pub const DEFAULT_BANNER_URL: &str = "/static/images/banner.png";
pub const DEFAULT_SITE_TITLE: &str = "inkstrip";

/// Rewrite every `http://` reference in `url` to `https://`
///
/// Used when the admin submits a banner URL over a secure connection, so the
/// page does not end up loading mixed content.
pub fn upgrade_insecure_scheme(url: &str) -> String {
    url.replace("http://", "https://")
}

#[cfg(test)]
mod tests {
    use super::upgrade_insecure_scheme;

    #[test]
    fn upgrades_embedded_references() {
        assert_eq!(
            upgrade_insecure_scheme("http://cdn.example.com/b.png"),
            "https://cdn.example.com/b.png"
        );
        assert_eq!(
            upgrade_insecure_scheme("https://proxy.example/?u=http://a.example/b.png"),
            "https://proxy.example/?u=https://a.example/b.png"
        );
        assert_eq!(upgrade_insecure_scheme("/static/b.png"), "/static/b.png");
    }
}
