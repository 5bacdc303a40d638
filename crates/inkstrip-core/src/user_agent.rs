//! Telling crawlers apart from people reading the comic.

/// Who is looking at a post, as far as view counters are concerned
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewerKind {
    Human,
    Bot,
}

/// Lowercase substrings found in user agents of crawlers, link previewers
/// and scripted HTTP clients.
const BOT_SIGNATURES: &[&str] = &[
    "bot",
    "crawler",
    "crawling",
    "spider",
    "slurp",
    "archiver",
    "facebookexternalhit",
    "mediapartners-google",
    "adsbot-google",
    "bingpreview",
    "embedly",
    "pinterest",
    "quora link preview",
    "whatsapp",
    "vkshare",
    "headlesschrome",
    "phantomjs",
    "lighthouse",
    "curl/",
    "wget/",
    "python-requests",
    "python-urllib",
    "aiohttp",
    "go-http-client",
    "java/",
    "okhttp",
    "libwww-perl",
    "httpclient",
    "scrapy",
    "feedfetcher",
    "feedparser",
];

impl ViewerKind {
    /// Classify a request by its `User-Agent` header
    ///
    /// A missing or blank header counts as a bot: browsers always send one.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
            return ViewerKind::Bot;
        };

        let ua = ua.to_ascii_lowercase();
        if BOT_SIGNATURES.iter().any(|sig| ua.contains(sig)) {
            ViewerKind::Bot
        } else {
            ViewerKind::Human
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerKind;

    #[test]
    fn browsers_are_human() {
        for ua in [
            "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
        ] {
            assert_eq!(ViewerKind::from_user_agent(Some(ua)), ViewerKind::Human, "{ua}");
        }
    }

    #[test]
    fn crawlers_are_bots() {
        for ua in [
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
            "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)",
            "Mozilla/5.0 (compatible; Yahoo! Slurp; http://help.yahoo.com/help/us/ysearch/slurp)",
            "facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)",
            "curl/8.5.0",
            "python-requests/2.31.0",
        ] {
            assert_eq!(ViewerKind::from_user_agent(Some(ua)), ViewerKind::Bot, "{ua}");
        }
    }

    #[test]
    fn missing_user_agent_is_bot() {
        assert_eq!(ViewerKind::from_user_agent(None), ViewerKind::Bot);
        assert_eq!(ViewerKind::from_user_agent(Some("  ")), ViewerKind::Bot);
    }
}
