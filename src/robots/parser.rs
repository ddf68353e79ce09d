//! Robots.txt parser and rule evaluator
//!
//! Only the `User-agent`, `Allow`, `Disallow`, `Crawl-delay` and `Sitemap`
//! directives are understood. Matching is prefix based with an optional
//! trailing `*`, and Allow rules are always consulted before Disallow rules.

use std::collections::HashMap;
use std::time::Duration;

/// Rules attached to a single `User-agent` line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleGroup {
    /// Allow patterns in file order
    pub allow: Vec<String>,
    /// Disallow patterns in file order (may contain empty patterns)
    pub disallow: Vec<String>,
    /// Group-specific crawl delay
    pub crawl_delay: Option<Duration>,
}

impl RuleGroup {
    /// Checks a URL path against this group
    ///
    /// Any matching Allow pattern wins immediately. Otherwise any matching
    /// Disallow pattern denies. Paths matching neither are allowed.
    pub fn is_allowed(&self, path: &str) -> bool {
        if self.allow.iter().any(|pattern| matches_pattern(path, pattern)) {
            return true;
        }

        !self
            .disallow
            .iter()
            .any(|pattern| matches_pattern(path, pattern))
    }
}

/// Outcome of a robots check for one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotsVerdict {
    pub allowed: bool,
    pub crawl_delay: Duration,
}

impl RobotsVerdict {
    /// The fail-open verdict: allowed, no delay
    pub fn allow_all() -> Self {
        Self {
            allowed: true,
            crawl_delay: Duration::ZERO,
        }
    }
}

/// Parsed robots.txt for one origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    /// Rule groups keyed by lower-cased user agent token
    groups: HashMap<String, RuleGroup>,
    /// Crawl delay declared before any `User-agent` line
    default_crawl_delay: Option<Duration>,
    sitemaps: Vec<String>,
}

impl RobotsPolicy {
    /// Parses robots.txt content
    ///
    /// Parsing never fails. Unknown directives, lines without a colon, and
    /// malformed crawl delays are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use kumo_search::robots::RobotsPolicy;
    ///
    /// let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /private");
    /// assert!(!policy.evaluate("/private/a", "kumo").allowed);
    /// assert!(policy.evaluate("/public", "kumo").allowed);
    /// ```
    pub fn parse(content: &str) -> Self {
        let mut policy = Self::default();
        let mut current: Option<String> = None;

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    let agent = value.to_lowercase();
                    policy.groups.entry(agent.clone()).or_default();
                    current = Some(agent);
                }
                "allow" => {
                    if value.is_empty() {
                        continue;
                    }
                    if let Some(group) = current.as_ref().and_then(|a| policy.groups.get_mut(a)) {
                        group.allow.push(value.to_string());
                    }
                }
                "disallow" => {
                    if let Some(group) = current.as_ref().and_then(|a| policy.groups.get_mut(a)) {
                        group.disallow.push(value.to_string());
                    }
                }
                "crawl-delay" => {
                    let Ok(secs) = value.parse::<u64>() else {
                        continue;
                    };
                    let delay = Duration::from_secs(secs);
                    match current.as_ref().and_then(|a| policy.groups.get_mut(a)) {
                        Some(group) => group.crawl_delay = Some(delay),
                        None => policy.default_crawl_delay = Some(delay),
                    }
                }
                "sitemap" => policy.sitemaps.push(value.to_string()),
                _ => {}
            }
        }

        policy
    }

    /// Evaluates a URL path for the given user agent
    ///
    /// The group named after `user_agent` (case-insensitive) is used if
    /// present, then the `*` group. With neither, the path is allowed and
    /// the domain default delay applies.
    pub fn evaluate(&self, path: &str, user_agent: &str) -> RobotsVerdict {
        let default_delay = self.default_crawl_delay.unwrap_or(Duration::ZERO);

        let Some(group) = self.group(user_agent).or_else(|| self.group("*")) else {
            return RobotsVerdict {
                allowed: true,
                crawl_delay: default_delay,
            };
        };

        // A zero group delay defers to the domain default
        let crawl_delay = group
            .crawl_delay
            .filter(|delay| !delay.is_zero())
            .unwrap_or(default_delay);

        RobotsVerdict {
            allowed: group.is_allowed(path),
            crawl_delay,
        }
    }

    pub fn group(&self, user_agent: &str) -> Option<&RuleGroup> {
        self.groups.get(&user_agent.to_lowercase())
    }

    pub fn default_crawl_delay(&self) -> Option<Duration> {
        self.default_crawl_delay
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }
}

/// Matches a URL path against a robots pattern
///
/// An empty pattern never matches. A trailing `*` turns the rest of the
/// pattern into a prefix. Any other pattern matches the identical path or
/// any path it prefixes.
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        return path.starts_with(prefix);
    }

    path == pattern || path.starts_with(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_pattern() {
        assert!(matches_pattern("/private/secret", "/private*"));
        assert!(matches_pattern("/private", "/private*"));
        assert!(!matches_pattern("/priv", "/private*"));
    }

    #[test]
    fn test_plain_pattern_is_prefix() {
        assert!(matches_pattern("/exact", "/exact"));
        assert!(matches_pattern("/exact/sub", "/exact"));
        assert!(!matches_pattern("/exa", "/exact"));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        assert!(!matches_pattern("/", ""));
        assert!(!matches_pattern("", ""));
    }

    #[test]
    fn test_allow_checked_before_disallow() {
        let policy = RobotsPolicy::parse("User-agent: *\nAllow: /a*\nDisallow: /a");
        assert!(policy.evaluate("/ab", "kumo").allowed);
        assert!(policy.evaluate("/a", "kumo").allowed);
    }

    #[test]
    fn test_allow_wins_regardless_of_order() {
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /private\nAllow: /private/public");
        assert!(!policy.evaluate("/private", "kumo").allowed);
        assert!(!policy.evaluate("/private/other", "kumo").allowed);
        assert!(policy.evaluate("/private/public", "kumo").allowed);
    }

    #[test]
    fn test_disallow_all() {
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /");
        assert!(!policy.evaluate("/", "kumo").allowed);
        assert!(!policy.evaluate("/page", "kumo").allowed);
    }

    #[test]
    fn test_empty_disallow_allows_everything() {
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow:");
        assert!(policy.evaluate("/anything", "kumo").allowed);
        assert_eq!(policy.group("*").map(|g| g.disallow.len()), Some(1));
    }

    #[test]
    fn test_empty_allow_is_dropped() {
        let policy = RobotsPolicy::parse("User-agent: *\nAllow:\nDisallow: /");
        assert!(policy.group("*").unwrap().allow.is_empty());
        assert!(!policy.evaluate("/x", "kumo").allowed);
    }

    #[test]
    fn test_specific_agent_preferred_over_wildcard() {
        let content = "User-agent: Kumo\nDisallow: /\n\nUser-agent: *\nDisallow: /admin";
        let policy = RobotsPolicy::parse(content);

        assert!(!policy.evaluate("/page", "kumo").allowed);
        assert!(!policy.evaluate("/page", "KUMO").allowed);
        assert!(policy.evaluate("/page", "otherbot").allowed);
        assert!(!policy.evaluate("/admin", "otherbot").allowed);
    }

    #[test]
    fn test_specific_group_does_not_merge_wildcard() {
        let content = "User-agent: *\nDisallow: /admin\n\nUser-agent: kumo\nDisallow: /tmp";
        let policy = RobotsPolicy::parse(content);
        assert!(policy.evaluate("/admin", "kumo").allowed);
        assert!(!policy.evaluate("/tmp", "kumo").allowed);
    }

    #[test]
    fn test_no_matching_group_allows() {
        let policy = RobotsPolicy::parse("User-agent: otherbot\nDisallow: /");
        let verdict = policy.evaluate("/page", "kumo");
        assert_eq!(verdict, RobotsVerdict::allow_all());
    }

    #[test]
    fn test_repeated_user_agent_reuses_group() {
        let content = "User-agent: *\nDisallow: /a\n\nUser-agent: *\nDisallow: /b";
        let policy = RobotsPolicy::parse(content);
        assert_eq!(policy.group("*").unwrap().disallow, vec!["/a", "/b"]);
    }

    #[test]
    fn test_group_crawl_delay() {
        let policy = RobotsPolicy::parse("User-agent: *\nCrawl-delay: 3\nDisallow: /admin");
        assert_eq!(
            policy.evaluate("/", "kumo").crawl_delay,
            Duration::from_secs(3)
        );
    }

    #[test]
    fn test_domain_default_crawl_delay() {
        let content = "Crawl-delay: 7\nUser-agent: *\nDisallow: /admin";
        let policy = RobotsPolicy::parse(content);

        assert_eq!(policy.default_crawl_delay(), Some(Duration::from_secs(7)));
        assert_eq!(
            policy.evaluate("/", "kumo").crawl_delay,
            Duration::from_secs(7)
        );
        assert_eq!(
            policy.evaluate("/", "anybot").crawl_delay,
            Duration::from_secs(7)
        );
    }

    #[test]
    fn test_group_delay_overrides_default() {
        let content = "Crawl-delay: 7\nUser-agent: kumo\nCrawl-delay: 2\n\nUser-agent: *\nDisallow:";
        let policy = RobotsPolicy::parse(content);

        assert_eq!(
            policy.evaluate("/", "kumo").crawl_delay,
            Duration::from_secs(2)
        );
        assert_eq!(
            policy.evaluate("/", "otherbot").crawl_delay,
            Duration::from_secs(7)
        );
    }

    #[test]
    fn test_non_integer_crawl_delay_ignored() {
        let policy = RobotsPolicy::parse("User-agent: *\nCrawl-delay: 2.5");
        assert_eq!(policy.evaluate("/", "kumo").crawl_delay, Duration::ZERO);
    }

    #[test]
    fn test_case_insensitive_directives() {
        let policy = RobotsPolicy::parse("USER-AGENT: *\nDISALLOW: /admin\ncrawl-DELAY: 1");
        let verdict = policy.evaluate("/admin", "kumo");
        assert!(!verdict.allowed);
        assert_eq!(verdict.crawl_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_sitemaps_collected() {
        let content = "Sitemap: https://example.com/a.xml\nUser-agent: *\nDisallow:\nSitemap: https://example.com/b.xml";
        let policy = RobotsPolicy::parse(content);
        assert_eq!(
            policy.sitemaps(),
            &[
                "https://example.com/a.xml".to_string(),
                "https://example.com/b.xml".to_string()
            ]
        );
    }

    #[test]
    fn test_comments_and_garbage_ignored() {
        let content = "# comment\nnot a directive\nUser-agent: *\n# Disallow: /\nNoindex: /x\nDisallow: /y";
        let policy = RobotsPolicy::parse(content);
        assert!(policy.evaluate("/", "kumo").allowed);
        assert!(policy.evaluate("/x", "kumo").allowed);
        assert!(!policy.evaluate("/y", "kumo").allowed);
    }

    #[test]
    fn test_rules_before_user_agent_ignored() {
        let policy = RobotsPolicy::parse("Disallow: /\nUser-agent: *\nDisallow: /a");
        assert!(policy.evaluate("/b", "kumo").allowed);
    }

    #[test]
    fn test_empty_content() {
        let policy = RobotsPolicy::parse("");
        assert_eq!(policy.evaluate("/any", "kumo"), RobotsVerdict::allow_all());
        assert!(policy.sitemaps().is_empty());
    }
}
