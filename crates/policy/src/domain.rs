//! Domain rules — hostname allow/deny checks with `*.suffix` wildcards.

use ironsieve_core::{PolicyDecision, PolicyError};
use regex_lite::Regex;
use tracing::debug;
use url::Url;

/// A domain pattern compiled once at engine construction.
///
/// `*.example.com` matches any subdomain; `example.com` matches only
/// itself. Matching is case-insensitive and fully anchored.
pub struct DomainRule {
    pub raw: String,
    regex: Regex,
}

impl DomainRule {
    pub fn compile(pattern: &str) -> Result<Self, PolicyError> {
        let escaped = pattern.replace('.', r"\.").replace('*', ".*");
        let regex = Regex::new(&format!("(?i)^{escaped}$")).map_err(|e| {
            PolicyError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    fn matches(&self, hostname: &str) -> bool {
        self.regex.is_match(hostname)
    }
}

/// Compiled web-domain policy for one configuration lifetime.
pub struct DomainRules {
    pub enabled: bool,
    allowed: Vec<DomainRule>,
    denied: Vec<DomainRule>,
}

impl DomainRules {
    pub fn compile(
        enabled: bool,
        allowed_domains: &[String],
        denied_domains: &[String],
    ) -> Result<Self, PolicyError> {
        let allowed = allowed_domains
            .iter()
            .map(|p| DomainRule::compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        let denied = denied_domains
            .iter()
            .map(|p| DomainRule::compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            enabled,
            allowed,
            denied,
        })
    }

    /// Render a decision for a candidate URL.
    ///
    /// An unparsable URL (or one with no hostname) is a hard block —
    /// never a default allow. Denied patterns win; an empty allow list
    /// means allow-all.
    pub fn check(&self, url_string: &str) -> PolicyDecision {
        let hostname = match Url::parse(url_string) {
            Ok(url) => match url.host_str() {
                Some(host) => host.to_string(),
                None => return PolicyDecision::block("Invalid URL"),
            },
            Err(_) => return PolicyDecision::block("Invalid URL"),
        };
        debug!("Domain check: {url_string} -> {hostname}");

        for rule in &self.denied {
            if rule.matches(&hostname) {
                return PolicyDecision::block(format!(
                    "Domain matches denied pattern: {}",
                    rule.raw
                ));
            }
        }

        if self.allowed.is_empty() {
            return PolicyDecision::allow();
        }

        for rule in &self.allowed {
            if rule.matches(&hostname) {
                return PolicyDecision::allow();
            }
        }

        PolicyDecision::block("Domain not in allowed domains")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_a_hard_block() {
        let rules = DomainRules::compile(true, &[], &[]).unwrap();
        let decision = rules.check("not a url");
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("Invalid URL"));
    }

    #[test]
    fn url_without_host_is_a_hard_block() {
        let rules = DomainRules::compile(true, &[], &[]).unwrap();
        assert!(!rules.check("file:///etc/passwd").allowed);
    }

    #[test]
    fn wildcard_matches_any_subdomain() {
        let rule = DomainRule::compile("*.example.com").unwrap();
        assert!(rule.matches("api.example.com"));
        assert!(rule.matches("deep.api.example.com"));
        assert!(!rule.matches("example.org"));
    }

    #[test]
    fn bare_domain_matches_only_itself() {
        let rule = DomainRule::compile("example.com").unwrap();
        assert!(rule.matches("example.com"));
        assert!(rule.matches("EXAMPLE.COM"));
        assert!(!rule.matches("evil-example.com"));
        assert!(!rule.matches("api.example.com"));
    }

    #[test]
    fn deny_wins_over_allow() {
        let rules = DomainRules::compile(
            true,
            &["*.example.com".into()],
            &["internal.example.com".into()],
        )
        .unwrap();
        let decision = rules.check("https://internal.example.com/admin");
        assert!(!decision.allowed);
        assert!(
            decision
                .reason
                .as_deref()
                .unwrap()
                .contains("internal.example.com")
        );
        assert!(rules.check("https://api.example.com/v1").allowed);
    }

    #[test]
    fn empty_allow_list_defaults_to_allow() {
        let rules = DomainRules::compile(true, &[], &["*.evil.test".into()]).unwrap();
        assert!(rules.check("https://anything.example.net/").allowed);
        assert!(!rules.check("https://c2.evil.test/beacon").allowed);
    }

    #[test]
    fn host_not_in_allow_list_is_blocked() {
        let rules = DomainRules::compile(true, &["api.github.com".into()], &[]).unwrap();
        assert!(rules.check("https://api.github.com/repos").allowed);
        let decision = rules.check("https://pastebin.com/raw/x");
        assert!(!decision.allowed);
        assert_eq!(
            decision.reason.as_deref(),
            Some("Domain not in allowed domains")
        );
    }
}
