//! ufw status inspection and allow-rule construction

use std::net::IpAddr;

/// One rule row from `ufw status` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UfwRule {
    pub to: String,
    pub action: RuleAction,
    pub from: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Allow,
    Deny,
    Reject,
    Limit,
    Other,
}

impl RuleAction {
    fn classify(action: &str) -> Self {
        let action = action.to_ascii_uppercase();
        if action.starts_with("ALLOW") {
            Self::Allow
        } else if action.starts_with("DENY") {
            Self::Deny
        } else if action.starts_with("REJECT") {
            Self::Reject
        } else if action.starts_with("LIMIT") {
            Self::Limit
        } else {
            Self::Other
        }
    }
}

/// The status text is treated as opaque: the address only has to appear in
/// it somewhere.
pub fn is_whitelisted(status: &str, ip: &IpAddr) -> bool {
    status.contains(&ip.to_string())
}

/// Expand the `{ip}` placeholder in the configured allow command.
pub fn allow_command(template: &str, ip: &IpAddr) -> String {
    template.replace("{ip}", &ip.to_string())
}

/// Best-effort parse of the rule table printed by `ufw status`.
///
/// Rows come after the `--` underline of the `To / Action / From` header;
/// columns are separated by runs of two or more spaces.
pub fn parse_ufw_status(status: &str) -> Vec<UfwRule> {
    let mut rules = Vec::new();
    let mut in_table = false;

    for line in status.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if !in_table {
            if trimmed.starts_with("--") {
                in_table = true;
            }
            continue;
        }

        let columns: Vec<&str> = trimmed
            .split("  ")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();

        if let [to, action, from, ..] = columns.as_slice() {
            rules.push(UfwRule {
                to: to.to_string(),
                action: RuleAction::classify(action),
                from: from.to_string(),
            });
        }
    }

    rules
}

/// Whether ufw reported itself as inactive. Rules added while inactive are
/// stored but not enforced.
pub fn is_inactive(status: &str) -> bool {
    status
        .lines()
        .any(|l| l.trim().eq_ignore_ascii_case("status: inactive"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "Status: active

To                         Action      From
--                         ------      ----
22/tcp                     ALLOW       Anywhere
8388                       ALLOW       203.0.113.7
Anywhere                   DENY        198.51.100.0/24
22/tcp (v6)                ALLOW       Anywhere (v6)
";

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_is_whitelisted_present() {
        assert!(is_whitelisted(STATUS, &ip("203.0.113.7")));
    }

    #[test]
    fn test_is_whitelisted_absent() {
        assert!(!is_whitelisted(STATUS, &ip("192.0.2.44")));
    }

    #[test]
    fn test_is_whitelisted_empty_status() {
        assert!(!is_whitelisted("", &ip("192.0.2.44")));
    }

    #[test]
    fn test_allow_command_substitutes_ip() {
        assert_eq!(
            allow_command("sudo ufw allow from {ip}", &ip("192.0.2.44")),
            "sudo ufw allow from 192.0.2.44"
        );
    }

    #[test]
    fn test_allow_command_without_placeholder() {
        assert_eq!(
            allow_command("ufw reload", &ip("192.0.2.44")),
            "ufw reload"
        );
    }

    #[test]
    fn test_parse_ufw_status() {
        let rules = parse_ufw_status(STATUS);
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0].to, "22/tcp");
        assert_eq!(rules[0].action, RuleAction::Allow);
        assert_eq!(rules[0].from, "Anywhere");
        assert_eq!(rules[1].from, "203.0.113.7");
        assert_eq!(rules[2].action, RuleAction::Deny);
        assert_eq!(rules[3].to, "22/tcp (v6)");
        assert_eq!(rules[3].from, "Anywhere (v6)");
    }

    #[test]
    fn test_parse_allow_in_action() {
        let status = "To  Action  From\n--  ------  ----\n443/tcp  ALLOW IN  Anywhere\n";
        let rules = parse_ufw_status(status);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].action, RuleAction::Allow);
    }

    #[test]
    fn test_parse_inactive_has_no_rules() {
        assert!(parse_ufw_status("Status: inactive\n").is_empty());
        assert!(is_inactive("Status: inactive\n"));
        assert!(!is_inactive(STATUS));
    }
}
