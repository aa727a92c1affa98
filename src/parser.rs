//! Line grammar shared by every ingestion path: hosts files, uBlock rules and
//! plain domain lists all reduce to the same [`ParsedLine`].

use std::net::Ipv4Addr;

/// A data line reduced to its normalized domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub domain: String,
    /// Everything after `$` on a uBlock rule.
    pub options: Option<String>,
    /// The token carried a leading `*.` marker.
    pub wildcard: bool,
}

const SINKHOLE_ADDRS: [&str; 2] = ["0.0.0.0", "127.0.0.1"];

// Loopback names hosts files map to themselves; dot-less ones fail the domain check anyway.
const LOCAL_NAMES: [&str; 2] = ["localhost.localdomain", "ip6-localhost.localdomain"];

/// Parses one raw line. Comments, blanks and anything malformed yield `None`.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        return None;
    }

    if let Some(rule) = line.strip_prefix("||") {
        return parse_ublock_rule(rule);
    }

    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;
    if SINKHOLE_ADDRS.contains(&first) {
        // Extra hostnames or a trailing comment after the first token are ignored.
        return normalize_token(tokens.next()?, None);
    }
    if tokens.next().is_some() {
        return None;
    }
    normalize_token(first, None)
}

fn parse_ublock_rule(rule: &str) -> Option<ParsedLine> {
    let (domain, rest) = rule.split_once('^')?;
    let options = match rest.strip_prefix('$') {
        Some(opts) => Some(opts.to_string()),
        None if rest.is_empty() => None,
        None => return None,
    };
    normalize_token(domain, options)
}

fn normalize_token(token: &str, options: Option<String>) -> Option<ParsedLine> {
    let lowered = token.to_lowercase();
    let (wildcard, rest) = match lowered.strip_prefix("*.") {
        Some(rest) => (true, rest),
        None => (false, lowered.as_str()),
    };
    let domain = rest.trim_end_matches('.');

    if !is_domain(domain) || LOCAL_NAMES.contains(&domain) || domain.parse::<Ipv4Addr>().is_ok() {
        tracing::trace!(token, "rejected token");
        return None;
    }

    Some(ParsedLine {
        domain: domain.to_string(),
        options,
        wildcard,
    })
}

/// Lowercases a lookup key and drops a trailing root dot.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_lowercase()
}

fn is_domain(s: &str) -> bool {
    s.contains('.')
        && !s.starts_with('.')
        && !s.contains("..")
        && s.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'_'))
}
