use super::{AdmissionPolicy, DomainEntry};

/// Mirror feed: admits every parsed domain, optionally as a `*.domain` line.
#[derive(Debug, Clone, Default)]
pub struct GenericPolicy {
    wildcard_prefix: bool,
}

impl GenericPolicy {
    pub fn new(wildcard_prefix: bool) -> Self {
        Self { wildcard_prefix }
    }
}

impl AdmissionPolicy for GenericPolicy {
    fn admit(&self, _entry: &DomainEntry) -> bool {
        true
    }

    fn output_token(&self, entry: &DomainEntry) -> String {
        if self.wildcard_prefix {
            format!("*.{}", entry.domain)
        } else {
            entry.domain.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    #[test]
    fn test_output_token() {
        let entry = DomainEntry::from_parsed(parse_line("*.ads.example.com").unwrap(), "mirror");

        let plain = GenericPolicy::new(false);
        assert!(plain.admit(&entry));
        assert_eq!(plain.output_token(&entry), "ads.example.com");

        let wildcard = GenericPolicy::new(true);
        assert_eq!(wildcard.output_token(&entry), "*.ads.example.com");
    }
}
