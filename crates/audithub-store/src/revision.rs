use std::fmt;

/// Hex characters of the BLAKE3 digest kept in a revision.
const REVISION_LEN: usize = 16;

/// Content digest of a results file, exchanged as an HTTP entity tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let hex = blake3::hash(bytes).to_hex();
        Self(hex.as_str()[..REVISION_LEN].to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strong entity tag form, quoted.
    #[must_use]
    pub fn as_etag(&self) -> String {
        format!("\"{}\"", self.0)
    }

    /// Parse an `If-Match`/`ETag` header value.
    ///
    /// Accepts quoted or bare tags and ignores a weak `W/` prefix.
    #[must_use]
    pub fn from_etag(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let unweak = trimmed.strip_prefix("W/").unwrap_or(trimmed);
        let bare = unweak
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(unweak);
        if bare.is_empty() {
            None
        } else {
            Some(Self(bare.to_string()))
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_is_stable_and_content_sensitive() {
        let a = Revision::of_bytes(b"{\"results\":{}}\n");
        let b = Revision::of_bytes(b"{\"results\":{}}\n");
        let c = Revision::of_bytes(b"{\"results\":{\"1\":\"pass\"}}\n");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 16);
    }

    #[test]
    fn test_etag_forms_parse_back() {
        let rev = Revision::of_bytes(b"x");
        assert_eq!(Revision::from_etag(&rev.as_etag()), Some(rev.clone()));
        assert_eq!(Revision::from_etag(rev.as_str()), Some(rev.clone()));
        assert_eq!(
            Revision::from_etag(&format!("W/{}", rev.as_etag())),
            Some(rev)
        );
    }

    #[test]
    fn test_empty_etag_is_none() {
        assert_eq!(Revision::from_etag(""), None);
        assert_eq!(Revision::from_etag("\"\""), None);
    }
}
