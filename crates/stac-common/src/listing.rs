//! Immediate children of a storage prefix.

/// One level of an object-store listing, resolved by the caller.
///
/// `sub_prefixes` and `files` may hold full keys or bare names; consumers
/// only look at the last path segment. A listing that hit a page limit
/// without following the continuation must be marked `truncated`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildListing {
    pub sub_prefixes: Vec<String>,
    pub files: Vec<String>,
    pub truncated: bool,
}

impl ChildListing {
    /// A fully paginated listing.
    pub fn complete(sub_prefixes: Vec<String>, files: Vec<String>) -> Self {
        Self {
            sub_prefixes,
            files,
            truncated: false,
        }
    }

    /// A listing made of files only.
    pub fn of_files<S: Into<String>>(files: impl IntoIterator<Item = S>) -> Self {
        Self::complete(Vec::new(), files.into_iter().map(Into::into).collect())
    }

    /// A listing made of sub-prefixes only.
    pub fn of_prefixes<S: Into<String>>(prefixes: impl IntoIterator<Item = S>) -> Self {
        Self::complete(prefixes.into_iter().map(Into::into).collect(), Vec::new())
    }

    pub fn mark_truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sub_prefixes.is_empty() && self.files.is_empty()
    }
}

/// Last non-empty `/`-separated segment of a key or prefix.
pub fn last_segment(key: &str) -> &str {
    key.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("CBERS4/MUX/083/"), "083");
        assert_eq!(last_segment("CBERS4/MUX/083/095/x.json"), "x.json");
        assert_eq!(last_segment("095"), "095");
        assert_eq!(last_segment(""), "");
    }

    #[test]
    fn test_listing_builders() {
        let listing = ChildListing::of_files(["a_L2.json"]);
        assert!(!listing.truncated);
        assert!(!listing.is_empty());
        assert!(ChildListing::of_prefixes(["083/"]).mark_truncated().truncated);
        assert!(ChildListing::default().is_empty());
    }
}
