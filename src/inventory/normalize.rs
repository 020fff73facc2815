//! Field rendering helpers shared by every resource kind

/// Reduce a resource reference (self-link, partial path) to its trailing
/// path segment
///
/// `https://www.googleapis.com/compute/v1/projects/p/global/networks/default`
/// becomes `default`. Strings without a `/` pass through unchanged, so
/// applying this twice is the same as applying it once.
pub fn normalize_ref(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Normalize each reference independently, then join with `delimiter`
pub fn normalize_refs<S: AsRef<str>>(references: &[S], delimiter: &str) -> String {
    references
        .iter()
        .map(|r| normalize_ref(r.as_ref()))
        .collect::<Vec<_>>()
        .join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_self_link() {
        assert_eq!(
            normalize_ref("https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a/machineTypes/n1-standard-1"),
            "n1-standard-1"
        );
        assert_eq!(normalize_ref("zones/us-central1-a"), "us-central1-a");
        assert_eq!(normalize_ref("10.0.0.1"), "10.0.0.1");
        assert_eq!(normalize_ref(""), "");
        assert_eq!(normalize_ref("trailing/"), "");
    }

    #[test]
    fn test_normalize_refs_joins_each_element() {
        let users = vec![
            "projects/p/zones/z/instances/vm-1".to_string(),
            "projects/p/regions/r/forwardingRules/fr".to_string(),
        ];
        assert_eq!(normalize_refs(&users, ","), "vm-1,fr");
        assert_eq!(normalize_refs::<String>(&[], ","), "");
    }
}
