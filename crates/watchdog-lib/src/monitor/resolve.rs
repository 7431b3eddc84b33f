//! Container resolution by name fragment
//!
//! Resolution is a plain substring match against every name of every listed
//! container. The first container in listing order with a matching name wins;
//! there is no disambiguation when several match.

use crate::models::ContainerSummary;

/// Return the id of the first container with a name containing `fragment`
pub fn resolve_container_id(containers: &[ContainerSummary], fragment: &str) -> Option<String> {
    containers
        .iter()
        .find(|c| c.names.iter().any(|name| name.contains(fragment)))
        .map(|c| c.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<ContainerSummary> {
        vec![
            ContainerSummary::new("aaa111", &["/db"]),
            ContainerSummary::new("bbb222", &["/web-frontend", "/web-alias"]),
            ContainerSummary::new("ccc333", &["/web-backend"]),
        ]
    }

    #[test]
    fn test_resolve_not_found() {
        assert_eq!(resolve_container_id(&listing(), "cache"), None);
    }

    #[test]
    fn test_resolve_empty_listing() {
        assert_eq!(resolve_container_id(&[], "db"), None);
    }

    #[test]
    fn test_resolve_first_match_in_listing_order() {
        // both bbb222 and ccc333 contain "web"
        assert_eq!(
            resolve_container_id(&listing(), "web"),
            Some("bbb222".to_string())
        );
    }

    #[test]
    fn test_resolve_matches_any_name() {
        assert_eq!(
            resolve_container_id(&listing(), "alias"),
            Some("bbb222".to_string())
        );
    }

    #[test]
    fn test_resolve_substring() {
        assert_eq!(
            resolve_container_id(&listing(), "backend"),
            Some("ccc333".to_string())
        );
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        assert_eq!(resolve_container_id(&listing(), "DB"), None);
    }

    #[test]
    fn test_resolve_follows_listing_order() {
        let mut containers = listing();
        containers.reverse();

        assert_eq!(
            resolve_container_id(&containers, "web"),
            Some("ccc333".to_string())
        );
    }
}
