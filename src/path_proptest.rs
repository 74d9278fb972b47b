//! Property-based tests for URL to clone path mapping.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::descriptor::RepoDescriptor;
    use crate::path::{slugify, RepoPaths};
    use proptest::prelude::*;

    // ============================================================================
    // slugify property tests
    // ============================================================================

    proptest! {
        /// Property: slugify only ever emits ASCII alphanumerics and dashes
        #[test]
        fn slugify_output_is_filesystem_safe(input in ".*") {
            let result = slugify(&input);
            prop_assert!(
                result.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
                "slugify produced '{}' from input '{}'",
                result,
                input
            );
        }

        /// Property: slugify is deterministic (same input = same output)
        #[test]
        fn slugify_is_deterministic(input in ".*") {
            prop_assert_eq!(slugify(&input), slugify(&input));
        }

        /// Property: slugify preserves alphanumeric input
        #[test]
        fn slugify_preserves_alphanumeric(input in "[a-zA-Z0-9]+") {
            prop_assert_eq!(slugify(&input), input);
        }

        /// Property: one output character per input character
        #[test]
        fn slugify_preserves_char_count(input in ".+") {
            prop_assert_eq!(slugify(&input).chars().count(), input.chars().count());
        }

        /// Property: distinct owner/name pairs map to distinct clone paths
        #[test]
        fn path_for_separates_forge_urls(
            a in "[a-z0-9]{1,12}/[a-z0-9]{1,12}",
            b in "[a-z0-9]{1,12}/[a-z0-9]{1,12}",
        ) {
            prop_assume!(a != b);
            let paths = RepoPaths::new("/repos");
            let url_a = RepoDescriptor::parse(&a).url;
            let url_b = RepoDescriptor::parse(&b).url;
            prop_assert_ne!(paths.path_for(&url_a), paths.path_for(&url_b));
        }

        /// Property: clone paths are always direct children of the repos root
        #[test]
        fn path_for_stays_under_root(input in ".+") {
            let paths = RepoPaths::new("/repos");
            let path = paths.path_for(&input);
            prop_assert_eq!(path.parent(), Some(paths.root()));
        }
    }

    // ============================================================================
    // descriptor property tests
    // ============================================================================

    proptest! {
        /// Property: parsed URLs are always absolute
        #[test]
        fn parsed_url_is_absolute(input in "[^#]*(#[a-z]{0,8})?") {
            let descriptor = RepoDescriptor::parse(&input);
            prop_assert!(descriptor.url.contains("://") || descriptor.url.contains('@'));
        }

        /// Property: the branch suffix never leaks into the URL
        #[test]
        fn branch_suffix_is_split_off(repo in "[a-z]{1,8}/[a-z]{1,8}", branch in "[a-z]{1,8}") {
            let descriptor = RepoDescriptor::parse(&format!("{}#{}", repo, branch));
            prop_assert!(!descriptor.url.contains('#'));
            prop_assert_eq!(descriptor.branch(), branch.as_str());
        }
    }
}
