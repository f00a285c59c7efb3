//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate an HTTP(S) URL of a zip archive
    pub fn archive_url() -> impl Strategy<Value = String> {
        (
            prop_oneof!["https", "http"],
            "[a-z]{3,10}",
            "[a-z]{2,5}",
            proptest::option::of(1024u16..65535),
            "[a-z0-9-]{1,20}",
        )
            .prop_map(|(scheme, domain, tld, port, name)| match port {
                Some(port) => format!("{scheme}://{domain}.{tld}:{port}/{name}.zip"),
                None => format!("{scheme}://{domain}.{tld}/{name}.zip"),
            })
    }

    /// Generate a path inside an archive, zero to four directories deep
    pub fn archive_entry_path() -> impl Strategy<Value = String> {
        (
            proptest::collection::vec("[a-z0-9_.-]{1,12}", 0..4),
            "[a-z][a-z0-9_]{0,12}\\.(mpy|py|txt)",
        )
            .prop_map(|(dirs, file)| {
                let mut segments = dirs;
                segments.push(file);
                segments.join("/")
            })
    }

    /// Generate a volume label
    pub fn volume_label() -> impl Strategy<Value = String> {
        "[A-Z][A-Z0-9_]{0,10}"
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_archive_url_generator(url in archive_url()) {
            prop_assert!(url.starts_with("http"));
            prop_assert!(url.ends_with(".zip"));
        }

        #[test]
        fn test_archive_entry_path_generator(path in archive_entry_path()) {
            prop_assert!(!path.is_empty());
            prop_assert!(!path.contains("//"));
            prop_assert!(!path.contains(':'));
        }

        #[test]
        fn test_volume_label_generator(label in volume_label()) {
            prop_assert!(!label.is_empty());
            prop_assert!(label
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
        }
    }
}
