//! Content-based deduplication fingerprint for stored jobs.
//!
//! The hash is the uniqueness key for the jobs table: two postings with the
//! same normalized (title, company, location) must collapse to one row, no
//! matter which provider or fetch run produced them.

/// FNV-1a 64-bit over `title|company|location`, each field lowercased and
/// trimmed (a missing location hashes as the empty string). Rendered as
/// fixed-width hex.
pub fn dedup_hash(title: &str, company: &str, location: Option<&str>) -> String {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let normalized = format!(
        "{}|{}|{}",
        title.trim().to_lowercase(),
        company.trim().to_lowercase(),
        location.unwrap_or("").trim().to_lowercase()
    );

    let mut hash = FNV_OFFSET;
    for byte in normalized.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{hash:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = dedup_hash("Software Engineer", "Acme", Some("Austin, TX"));
        let b = dedup_hash("Software Engineer", "Acme", Some("Austin, TX"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_ignores_case_and_whitespace() {
        let a = dedup_hash("Software Engineer", "Acme", Some("Austin, TX"));
        let b = dedup_hash("  SOFTWARE engineer ", " ACME ", Some(" austin, tx "));
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_is_sensitive_to_each_field() {
        let base = dedup_hash("Software Engineer", "Acme", Some("Austin, TX"));
        assert_ne!(base, dedup_hash("Staff Engineer", "Acme", Some("Austin, TX")));
        assert_ne!(base, dedup_hash("Software Engineer", "Globex", Some("Austin, TX")));
        assert_ne!(
            base,
            dedup_hash("Software Engineer", "Acme", Some("Denver, CO"))
        );
    }

    #[test]
    fn test_missing_location_hashes_as_empty() {
        assert_eq!(
            dedup_hash("Engineer", "Acme", None),
            dedup_hash("Engineer", "Acme", Some("  "))
        );
        assert_ne!(
            dedup_hash("Engineer", "Acme", None),
            dedup_hash("Engineer", "Acme", Some("Remote"))
        );
    }
}
