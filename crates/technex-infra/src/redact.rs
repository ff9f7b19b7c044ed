//! Log redaction helpers.

/// Mask the local part of an email address: `jane@example.com` -> `j***@example.com`.
/// Inputs without an `@` are fully masked.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().filter(|_| local.chars().count() > 1);
            match first {
                Some(c) => format!("{c}***@{domain}"),
                None => format!("***@{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jane@example.com"), "j***@example.com");
        assert_eq!(mask_email("j@example.com"), "***@example.com");
        assert_eq!(mask_email("admin"), "***");
    }
}
