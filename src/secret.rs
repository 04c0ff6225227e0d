//! Secret strength checks and generation
//!
//! The signing secret and the admin token are process-wide strings loaded
//! at startup. This module validates their strength (length, weak-pattern
//! and entropy checks) and can generate replacements. Validation failures
//! are reported, not fatal: the service still starts with a weak secret so
//! the out-of-the-box development defaults keep working, but the problem
//! lands in the log at warn level.

use std::collections::HashMap;
use std::fmt;

/// Why a secret was judged weak.
#[derive(Debug, Clone, PartialEq)]
pub enum SecretWeakness {
    /// Secret is shorter than the policy minimum
    TooShort { actual: usize, minimum: usize },
    /// Secret contains a well-known weak substring
    WeakPattern { pattern: String },
    /// Shannon entropy below the policy floor
    LowEntropy { actual: f64, minimum: f64 },
}

impl fmt::Display for SecretWeakness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { actual, minimum } => {
                write!(f, "length {} is below the minimum of {}", actual, minimum)
            }
            Self::WeakPattern { pattern } => {
                write!(f, "contains the weak pattern '{}'", pattern)
            }
            Self::LowEntropy { actual, minimum } => {
                write!(
                    f,
                    "entropy {:.1} bits is below the minimum of {:.1} bits",
                    actual, minimum
                )
            }
        }
    }
}

impl std::error::Error for SecretWeakness {}

/// Strength requirements for a configured secret.
#[derive(Debug, Clone)]
pub struct SecretPolicy {
    pub min_length: usize,
    pub min_entropy: f64,
    pub check_weak_patterns: bool,
}

impl Default for SecretPolicy {
    fn default() -> Self {
        Self {
            min_length: 32,
            min_entropy: 64.0,
            check_weak_patterns: true,
        }
    }
}

impl SecretPolicy {
    /// Relaxed policy for development defaults.
    pub fn relaxed() -> Self {
        Self {
            min_length: 16,
            min_entropy: 32.0,
            check_weak_patterns: true,
        }
    }

    /// Validate a secret against this policy.
    pub fn validate(&self, secret: &str) -> Result<(), SecretWeakness> {
        if secret.len() < self.min_length {
            return Err(SecretWeakness::TooShort {
                actual: secret.len(),
                minimum: self.min_length,
            });
        }

        if self.check_weak_patterns {
            if let Some(pattern) = find_weak_pattern(secret) {
                return Err(SecretWeakness::WeakPattern {
                    pattern: pattern.to_string(),
                });
            }
        }

        let entropy = shannon_entropy(secret);
        if entropy < self.min_entropy {
            return Err(SecretWeakness::LowEntropy {
                actual: entropy,
                minimum: self.min_entropy,
            });
        }

        Ok(())
    }
}

/// Scan for well-known weak substrings (case-insensitive).
fn find_weak_pattern(secret: &str) -> Option<&'static str> {
    const WEAK_PATTERNS: &[&str] = &[
        "secret", "password", "admin", "123456", "qwerty", "default", "example", "test",
        "changeme", "letmein", "token",
    ];

    let lowered = secret.to_lowercase();
    WEAK_PATTERNS.iter().copied().find(|p| lowered.contains(p))
}

/// Total Shannon entropy of a string in bits (per-character entropy times
/// length).
pub fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }

    let total = s.chars().count() as f64;
    let per_char: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    per_char * total
}

/// Generate a random secret from a mixed character set.
pub fn generate_secret(length: usize) -> String {
    use rand::Rng;

    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*-_=+";

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Validate a named secret and log the outcome. Returns whether the secret
/// passed, so callers can decide to refuse startup in stricter deployments.
pub fn check_and_warn(name: &str, secret: &str, policy: &SecretPolicy) -> bool {
    match policy.validate(secret) {
        Ok(()) => {
            tracing::debug!(secret = name, "Secret passed strength checks");
            true
        }
        Err(weakness) => {
            tracing::warn!(
                secret = name,
                weakness = %weakness,
                "Configured secret is weak; replace it outside development"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secret_rejected() {
        let policy = SecretPolicy::default();
        let result = policy.validate("short");
        assert!(matches!(result, Err(SecretWeakness::TooShort { .. })));
    }

    #[test]
    fn weak_pattern_rejected() {
        let policy = SecretPolicy::default();
        let result = policy.validate("a-password-that-is-otherwise-long-enough-9f3k2m");
        assert!(matches!(result, Err(SecretWeakness::WeakPattern { .. })));
    }

    #[test]
    fn repeated_chars_fail_entropy() {
        let policy = SecretPolicy::default();
        let result = policy.validate("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert!(matches!(result, Err(SecretWeakness::LowEntropy { .. })));
    }

    #[test]
    fn generated_secret_passes_default_policy() {
        let policy = SecretPolicy::default();
        let secret = generate_secret(64);
        assert_eq!(secret.len(), 64);
        assert!(policy.validate(&secret).is_ok());
    }

    #[test]
    fn entropy_scales_with_diversity() {
        let low = shannon_entropy("aaaaaaaaaa");
        let high = shannon_entropy("aB3$xY9!pQ");
        assert!(low < 1.0);
        assert!(high > 30.0);
        assert_eq!(shannon_entropy(""), 0.0);
    }

    #[test]
    fn development_defaults_are_flagged() {
        // The shipped defaults must fail validation, not pass quietly.
        let policy = SecretPolicy::relaxed();
        assert!(policy.validate("YOUR_SECRET_KEY").is_err());
        assert!(policy.validate("ADMIN_TOKEN").is_err());
    }
}
