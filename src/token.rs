//! Session token issuance and verification
//!
//! Tokens are HS256 JWTs signed with a process-wide symmetric secret. The
//! claim set is exactly what the wire format has always carried: the
//! `username`, and optionally a `specialAccess` flag. No `exp` claim is
//! set, so a token verifies indefinitely once issued; revocation means
//! rotating the signing secret.
//!
//! Verification is stateless: a token that carries a valid signature is
//! trusted as-is, with no lookup against the credential store. The username
//! inside may name a record that has since been deleted; the profile
//! endpoints surface that as a 404 rather than a 403.

use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Claims carried inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Owning username, as established at login.
    pub username: String,
    /// Special-access marker. No login path ever sets this; it can only
    /// appear in tokens minted through [`TokenAuthority::issue_with_special_access`].
    #[serde(rename = "specialAccess", skip_serializing_if = "Option::is_none")]
    pub special_access: Option<bool>,
}

impl AccessClaims {
    /// Claims for a plain user session.
    pub fn for_user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            special_access: None,
        }
    }
}

/// Token verification failures. Both variants answer 403: anything short
/// of a good signature is rejected the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not a structurally valid JWT
    Malformed,
    /// Structure fine, signature check failed
    BadSignature,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "token is not a valid JWT"),
            Self::BadSignature => write!(f, "token signature did not verify"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Signs and verifies session tokens with one symmetric secret.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of debug output.
        f.debug_struct("TokenAuthority").finish_non_exhaustive()
    }
}

impl TokenAuthority {
    /// Build an authority from the signing secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no exp/iat/nbf claims; accept their absence.
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for a verified username. This is the only issuance
    /// path the login flow uses.
    pub fn issue(&self, username: &str) -> String {
        self.sign(&AccessClaims::for_user(username))
    }

    /// Issue a token carrying the `specialAccess` claim. No route in the
    /// service calls this; it exists so externally-minted special tokens
    /// have a documented shape.
    pub fn issue_with_special_access(&self, username: &str) -> String {
        self.sign(&AccessClaims {
            username: username.to_string(),
            special_access: Some(true),
        })
    }

    fn sign(&self, claims: &AccessClaims) -> String {
        // HS256 with an in-memory key cannot fail for serializable claims.
        encode(&Header::default(), claims, &self.encoding).expect("HS256 signing failed")
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        decode::<AccessClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                use jsonwebtoken::errors::ErrorKind;
                match err.kind() {
                    ErrorKind::InvalidSignature => TokenError::BadSignature,
                    _ => TokenError::Malformed,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-signing-secret";

    #[test]
    fn issued_token_round_trips() {
        let authority = TokenAuthority::new(SECRET);
        let token = authority.issue("alice");

        let claims = authority.verify(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.special_access, None);
    }

    #[test]
    fn special_access_claim_survives_verification() {
        // Nothing in the service issues these; this pins the shape for
        // tokens minted out-of-band.
        let authority = TokenAuthority::new(SECRET);
        let token = authority.issue_with_special_access("ops");

        let claims = authority.verify(&token).unwrap();
        assert_eq!(claims.special_access, Some(true));
    }

    #[test]
    fn token_has_no_expiry_claim() {
        let authority = TokenAuthority::new(SECRET);
        let token = authority.issue("alice");

        // A verifier that requires exp must reject this token.
        let mut strict = Validation::new(Algorithm::HS256);
        strict.validate_exp = true;
        strict.set_required_spec_claims(&["exp"]);
        let result = decode::<AccessClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &strict,
        );
        assert!(result.is_err());
    }

    #[test]
    fn tampered_token_rejected() {
        let authority = TokenAuthority::new(SECRET);
        let token = authority.issue("alice");

        // Flip a character in the signature segment.
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let sig = parts[2].clone();
        let flipped = if sig.ends_with('A') {
            format!("{}B", &sig[..sig.len() - 1])
        } else {
            format!("{}A", &sig[..sig.len() - 1])
        };
        parts[2] = flipped;
        let tampered = parts.join(".");

        assert!(authority.verify(&tampered).is_err());
    }

    #[test]
    fn token_from_other_secret_rejected() {
        let ours = TokenAuthority::new(SECRET);
        let theirs = TokenAuthority::new("some-other-secret-entirely");

        let token = theirs.issue("alice");
        assert_eq!(ours.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let authority = TokenAuthority::new(SECRET);
        assert_eq!(
            authority.verify("not-a-jwt-at-all"),
            Err(TokenError::Malformed)
        );
        assert_eq!(authority.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn verification_is_store_free() {
        // The verifier trusts the signature alone: a username that never
        // existed in any store still verifies.
        let authority = TokenAuthority::new(SECRET);
        let token = authority.issue("ghost");
        assert_eq!(authority.verify(&token).unwrap().username, "ghost");
    }
}
