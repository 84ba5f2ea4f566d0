// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed bearer tokens.
//!
//! Tokens are compact HS256 JWTs carrying `sub`, `iat` and `exp` (seconds
//! since the epoch). Nothing about a token is stored server side; validity is
//! derived from the claims and the signing secret alone.
//!
//! Verification runs in three steps:
//!
//! 1. Decode the token structure. Failure is [`AuthError::MalformedToken`].
//! 2. Compare `exp` to the supplied instant. A token is valid while
//!    `now < exp`; otherwise [`AuthError::Expired`], whatever the signature.
//! 3. Check the MAC (constant-time). Failure is [`AuthError::BadSignature`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::AuthError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (seconds)
    pub iat: i64,
    /// Expiration (seconds)
    pub exp: i64,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies tokens with a process-wide symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from the raw secret bytes.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against the injected clock before the MAC.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `subject`, valid from `issued_at` for `ttl`.
    ///
    /// `exp` is rounded up to the next whole second, so a token never
    /// expires before `issued_at + ttl`.
    pub fn issue(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Internal(format!("token lifetime {ttl} out of range")))?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp() + i64::from(expires_at.timestamp_subsec_nanos() > 0),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify a token as of `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, AuthError> {
        let unverified = jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token)
            .map_err(|_| AuthError::MalformedToken)?;

        if now.timestamp() >= unverified.claims.exp {
            return Err(AuthError::Expired);
        }

        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::BadSignature
                }
                _ => AuthError::MalformedToken,
            },
        )?;

        let expires_at =
            DateTime::from_timestamp(data.claims.exp, 0).ok_or(AuthError::MalformedToken)?;

        Ok(VerifiedToken {
            subject: data.claims.sub,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET)
    }

    /// Swap the claims segment of a token, keeping header and signature.
    fn with_claims(token: &str, claims: &TokenClaims) -> String {
        let parts: Vec<&str> = token.split('.').collect();
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
        format!("{}.{}.{}", parts[0], payload, parts[2])
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let token = codec().issue("alice", t0(), Duration::hours(1)).unwrap();
        let verified = codec().verify(&token, t0() + Duration::seconds(10)).unwrap();

        assert_eq!(verified.subject, "alice");
        assert_eq!(verified.expires_at, t0() + Duration::hours(1));
    }

    #[test]
    fn sub_second_ttl_is_valid_at_issuance() {
        let issued_at = t0() + Duration::milliseconds(200);
        let token = codec()
            .issue("alice", issued_at, Duration::milliseconds(500))
            .unwrap();

        let verified = codec().verify(&token, issued_at).unwrap();
        assert_eq!(verified.subject, "alice");
        assert_eq!(verified.expires_at, t0() + Duration::seconds(1));
        assert_eq!(
            codec().verify(&token, t0() + Duration::seconds(1)),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn expiry_rounds_up_to_whole_second() {
        let issued_at = t0() + Duration::milliseconds(999);
        let token = codec().issue("alice", issued_at, Duration::hours(1)).unwrap();

        let verified = codec()
            .verify(&token, t0() + Duration::seconds(3600))
            .unwrap();
        assert_eq!(verified.expires_at, t0() + Duration::seconds(3601));
    }

    #[test]
    fn out_of_range_ttl_is_an_error() {
        let result = codec().issue("alice", t0(), Duration::milliseconds(i64::MAX));
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn token_is_url_safe() {
        let token = codec().issue("alice", t0(), Duration::hours(1)).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')));
    }

    #[test]
    fn expires_exactly_at_exp() {
        let token = codec().issue("alice", t0(), Duration::seconds(3600)).unwrap();

        assert!(codec().verify(&token, t0() + Duration::seconds(3599)).is_ok());
        assert_eq!(
            codec().verify(&token, t0() + Duration::seconds(3600)),
            Err(AuthError::Expired)
        );
        assert_eq!(
            codec().verify(&token, t0() + Duration::seconds(3601)),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn expired_wins_over_bad_signature() {
        let token = TokenCodec::new(b"another-secret-another-secret-!!")
            .issue("alice", t0(), Duration::seconds(60))
            .unwrap();

        assert_eq!(
            codec().verify(&token, t0() + Duration::hours(2)),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn foreign_secret_is_bad_signature() {
        let token = TokenCodec::new(b"another-secret-another-secret-!!")
            .issue("alice", t0(), Duration::hours(1))
            .unwrap();

        assert_eq!(codec().verify(&token, t0()), Err(AuthError::BadSignature));
    }

    #[test]
    fn tampered_subject_is_bad_signature() {
        let token = codec().issue("alice", t0(), Duration::hours(1)).unwrap();
        let forged = with_claims(
            &token,
            &TokenClaims {
                sub: "mallory".into(),
                iat: t0().timestamp(),
                exp: (t0() + Duration::hours(1)).timestamp(),
            },
        );

        assert_eq!(codec().verify(&forged, t0()), Err(AuthError::BadSignature));
    }

    #[test]
    fn extended_expiry_is_bad_signature() {
        let token = codec().issue("alice", t0(), Duration::seconds(60)).unwrap();
        let forged = with_claims(
            &token,
            &TokenClaims {
                sub: "alice".into(),
                iat: t0().timestamp(),
                exp: (t0() + Duration::days(365)).timestamp(),
            },
        );

        assert_eq!(
            codec().verify(&forged, t0() + Duration::hours(1)),
            Err(AuthError::BadSignature)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        for token in ["", "not-a-token", "a.b", "a.b.c", "..."] {
            assert_eq!(
                codec().verify(token, t0()),
                Err(AuthError::MalformedToken),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let rendered = format!("{:?}", codec());
        assert!(!rendered.contains("0123456789abcdef"));
    }
}
