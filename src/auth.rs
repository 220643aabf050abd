use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

/// Signs a token for `user_id`, valid for one week.
pub fn sign_jwt(user_id: Uuid, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::days(7)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

/// Validates the token and returns the user id from its subject.
pub fn decode_jwt(token: &str, secret: &str) -> Option<Uuid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .ok()?;

    Uuid::parse_str(&data.claims.sub).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_decode_round_trips() {
        let user_id = Uuid::new_v4();
        let token = sign_jwt(user_id, "test-secret").unwrap();
        assert_eq!(decode_jwt(&token, "test-secret"), Some(user_id));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt(Uuid::new_v4(), "test-secret").unwrap();
        assert_eq!(decode_jwt(&token, "other-secret"), None);
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert_eq!(decode_jwt("not-a-token", "test-secret"), None);
    }
}
