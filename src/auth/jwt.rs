use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::types::Claims;

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            expiration_hours,
        }
    }

    pub fn generate_token(&self, user_id: i32, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.expiration_hours);

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_claims() {
        let jwt = JwtService::new("test-secret", 24);
        let token = jwt.generate_token(7, "jojo@mail.com").unwrap();
        let claims = jwt.verify_token(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "jojo@mail.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = JwtService::new("secret-a", 24)
            .generate_token(1, "a@mail.com")
            .unwrap();
        assert!(JwtService::new("secret-b", 24).verify_token(&token).is_err());
    }
}
