//! Handshake and token gate tests against the in-memory repository

use std::sync::Arc;
use std::time::Duration;

use ed25519_dalek::SigningKey;
use kernel::id::UserId;
use platform::crypto::{generate_signing_key, verify};

use crate::application::{
    AuthConfig, AuthenticateUseCase, CheckTokenUseCase, IssueChallengeUseCase,
    PurgeExpiredUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::services::respond_to_challenge;
use crate::error::AuthError;
use crate::infra::memory::MemoryAuthRepository;

struct Harness {
    repo: Arc<MemoryAuthRepository>,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(AuthConfig::with_random_key())
    }

    fn with_config(config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(MemoryAuthRepository::new()),
            config: Arc::new(config),
        }
    }

    async fn register(&self, email: &str, key: &SigningKey) -> UserId {
        RegisterUseCase::new(self.repo.clone())
            .execute(RegisterInput {
                email: email.to_string(),
                public_key: key.verifying_key().as_bytes().to_vec(),
            })
            .await
            .unwrap()
            .user_id
    }

    fn issue(&self) -> IssueChallengeUseCase<MemoryAuthRepository, MemoryAuthRepository> {
        IssueChallengeUseCase::new(self.repo.clone(), self.repo.clone(), self.config.clone())
    }

    fn authenticate(
        &self,
    ) -> AuthenticateUseCase<MemoryAuthRepository, MemoryAuthRepository, MemoryAuthRepository>
    {
        AuthenticateUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.config.clone(),
        )
    }

    fn gate(&self) -> CheckTokenUseCase<MemoryAuthRepository> {
        CheckTokenUseCase::new(self.repo.clone())
    }
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let harness = Harness::new();
    let use_case = RegisterUseCase::new(harness.repo.clone());

    let result = use_case
        .execute(RegisterInput {
            email: "not-an-email".to_string(),
            public_key: generate_signing_key().verifying_key().as_bytes().to_vec(),
        })
        .await;
    assert!(matches!(result, Err(AuthError::InvalidEmail(_))));

    let result = use_case
        .execute(RegisterInput {
            email: "a@x.com".to_string(),
            public_key: vec![1, 2, 3],
        })
        .await;
    assert!(matches!(result, Err(AuthError::InvalidPublicKey)));
}

#[tokio::test]
async fn test_same_email_twice_gets_two_ids() {
    let harness = Harness::new();
    let first = harness.register("a@x.com", &generate_signing_key()).await;
    let second = harness.register("a@x.com", &generate_signing_key()).await;

    assert_eq!(first, UserId::new(1));
    assert_eq!(second, UserId::new(2));
}

#[tokio::test]
async fn test_full_handshake() {
    let harness = Harness::new();
    let client = generate_signing_key();
    let user_id = harness.register("a@x.com", &client).await;

    let challenge = harness.issue().execute(user_id, "client-nonce").await.unwrap();
    assert!(verify(
        &harness.config.server_public_key(),
        b"client-nonce",
        &challenge.server_signature
    ));

    let signature = respond_to_challenge(&client, &challenge.server_challenge);
    let token = harness
        .authenticate()
        .execute(user_id, &signature)
        .await
        .unwrap();
    assert_eq!(token.user_id, user_id);

    // Reusable until expiry
    for _ in 0..2 {
        let session = harness.gate().execute(user_id, &token.token).await.unwrap();
        assert_eq!(session.token, token.token);
        assert!(session.remaining_ms() > 0);
        assert!(session.remaining_ms() <= harness.config.token_ttl.as_millis() as i64);
    }
}

#[tokio::test]
async fn test_challenge_for_unknown_user() {
    let harness = Harness::new();
    let result = harness.issue().execute(UserId::new(42), "nonce").await;
    assert!(matches!(result, Err(AuthError::UnknownUser)));
}

#[tokio::test]
async fn test_signature_is_single_use() {
    let harness = Harness::new();
    let client = generate_signing_key();
    let user_id = harness.register("a@x.com", &client).await;

    let challenge = harness.issue().execute(user_id, "nonce").await.unwrap();
    let signature = respond_to_challenge(&client, &challenge.server_challenge);

    assert!(harness.authenticate().execute(user_id, &signature).await.is_ok());
    let replay = harness.authenticate().execute(user_id, &signature).await;
    assert!(matches!(replay, Err(AuthError::ChallengeMissing)));
}

#[tokio::test]
async fn test_bad_signature_consumes_challenge() {
    let harness = Harness::new();
    let client = generate_signing_key();
    let user_id = harness.register("a@x.com", &client).await;

    let challenge = harness.issue().execute(user_id, "nonce").await.unwrap();
    let forged = respond_to_challenge(&generate_signing_key(), &challenge.server_challenge);
    let result = harness.authenticate().execute(user_id, &forged).await;
    assert!(matches!(result, Err(AuthError::SignatureInvalid)));

    // The genuine signature no longer helps: the challenge is gone.
    let genuine = respond_to_challenge(&client, &challenge.server_challenge);
    let result = harness.authenticate().execute(user_id, &genuine).await;
    assert!(matches!(result, Err(AuthError::ChallengeMissing)));
}

#[tokio::test]
async fn test_only_latest_challenge_counts() {
    let harness = Harness::new();
    let client = generate_signing_key();
    let user_id = harness.register("a@x.com", &client).await;

    let stale = harness.issue().execute(user_id, "one").await.unwrap();
    let fresh = harness.issue().execute(user_id, "two").await.unwrap();

    let signature = respond_to_challenge(&client, &stale.server_challenge);
    let result = harness.authenticate().execute(user_id, &signature).await;
    assert!(matches!(result, Err(AuthError::SignatureInvalid)));

    let second = harness.issue().execute(user_id, "three").await.unwrap();
    assert_ne!(second.server_challenge, fresh.server_challenge);
    let signature = respond_to_challenge(&client, &second.server_challenge);
    assert!(harness.authenticate().execute(user_id, &signature).await.is_ok());
}

#[tokio::test]
async fn test_expired_challenge_fails() {
    let mut config = AuthConfig::with_random_key();
    config.challenge_ttl = Duration::from_millis(0);
    let harness = Harness::with_config(config);
    let client = generate_signing_key();
    let user_id = harness.register("a@x.com", &client).await;

    let challenge = harness.issue().execute(user_id, "nonce").await.unwrap();
    let signature = respond_to_challenge(&client, &challenge.server_challenge);
    let result = harness.authenticate().execute(user_id, &signature).await;
    assert!(matches!(result, Err(AuthError::ChallengeExpired)));
}

#[tokio::test]
async fn test_gate_rejects_foreign_and_expired_tokens() {
    let mut config = AuthConfig::with_random_key();
    config.token_ttl = Duration::from_millis(50);
    let harness = Harness::with_config(config);
    let client = generate_signing_key();
    let user_id = harness.register("a@x.com", &client).await;
    let other = harness.register("b@x.com", &generate_signing_key()).await;

    let challenge = harness.issue().execute(user_id, "nonce").await.unwrap();
    let signature = respond_to_challenge(&client, &challenge.server_challenge);
    let token = harness
        .authenticate()
        .execute(user_id, &signature)
        .await
        .unwrap();

    assert!(matches!(
        harness.gate().execute(other, &token.token).await,
        Err(AuthError::TokenInvalid)
    ));
    assert!(matches!(
        harness.gate().execute(user_id, "never-issued").await,
        Err(AuthError::TokenInvalid)
    ));

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(matches!(
        harness.gate().execute(user_id, &token.token).await,
        Err(AuthError::TokenInvalid)
    ));

    let purged = PurgeExpiredUseCase::new(harness.repo.clone(), harness.repo.clone())
        .execute()
        .await
        .unwrap();
    assert_eq!(purged.tokens, 1);
}
