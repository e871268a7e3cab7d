#![allow(dead_code)]

use chrono::{Duration as ChronoDuration, Utc};
use shopfront_auth::{JwtClaims, Role, encode_hs256};
use shopfront_core::UserId;

pub const JWT_SECRET: &str = "test-secret";

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Serve `app` on an ephemeral port.
    pub async fn spawn(app: axum::Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn mint_jwt(user_id: UserId, roles: Vec<Role>) -> String {
    let claims = JwtClaims::new(user_id, roles, Utc::now(), ChronoDuration::minutes(10));
    encode_hs256(JWT_SECRET, &claims).expect("failed to encode jwt")
}

pub fn mint_expired_jwt(user_id: UserId) -> String {
    let issued = Utc::now() - ChronoDuration::hours(2);
    let claims = JwtClaims::new(user_id, vec![], issued, ChronoDuration::minutes(10));
    encode_hs256(JWT_SECRET, &claims).expect("failed to encode jwt")
}
