use crate::config::Config;
use crate::errors::AppError;
use crate::session::Session;
use chrono::{Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn create_session(&self) -> (Uuid, Session) {
        let id = Uuid::new_v4();
        let session = Session::new(self.config.default_stress, Utc::now());
        self.sessions.lock().await.insert(id, session.clone());
        (id, session)
    }

    /// Runs `f` against a live session after marking it as active.
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("session {id} not found")))?;
        session.touch(Utc::now());
        Ok(f(session))
    }

    pub async fn sweep_expired(&self) -> usize {
        let ttl = Duration::from_std(self.config.session_ttl)
            .unwrap_or_else(|_| Duration::weeks(52 * 100));
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, ttl));
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let state = AppState::new(Config::default());
        let err = state
            .with_session(Uuid::new_v4(), |_| ())
            .await
            .expect_err("missing session");
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sessions_are_private() {
        let state = AppState::new(Config::default());
        let (first, _) = state.create_session().await;
        let (second, _) = state.create_session().await;

        state
            .with_session(first, |session| session.record.goals = "sleep more".into())
            .await
            .unwrap();

        let goals = state
            .with_session(second, |session| session.record.goals.clone())
            .await
            .unwrap();
        assert_eq!(goals, "");
    }

    #[tokio::test]
    async fn sweep_drops_idle_sessions() {
        let config = Config {
            session_ttl: std::time::Duration::from_secs(0),
            ..Config::default()
        };
        let state = AppState::new(config);
        let (id, _) = state.create_session().await;
        state.sessions.lock().await.get_mut(&id).unwrap().last_seen -= Duration::seconds(5);

        assert_eq!(state.sweep_expired().await, 1);
        assert!(state.with_session(id, |_| ()).await.is_err());
    }
}
