mod state;

use std::collections::HashMap;
use std::time::Instant;

use log::info;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::conf::Config;
use crate::core::MergeError;
use crate::pipeline::{Combined, Export, InputMode, RawFile, combine_files};
use crate::session::{Action, Phase, Session};
use crate::table::Table;

use state::{SessionState, Slot};

/// Owns the configuration and every MPAN session.
///
/// A session is only ever mutated under the write lock, so each one has a
/// single writer at a time. Sessions idle past `server.session_ttl` are
/// dropped, finished sessions release their table at once, and at most
/// `server.max_sessions` entries are kept.
pub struct CombineService {
    sessions: RwLock<HashMap<Uuid, SessionState>>,
    config: Config,
}

impl CombineService {
    pub fn new(config: Config) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stateless combine of one upload batch.
    pub fn combine(&self, files: Vec<RawFile>, mode: InputMode) -> Combined {
        info!("combining {} uploaded files", files.len());
        combine_files(files, mode)
    }

    pub async fn open_session(&self, combined: Table) -> Uuid {
        let id = Uuid::new_v4();
        let rows = combined.num_rows();
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, Instant::now());
        sessions.insert(id, SessionState::new(Session::new(combined)));
        info!("opened session {} with {} rows", id, rows);
        id
    }

    /// Snapshot of a session. Cloning is cheap: table columns are shared.
    pub async fn session(&self, id: Uuid) -> Result<Session, MergeError> {
        let mut sessions = self.sessions.write().await;
        let session = self.touch(&mut sessions, id)?;
        Ok(session.clone())
    }

    pub async fn apply(&self, id: Uuid, action: Action) -> Result<Session, MergeError> {
        let mut sessions = self.sessions.write().await;
        let session = self.touch(&mut sessions, id)?;
        session.apply(action)?;
        let snapshot = session.clone();

        if snapshot.phase() == Phase::Done {
            if let Some(state) = sessions.get_mut(&id) {
                state.slot = Slot::Finished;
            }
            info!("session {} finished, table released", id);
        }
        Ok(snapshot)
    }

    pub async fn export(&self, id: Uuid) -> Result<Export, MergeError> {
        let session = self.session(id).await?;
        session.export()
    }

    /// Drops a session. This is the only way to reuse a finished id's slot
    /// before it expires.
    pub async fn close(&self, id: Uuid) -> Result<(), MergeError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(&id)
            .map(|_| info!("closed session {}", id))
            .ok_or_else(|| MergeError::SessionNotFound(id.to_string()))
    }

    /// Sessions that still hold a table.
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().filter(|s| s.is_live()).count()
    }

    /// Looks up a live session, refreshing its idle clock.
    fn touch<'a>(
        &self,
        sessions: &'a mut HashMap<Uuid, SessionState>,
        id: Uuid,
    ) -> Result<&'a mut Session, MergeError> {
        let now = Instant::now();
        let ttl = self.config.server.session_ttl;
        if sessions.get(&id).is_some_and(|s| s.is_expired(now, ttl)) {
            sessions.remove(&id);
            info!("session {} expired", id);
        }

        let state = sessions
            .get_mut(&id)
            .ok_or_else(|| MergeError::SessionNotFound(id.to_string()))?;
        state.last_access = now;
        match &mut state.slot {
            Slot::Live(session) => Ok(session),
            Slot::Finished => Err(MergeError::SessionFinished),
        }
    }

    /// Makes room for one more session.
    fn evict(&self, sessions: &mut HashMap<Uuid, SessionState>, now: Instant) {
        let ttl = self.config.server.session_ttl;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, ttl));

        let max = self.config.server.max_sessions.max(1);
        while sessions.len() >= max {
            // finished markers go before live sessions, oldest first
            let victim = sessions
                .iter()
                .min_by_key(|(_, s)| (s.is_live(), s.last_access))
                .map(|(id, _)| *id);
            match victim {
                Some(id) => sessions.remove(&id),
                None => break,
            };
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("evicted {} sessions", evicted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::conf::ServerConfig;
    use crate::pipeline::MPAN_COLUMNS;

    fn table() -> Table {
        Table::from_rows(
            MPAN_COLUMNS,
            &[["A", "1", "2", "3"], ["B", "4", "5", "6"], ["A", "7", "8", "9"]],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_open_query_and_close() {
        let svc = CombineService::new(Config::default());
        let id = svc.open_session(table()).await;
        assert_eq!(svc.session_count().await, 1);

        let session = svc.apply(id, Action::Submit("A".into())).await.unwrap();
        assert_eq!(session.phase(), Phase::Result);
        assert_eq!(session.filtered().unwrap().unwrap().num_rows(), 2);

        let export = svc.export(id).await.unwrap();
        assert_eq!(export.file_name, "A_filtered.xlsx");

        svc.close(id).await.unwrap();
        assert_eq!(svc.session_count().await, 0);
        assert_eq!(
            svc.session(id).await.err(),
            Some(MergeError::SessionNotFound(id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_failed_action_keeps_state() {
        let svc = CombineService::new(Config::default());
        let id = svc.open_session(table()).await;
        let err = svc.apply(id, Action::Submit(String::new())).await;
        assert_eq!(err.err(), Some(MergeError::EmptyQuery));
        assert_eq!(svc.session(id).await.unwrap().phase(), Phase::Input);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let svc = CombineService::new(Config::default());
        let a = svc.open_session(table()).await;
        let b = svc.open_session(table()).await;
        svc.apply(a, Action::Submit("A".into())).await.unwrap();
        svc.apply(a, Action::Stop).await.unwrap();
        assert_eq!(svc.session(a).await.err(), Some(MergeError::SessionFinished));
        assert_eq!(svc.session(b).await.unwrap().phase(), Phase::Input);
    }

    fn limited(session_ttl: Duration, max_sessions: usize) -> CombineService {
        CombineService::new(Config {
            server: ServerConfig {
                session_ttl,
                max_sessions,
                ..ServerConfig::default()
            },
            ..Config::default()
        })
    }

    #[tokio::test]
    async fn test_finished_sessions_release_their_table() {
        let svc = CombineService::new(Config::default());
        let mut ids = Vec::new();
        for _ in 0..200 {
            let id = svc.open_session(table()).await;
            svc.apply(id, Action::Submit("A".into())).await.unwrap();
            let done = svc.apply(id, Action::Stop).await.unwrap();
            assert_eq!(done.phase(), Phase::Done);
            ids.push(id);
        }
        assert_eq!(svc.session_count().await, 0);
        for id in ids {
            assert_eq!(svc.export(id).await.err(), Some(MergeError::SessionFinished));
            assert_eq!(
                svc.apply(id, Action::Continue).await.err(),
                Some(MergeError::SessionFinished)
            );
        }
    }

    #[tokio::test]
    async fn test_max_sessions_drops_least_recently_used() {
        let svc = limited(Duration::from_secs(3600), 2);
        let a = svc.open_session(table()).await;
        let b = svc.open_session(table()).await;
        svc.session(a).await.unwrap();
        let c = svc.open_session(table()).await;

        assert_eq!(svc.session_count().await, 2);
        assert!(svc.session(a).await.is_ok());
        assert_eq!(
            svc.session(b).await.err(),
            Some(MergeError::SessionNotFound(b.to_string()))
        );
        assert!(svc.session(c).await.is_ok());
    }

    #[tokio::test]
    async fn test_finished_markers_evicted_before_live_sessions() {
        let svc = limited(Duration::from_secs(3600), 2);
        let live = svc.open_session(table()).await;
        let done = svc.open_session(table()).await;
        svc.apply(done, Action::Submit("A".into())).await.unwrap();
        svc.apply(done, Action::Stop).await.unwrap();
        svc.open_session(table()).await;

        assert!(svc.session(live).await.is_ok());
        assert!(matches!(
            svc.session(done).await,
            Err(MergeError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let svc = limited(Duration::from_millis(20), 1024);
        let old = svc.open_session(table()).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(matches!(
            svc.session(old).await,
            Err(MergeError::SessionNotFound(_))
        ));
        assert_eq!(svc.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_opening_evicts_expired_sessions() {
        let svc = limited(Duration::from_millis(20), 1024);
        svc.open_session(table()).await;
        svc.open_session(table()).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        svc.open_session(table()).await;
        assert_eq!(svc.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let svc = CombineService::new(Config::default());
        let id = Uuid::new_v4();
        assert!(matches!(
            svc.apply(id, Action::Continue).await,
            Err(MergeError::SessionNotFound(_))
        ));
        assert!(svc.close(id).await.is_err());
    }
}
