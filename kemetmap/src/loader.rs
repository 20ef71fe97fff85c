//! Background loading of map data and hitbox rasters.
//!
//! Each request spawns its two jobs independently on the rayon pool. Results
//! come back over a channel and are applied by the interaction loop, which
//! never blocks on them unless asked to. Jobs are not cancelled; a completion
//! for an outdated selection is filtered out by the session's token check.

use crate::session::{LoadEvent, LoadRequest};
use kemetdata::{AssetLayout, HitboxImage, RegionCatalog};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

pub struct Loader {
    layout: AssetLayout,
    event_tx: Sender<LoadEvent>,
    event_rx: Receiver<LoadEvent>,
}

impl Loader {
    pub fn new(layout: AssetLayout) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            layout,
            event_tx,
            event_rx,
        }
    }

    /// Starts both loads for `request` and returns immediately.
    pub fn request(&self, request: LoadRequest) {
        let LoadRequest { token, players } = request;

        let tx = self.event_tx.clone();
        let path = self.layout.catalog(players);
        rayon::spawn(move || {
            let result = RegionCatalog::load(&path);
            let _ = tx.send(LoadEvent::Catalog {
                token,
                players,
                result,
            });
        });

        let tx = self.event_tx.clone();
        let path = self.layout.hitbox(players);
        rayon::spawn(move || {
            let result = HitboxImage::load(&path);
            let _ = tx.send(LoadEvent::Hitbox {
                token,
                players,
                result,
            });
        });
    }

    /// Completions that have arrived so far.
    pub fn poll(&self) -> Vec<LoadEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Blocks for the next completion, up to `timeout`.
    pub fn wait(&self, timeout: Duration) -> Option<LoadEvent> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Loads both assets for `request` on the calling thread, in parallel.
pub fn load_blocking(layout: &AssetLayout, request: LoadRequest) -> [LoadEvent; 2] {
    let LoadRequest { token, players } = request;
    let (catalog, hitbox) = rayon::join(
        || RegionCatalog::load(&layout.catalog(players)),
        || HitboxImage::load(&layout.hitbox(players)),
    );
    [
        LoadEvent::Catalog {
            token,
            players,
            result: catalog,
        },
        LoadEvent::Hitbox {
            token,
            players,
            result: hitbox,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PickerSession;
    use crate::testing::{create_mock_assets, four_players, three_players};
    use std::time::Instant;
    use tempfile::tempdir;

    fn drain_until_ready(loader: &Loader, session: &mut PickerSession) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !session.is_ready() && Instant::now() < deadline {
            if let Some(event) = loader.wait(Duration::from_millis(100)) {
                session.apply(event);
            }
        }
    }

    #[test]
    fn test_background_load_completes() {
        let dir = tempdir().unwrap();
        let layout = create_mock_assets(dir.path());
        let loader = Loader::new(layout.clone());
        let mut session = PickerSession::new(layout, three_players());

        loader.request(session.select(three_players()));
        drain_until_ready(&loader, &mut session);

        assert!(session.is_ready());
        assert_eq!(session.native_size(), Some((4, 2)));
    }

    #[test]
    fn test_rapid_reselect_last_request_wins() {
        let dir = tempdir().unwrap();
        let layout = create_mock_assets(dir.path());
        let loader = Loader::new(layout.clone());
        let mut session = PickerSession::new(layout, three_players());

        loader.request(session.select(four_players()));
        loader.request(session.select(three_players()));
        drain_until_ready(&loader, &mut session);

        assert!(session.is_ready());
        assert_eq!(session.players(), three_players());
        assert!(session.catalog().unwrap().get("A").is_some());

        // Anything still in flight belongs to the 4-player request
        let late: Vec<bool> = loader
            .poll()
            .into_iter()
            .map(|event| session.apply(event))
            .collect();
        assert!(late.iter().all(|applied| !applied));
        assert!(session.catalog().unwrap().get("D").is_none());
    }

    #[test]
    fn test_load_blocking_reports_both() {
        let dir = tempdir().unwrap();
        let layout = create_mock_assets(dir.path());
        let mut session = PickerSession::new(layout.clone(), four_players());
        let req = session.select(four_players());

        let [catalog, hitbox] = load_blocking(&layout, req);
        assert!(catalog.error().is_none());
        // No hitbox image is installed for 4 players
        assert!(hitbox.error().is_some());
    }
}
