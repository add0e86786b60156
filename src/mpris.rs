//! MPRIS (D-Bus) integration so OS media keys and `playerctl` can drive the
//! player and read now-playing metadata.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::object_server::InterfaceRef;
use zbus::{Connection, interface};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::catalog::Track;
use crate::player::PlayerState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.vibetunes";

/// How often the service checks for state changes to announce.
const NOTIFY_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlayerState,
    track_id: Option<OwnedObjectPath>,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlayerState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Publish metadata for the loaded track, or clear it.
    pub fn set_track_metadata(&self, track: Option<&Track>) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(t) => {
                    s.track_id =
                        OwnedObjectPath::try_from(format!("{OBJECT_PATH}/track/{}", t.id)).ok();
                    s.title = Some(t.title.clone());
                    s.artist = if t.artist.trim().is_empty() {
                        Vec::new()
                    } else {
                        vec![t.artist.clone()]
                    };
                    s.url = Some(t.preview_url.clone());
                    s.art_url = (!t.cover_url.is_empty()).then(|| t.cover_url.clone());
                    s.length_micros = (t.duration_secs > 0)
                        .then(|| i64::try_from(t.duration_secs.saturating_mul(1_000_000)).ok())
                        .flatten();
                }
                None => {
                    let playback = s.playback;
                    *s = SharedState {
                        playback,
                        ..SharedState::default()
                    };
                }
            }
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "vibetunes"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlayerState::Idle => "Stopped",
            PlayerState::Playing => "Playing",
            PlayerState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Option<OwnedValue>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };

        put(
            "mpris:trackid",
            s.track_id.clone().and_then(|p| owned(Value::from(p))),
        );
        put("xesam:title", s.title.clone().and_then(|t| owned(Value::from(t))));
        if !s.artist.is_empty() {
            put("xesam:artist", owned(Value::from(s.artist.clone())));
        }
        put("xesam:url", s.url.clone().and_then(|u| owned(Value::from(u))));
        put("mpris:artUrl", s.art_url.clone().and_then(|u| owned(Value::from(u))));
        put("mpris:length", s.length_micros.and_then(|l| owned(Value::from(l))));
        map
    }
}

/// Announce current properties until the handle goes away.
async fn announce_changes(player: InterfaceRef<PlayerIface>, notify: Receiver<()>) {
    loop {
        Timer::after(NOTIFY_INTERVAL).await;

        let mut changed = false;
        loop {
            match notify.try_recv() {
                Ok(()) => changed = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return,
            }
        }
        if !changed {
            continue;
        }

        let emitter = player.signal_emitter();
        let iface = player.get().await;
        if let Err(e) = iface.playback_status_changed(emitter).await {
            debug!(error = %e, "MPRIS: failed to emit PlaybackStatus change");
        }
        if let Err(e) = iface.metadata_changed(emitter).await {
            debug!(error = %e, "MPRIS: failed to emit Metadata change");
        }
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }

            let player = match object_server
                .interface::<_, PlayerIface>(OBJECT_PATH)
                .await
            {
                Ok(p) => p,
                Err(e) => {
                    warn!(error = %e, "MPRIS: player iface not reachable");
                    return;
                }
            };

            debug!(name = BUS_NAME, "MPRIS service registered");
            announce_changes(player, notify_rx).await;
        });
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}
