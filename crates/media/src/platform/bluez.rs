//! Bluetooth AVRCP players as media sessions.
//!
//! A phone paired over Bluetooth exposes its player as an
//! `org.bluez.MediaPlayer1` object on the system bus. Each such object is one
//! session, ranked by object path. The track arrives as the player's `Track`
//! property, a dictionary with `Title`, `Artist` and `Album` entries.
//!
//! Signals are read on one thread per registration. A thread notices its
//! registration is gone at the next signal and exits then.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;

use zbus::blocking::fdo::{ObjectManagerProxy, PropertiesProxy};
use zbus::blocking::Connection;
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::error::{MediaError, Result};
use crate::info::MediaMetadata;
use crate::session::{
    CallbackToken, ControllerCallback, ControllerEvent, ControllerRef, ListenerComponent,
    MediaController, SessionEnumerator, SessionsCallback,
};

const BLUEZ: &str = "org.bluez";
const MEDIA_PLAYER_IFACE: &str = "org.bluez.MediaPlayer1";
const PROPERTIES_IFACE: &str = "org.freedesktop.DBus.Properties";
const OBJECT_MANAGER_IFACE: &str = "org.freedesktop.DBus.ObjectManager";
const TRACK_PROPERTY: &str = "Track";

type ManagedObjects = HashMap<OwnedObjectPath, HashMap<String, HashMap<String, OwnedValue>>>;
type Registry<T> = Mutex<HashMap<u64, T>>;

fn bus_error(e: impl Display) -> MediaError {
    MediaError::Enumeration(e.to_string())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Enumerates BlueZ media players on the system bus.
///
/// The bus connection is opened on first use and kept. A failed connect is
/// retried by the next call, so a tracker restarted after `bluetoothd` comes
/// up finds it.
pub struct BluezEnumerator {
    connection: Mutex<Option<Connection>>,
    listeners: Arc<Registry<SessionsCallback>>,
    next_token: AtomicU64,
}

impl BluezEnumerator {
    pub fn new() -> Self {
        Self {
            connection: Mutex::new(None),
            listeners: Arc::new(Mutex::new(HashMap::new())),
            next_token: AtomicU64::new(1),
        }
    }

    fn connection(&self) -> Result<Connection> {
        let mut slot = lock(&self.connection);
        if let Some(connection) = slot.as_ref() {
            return Ok(connection.clone());
        }

        let connection = Connection::system().map_err(bus_error)?;
        tracing::debug!("bluez_system_bus_connected");
        *slot = Some(connection.clone());
        Ok(connection)
    }
}

impl Default for BluezEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEnumerator for BluezEnumerator {
    fn active_sessions(&self, _component: &ListenerComponent) -> Result<Vec<ControllerRef>> {
        players(&self.connection()?)
    }

    fn add_sessions_listener(
        &self,
        _component: &ListenerComponent,
        callback: SessionsCallback,
    ) -> Result<CallbackToken> {
        let connection = self.connection()?;
        let manager = ObjectManagerProxy::builder(&connection)
            .destination(BLUEZ)
            .map_err(bus_error)?
            .path("/")
            .map_err(bus_error)?
            .build()
            .map_err(bus_error)?;
        let added = manager.receive_interfaces_added().map_err(bus_error)?;
        let removed = manager.receive_interfaces_removed().map_err(bus_error)?;

        let raw = self.next_token.fetch_add(1, Ordering::SeqCst);
        lock(&self.listeners).insert(raw, callback);

        let watchers = [
            watch_sessions(
                "bluez-players-added",
                added,
                |signal| {
                    signal.args().is_ok_and(|args| {
                        args.interfaces_and_properties()
                            .keys()
                            .any(|name| name.as_str() == MEDIA_PLAYER_IFACE)
                    })
                },
                connection.clone(),
                Arc::downgrade(&self.listeners),
                raw,
            ),
            watch_sessions(
                "bluez-players-removed",
                removed,
                |signal| {
                    signal.args().is_ok_and(|args| {
                        args.interfaces()
                            .iter()
                            .any(|name| name.as_str() == MEDIA_PLAYER_IFACE)
                    })
                },
                connection,
                Arc::downgrade(&self.listeners),
                raw,
            ),
        ];

        if let Some(e) = watchers.into_iter().find_map(|w| w.err()) {
            lock(&self.listeners).remove(&raw);
            return Err(MediaError::Registration(e.to_string()));
        }
        Ok(CallbackToken::new(raw))
    }

    fn remove_sessions_listener(&self, token: CallbackToken) {
        lock(&self.listeners).remove(&token.raw());
    }
}

/// Re-query the player list whenever `signals` yields a player change.
fn watch_sessions<I, F>(
    name: &str,
    signals: I,
    is_player_change: F,
    connection: Connection,
    listeners: Weak<Registry<SessionsCallback>>,
    raw: u64,
) -> std::io::Result<()>
where
    I: Iterator + Send + 'static,
    F: Fn(&I::Item) -> bool + Send + 'static,
{
    thread::Builder::new().name(name.to_string()).spawn(move || {
        for signal in signals {
            let Some(listeners) = listeners.upgrade() else {
                break;
            };
            let Some(callback) = lock(&listeners).get(&raw).cloned() else {
                break;
            };
            if !is_player_change(&signal) {
                continue;
            }

            match players(&connection) {
                Ok(controllers) => callback(controllers),
                Err(e) => tracing::warn!(error = %e, "bluez_player_query_failed"),
            }
        }
        tracing::debug!(token = raw, "bluez_sessions_watcher_exited");
    })?;
    Ok(())
}

/// Every `MediaPlayer1` object BlueZ manages, ordered by path.
fn players(connection: &Connection) -> Result<Vec<ControllerRef>> {
    let objects: ManagedObjects = connection
        .call_method(
            Some(BLUEZ),
            "/",
            Some(OBJECT_MANAGER_IFACE),
            "GetManagedObjects",
            &(),
        )
        .map_err(bus_error)?
        .body()
        .deserialize()
        .map_err(bus_error)?;

    let mut paths: Vec<OwnedObjectPath> = objects
        .into_iter()
        .filter(|(_, interfaces)| interfaces.contains_key(MEDIA_PLAYER_IFACE))
        .map(|(path, _)| path)
        .collect();
    paths.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    Ok(paths
        .into_iter()
        .map(|path| {
            Arc::new(BluezPlayer {
                connection: connection.clone(),
                path,
                callbacks: Arc::new(Mutex::new(HashMap::new())),
                next_token: AtomicU64::new(1),
            }) as ControllerRef
        })
        .collect())
}

/// One `org.bluez.MediaPlayer1` object.
struct BluezPlayer {
    connection: Connection,
    path: OwnedObjectPath,
    callbacks: Arc<Registry<ControllerCallback>>,
    next_token: AtomicU64,
}

impl MediaController for BluezPlayer {
    fn package_name(&self) -> String {
        self.path.as_str().to_string()
    }

    fn metadata(&self) -> Option<MediaMetadata> {
        match read_track(&self.connection, &self.path) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::debug!(path = %self.path.as_str(), error = %e, "bluez_track_unavailable");
                None
            }
        }
    }

    fn register_callback(&self, callback: ControllerCallback) -> Result<CallbackToken> {
        let properties = PropertiesProxy::builder(&self.connection)
            .destination(BLUEZ)
            .map_err(bus_error)?
            .path(self.path.as_str().to_string())
            .map_err(bus_error)?
            .build()
            .map_err(bus_error)?;
        let signals = properties
            .receive_properties_changed()
            .map_err(|e| MediaError::Registration(e.to_string()))?;

        let raw = self.next_token.fetch_add(1, Ordering::SeqCst);
        lock(&self.callbacks).insert(raw, callback);

        let callbacks = Arc::downgrade(&self.callbacks);
        let connection = self.connection.clone();
        let path = self.path.clone();
        let spawned = thread::Builder::new()
            .name("bluez-player".to_string())
            .spawn(move || {
                for signal in signals {
                    let Some(callbacks) = callbacks.upgrade() else {
                        break;
                    };
                    let Some(callback) = lock(&callbacks).get(&raw).cloned() else {
                        break;
                    };
                    let Ok(args) = signal.args() else {
                        continue;
                    };
                    if args.interface_name().as_str() != MEDIA_PLAYER_IFACE
                        || !args.changed_properties().contains_key(TRACK_PROPERTY)
                    {
                        continue;
                    }

                    let metadata = read_track(&connection, &path).ok();
                    callback(ControllerEvent::MetadataChanged(metadata));
                }
                tracing::debug!(token = raw, "bluez_player_watcher_exited");
            });

        if let Err(e) = spawned {
            lock(&self.callbacks).remove(&raw);
            return Err(MediaError::Registration(e.to_string()));
        }
        Ok(CallbackToken::new(raw))
    }

    fn unregister_callback(&self, token: CallbackToken) {
        lock(&self.callbacks).remove(&token.raw());
    }
}

fn read_track(connection: &Connection, path: &OwnedObjectPath) -> Result<MediaMetadata> {
    let value: OwnedValue = connection
        .call_method(
            Some(BLUEZ),
            path.as_str(),
            Some(PROPERTIES_IFACE),
            "Get",
            &(MEDIA_PLAYER_IFACE, TRACK_PROPERTY),
        )
        .map_err(bus_error)?
        .body()
        .deserialize()
        .map_err(bus_error)?;
    let track = HashMap::<String, OwnedValue>::try_from(value).map_err(bus_error)?;

    Ok(track_metadata(&track))
}

fn track_metadata(track: &HashMap<String, OwnedValue>) -> MediaMetadata {
    let field = |key: &str| track.get(key).and_then(|value| text(value));

    MediaMetadata {
        artist: field("Artist"),
        title: field("Title"),
        album: field("Album"),
    }
}

/// A string entry, or a list of them joined with ", ". Blank entries are dropped.
fn text(value: &Value<'_>) -> Option<String> {
    let joined = match value {
        Value::Str(s) => s.as_str().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Str(s) if !s.as_str().is_empty() => Some(s.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };

    (!joined.is_empty()).then_some(joined)
}
