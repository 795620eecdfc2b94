//! Per-client session bookkeeping: each connected client gets a lazily
//! created [`PropertyMapping`] recording the descriptors it has pushed
//! via `PutPropertyMapping` and the version that came with them.
//!
//! Grounded on `ErebusService::SessionData`/`m_sessions` in
//! `erebus_service.hxx`: a `SessionStore<clientId, SessionData>` where
//! `SessionData` is exactly `{propertyMapping, mappingVersion}` — fields
//! `PropertyMapping` already carries, so no wrapper struct is needed here.

use std::sync::Arc;
use std::time::Duration;

use procall_mapping::PropertyMapping;
use procall_property::PropertyInfo;
use procall_session::SessionStore;
use procall_wire::PropertyInfoWire;

pub type ClientSessions = SessionStore<u32, PropertyMapping>;

pub fn new_sessions(inactivity_threshold: Duration) -> ClientSessions {
    SessionStore::new(inactivity_threshold)
}

/// Applies one `PutPropertyMapping` frame to `client_id`'s session,
/// per §4.3: decode the descriptor, bind it at the id the client uses,
/// and record the client's new mapping version.
///
/// The session lease only gates eviction, never access (§4.6.4 step 2):
/// concurrent `PutPropertyMapping`/`GenericCall` traffic for the same
/// client writes and reads the same `PropertyMapping` through its own
/// internal lock.
pub fn apply_mapping_frame(
    sessions: &ClientSessions,
    client_id: u32,
    remote_id: u32,
    descriptor: &PropertyInfoWire,
    mapping_version: u32,
) -> Result<(), procall_wire::WireError> {
    let info = procall_wire::decode_info(descriptor)?;
    let session = sessions.get(&client_id);
    session.insert(remote_id, Arc::new(info));
    session.set_version(mapping_version);
    Ok(())
}

/// Whether the server has a usable mapping for `client_id` at
/// `client_reported_version` (§4.6.4 step 3).
pub fn mapping_is_current(sessions: &ClientSessions, client_id: u32, client_reported_version: u32) -> bool {
    let session = sessions.get(&client_id);
    !session.is_wildcard() && session.version() == client_reported_version
}

/// Translates one remote property id into a local descriptor, per
/// §4.6.4 step 4. `None` means the server hasn't seen this id yet —
/// callers treat that the same as a version mismatch.
pub fn resolve_remote_id(sessions: &ClientSessions, client_id: u32, remote_id: u32) -> Option<Arc<PropertyInfo>> {
    sessions.get(&client_id).lookup(remote_id)
}

/// The server's current mapping version for `client_id`, attached to
/// every reply regardless of outcome (§4.6.4 steps 3/5/6).
pub fn current_version(sessions: &ClientSessions, client_id: u32) -> u32 {
    sessions.get(&client_id).version()
}
