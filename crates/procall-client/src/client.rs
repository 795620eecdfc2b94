//! The client-side call-construction/reply-interpretation core.
//!
//! Grounded on `ClientImpl` in `grpc_client.cxx`: builds request frames
//! stamped with the client's id and its local property-mapping version,
//! and interprets replies against the [`procall_mapping::PropertyMapping`]
//! cache of server-assigned ids (`m_propertyMapping` / `mapProperty` in
//! the source). No transport call is made from this crate — an adapter
//! outside it drives the actual RPC and feeds replies back in.

use std::sync::Arc;

use procall_mapping::PropertyMapping;
use procall_property::{PropertyBag, PropertyRegistry};
use procall_wire::{
    CallResult, GetPropertyMappingReply, PingReply, PingRequest, PutPropertyMappingRequest,
    ServiceReply, ServiceRequest,
};
use rand::Rng;

use crate::outcome::{CallOutcome, ClientException, StreamEvent};

fn make_client_id() -> u32 {
    rand::thread_rng().gen()
}

/// Client-side state for one logical connection: an id, the registry of
/// properties this side knows about, and the cache of descriptors the
/// peer has told us about via `GetPropertyMapping`.
pub struct Client {
    client_id: u32,
    registry: Arc<PropertyRegistry>,
    mapping: PropertyMapping,
    /// Holds the process-wide subsystem window open for this client's
    /// lifetime (§5's reference-counted transport-runtime init/finalize
    /// pair). Never read after construction; kept alive for its `Drop`.
    _process_guard: procall_worker::ProcessGuardDyn,
}

impl Client {
    pub fn new(registry: Arc<PropertyRegistry>) -> Self {
        let process_guard = procall_worker::ProcessGuardDyn::new(
            || tracing::info!("procall-client process state initialized"),
            Box::new(|| tracing::info!("procall-client process state finalized")),
        );
        Self {
            client_id: make_client_id(),
            registry,
            mapping: PropertyMapping::new(),
            _process_guard: process_guard,
        }
    }

    pub fn client_id(&self) -> u32 {
        self.client_id
    }

    /// The version of the server's property mapping this client has
    /// cached locally. `u32::MAX` (see [`procall_mapping::WILDCARD_VERSION`])
    /// until the first `GetPropertyMapping` round completes.
    pub fn mapping_version(&self) -> u32 {
        self.mapping.version()
    }

    pub fn build_ping(&self, payload: Vec<u8>, timestamp: u64) -> PingRequest {
        PingRequest { client_id: self.client_id, timestamp, payload }
    }

    /// Builds one `PutPropertyMapping` frame per descriptor this client
    /// currently has registered, so the server can translate the ids
    /// this client will use in subsequent calls.
    pub fn build_put_mapping_frames(&self) -> Vec<PutPropertyMappingRequest> {
        let mut frames = Vec::new();
        let version = self.registry.enumerate(|info| {
            frames.push(PutPropertyMappingRequest {
                client_id: self.client_id,
                mapping_version: 0, // patched below
                mapping: procall_wire::encode_info(info),
            });
        });
        for frame in &mut frames {
            frame.mapping_version = version;
        }
        frames
    }

    /// Applies one inbound `GetPropertyMapping` frame to the server
    /// descriptor cache.
    pub fn apply_mapping_frame(&self, frame: &GetPropertyMappingReply) -> procall_wire::Result<()> {
        let info = procall_wire::decode_info(&frame.mapping)?;
        self.mapping.insert(frame.mapping.id, Arc::new(info));
        self.mapping.set_version(frame.mapping_version);
        Ok(())
    }

    /// Builds a `GenericCall`/`GenericStream` request frame, encoding
    /// each argument under its own registered id (the id the *server*
    /// will learn about via this client's `PutPropertyMapping` frames).
    pub fn build_request(&self, name: &str, args: &PropertyBag) -> ServiceRequest {
        let wire_args = args
            .iter()
            .map(|prop| procall_wire::encode(prop, prop.info().unique_id().unwrap_or(0)))
            .collect();

        ServiceRequest {
            request: name.to_string(),
            client_id: self.client_id,
            mapping_version: self.registry.version(),
            args: wire_args,
            cookie: None,
        }
    }

    /// Interprets a `GenericCall` reply.
    pub fn interpret_call_reply(&self, reply: &ServiceReply) -> CallOutcome {
        if reply.result == CallResult::PropertyMappingExpired {
            return CallOutcome::ServerMappingExpired;
        }

        if reply.result != CallResult::Success && reply.exception.is_none() {
            return CallOutcome::TransportFailure(procall_wire::ResultCode::Failure);
        }

        if reply.mapping_version != self.mapping.version() {
            return CallOutcome::ClientMappingExpired;
        }

        if let Some(exception) = &reply.exception {
            return CallOutcome::Exception(self.unmarshal_exception(exception));
        }

        CallOutcome::Reply(self.unmarshal_props(&reply.props))
    }

    /// Interprets one `GenericStream` reply frame. Precedence: server
    /// mapping expiry, then client mapping expiry, then exception, then
    /// data — matching `ServiceReplyStreamReader::OnReadDone`.
    pub fn interpret_stream_frame(&self, reply: &ServiceReply) -> StreamEvent {
        if reply.result == CallResult::PropertyMappingExpired {
            return StreamEvent::ServerMappingExpired;
        }

        if reply.result != CallResult::Success && reply.exception.is_none() {
            return StreamEvent::TransportFailure(procall_wire::ResultCode::Failure);
        }

        if reply.mapping_version != self.mapping.version() {
            return StreamEvent::ClientMappingExpired;
        }

        if let Some(exception) = &reply.exception {
            return StreamEvent::Exception(self.unmarshal_exception(exception));
        }

        if reply.props.is_empty() {
            return StreamEvent::EndOfStream;
        }

        StreamEvent::Frame(self.unmarshal_props(&reply.props))
    }

    pub fn ping_round_trip(&self, req: &PingRequest, reply: &PingReply) -> bool {
        req.client_id == reply.client_id && req.timestamp == reply.timestamp && req.payload == reply.payload
    }

    fn unmarshal_props(&self, wire: &[procall_wire::PropertyWire]) -> PropertyBag {
        let mut bag = PropertyBag::with_capacity(wire.len());
        for w in wire {
            let Some(info) = self.mapping.lookup(w.id) else {
                tracing::warn!(id = w.id, "reply carries an unmapped property id, dropping it");
                continue;
            };
            match procall_wire::decode(w, info) {
                Ok(prop) => bag.push(prop),
                Err(err) => tracing::warn!(error = %err, "failed to decode reply property"),
            }
        }
        bag
    }

    fn unmarshal_exception(&self, exception: &procall_wire::ExceptionReply) -> ClientException {
        ClientException { message: exception.message.clone(), props: self.unmarshal_props(&exception.props) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procall_property::{PropertyInfo, PropertyType};
    use procall_wire::PropertyInfoWire;
    use pretty_assertions::assert_eq;

    fn client() -> Client {
        Client::new(Arc::new(PropertyRegistry::new()))
    }

    #[test]
    fn two_clients_get_distinct_ids() {
        let a = client();
        let b = client();
        assert_ne!(a.client_id(), b.client_id());
    }

    #[test]
    fn fresh_client_mapping_is_wildcard() {
        let c = client();
        assert_eq!(c.mapping_version(), procall_mapping::WILDCARD_VERSION);
    }

    #[test]
    fn applying_a_mapping_frame_updates_the_cache() {
        let c = client();
        let frame = GetPropertyMappingReply {
            mapping_version: 4,
            mapping: PropertyInfoWire { id: 2, ty: PropertyType::Int32.to_wire(), name: "x".into(), readable_name: "x".into() },
        };
        c.apply_mapping_frame(&frame).unwrap();
        assert_eq!(c.mapping_version(), 4);
    }

    #[test]
    fn server_mapping_expiry_takes_precedence() {
        let c = client();
        let reply = ServiceReply {
            result: CallResult::PropertyMappingExpired,
            mapping_version: 999,
            props: Vec::new(),
            exception: None,
        };
        assert_eq!(c.interpret_call_reply(&reply), CallOutcome::ServerMappingExpired);
    }

    #[test]
    fn client_mapping_expiry_is_detected_after_server_check() {
        let c = client();
        let reply = ServiceReply { result: CallResult::Success, mapping_version: 7, props: Vec::new(), exception: None };
        assert_eq!(c.interpret_call_reply(&reply), CallOutcome::ClientMappingExpired);
    }

    #[test]
    fn a_reply_decodes_once_mapping_matches() {
        let c = client();
        let frame = GetPropertyMappingReply {
            mapping_version: 1,
            mapping: PropertyInfoWire { id: 3, ty: PropertyType::Int32.to_wire(), name: "n".into(), readable_name: "n".into() },
        };
        c.apply_mapping_frame(&frame).unwrap();

        let info = Arc::new(PropertyInfo::with_id(PropertyType::Int32, "n", "n", 3));
        let prop = procall_property::Property::int32(5, info);
        let wire = procall_wire::encode(&prop, 3);

        let reply = ServiceReply { result: CallResult::Success, mapping_version: 1, props: vec![wire], exception: None };
        match c.interpret_call_reply(&reply) {
            CallOutcome::Reply(bag) => assert_eq!(bag.len(), 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn empty_stream_frame_is_end_of_stream() {
        let c = client();
        let reply = ServiceReply {
            result: CallResult::Success,
            mapping_version: procall_mapping::WILDCARD_VERSION,
            props: Vec::new(),
            exception: None,
        };
        assert_eq!(c.interpret_stream_frame(&reply), StreamEvent::EndOfStream);
    }
}
