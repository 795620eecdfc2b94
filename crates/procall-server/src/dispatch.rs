//! Transport-agnostic call dispatch. This is the part of `ErebusService`
//! left once gRPC's reactor objects are peeled away: given a decoded
//! request, produce a reply (or a stream of them). What drives these
//! methods from an actual transport lives outside this crate.

use std::sync::Arc;

use procall_property::{PropertyBag, PropertyRegistry};
use procall_service::{Service, ServiceError, ServiceRegistry, StreamId};
use procall_wire::{
    CallResult, GetPropertyMappingReply, PingReply, PingRequest, PropertyInfoWire,
    PropertyWire, PutPropertyMappingRequest, ServiceReply, ServiceRequest,
};
use tokio::sync::mpsc;

use crate::config::ServerConfig;
use crate::exception;
use crate::session::{self, ClientSessions};

/// The call-dispatch core: everything `procall-server`'s transport
/// adapters need to answer the four RPC endpoints, with no transport
/// crate in its dependency graph.
pub struct Server {
    pub config: ServerConfig,
    pub properties: Arc<PropertyRegistry>,
    pub services: Arc<ServiceRegistry>,
    pub sessions: Arc<ClientSessions>,
    /// Holds the process-wide subsystem window open for this server's
    /// lifetime (§5's reference-counted transport-runtime init/finalize
    /// pair). Never read after construction; kept alive for its `Drop`.
    _process_guard: procall_worker::ProcessGuardDyn,
}

impl Server {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let sessions = Arc::new(session::new_sessions(config.session_inactivity_threshold));
        let process_guard = procall_worker::ProcessGuardDyn::new(
            || tracing::info!("procall-server process state initialized"),
            Box::new(|| tracing::info!("procall-server process state finalized")),
        );
        Arc::new(Self {
            config,
            properties: Arc::new(PropertyRegistry::new()),
            services: Arc::new(ServiceRegistry::new()),
            sessions,
            _process_guard: process_guard,
        })
    }

    /// §4.6.1 Ping: echoes the client's frame back unchanged. No mapping
    /// negotiation involved.
    pub fn ping(&self, req: PingRequest) -> PingReply {
        PingReply { client_id: req.client_id, timestamp: req.timestamp, payload: req.payload }
    }

    /// §4.6.2 GetPropertyMapping, Begin: snapshots the registry once and
    /// remembers its version. The caller (the transport adapter) streams
    /// the returned frames out one at a time, in order; this function
    /// does no I/O of its own.
    pub fn get_property_mapping_snapshot(&self) -> Vec<GetPropertyMappingReply> {
        let mut out = Vec::new();
        let version = self.properties.enumerate(|info| {
            out.push(GetPropertyMappingReply {
                mapping_version: 0, // patched below, once the final version is known
                mapping: procall_wire::encode_info(info),
            });
        });
        for reply in &mut out {
            reply.mapping_version = version;
        }
        out
    }

    /// §4.6.3 PutPropertyMapping: applies one inbound frame under the
    /// client's session. An empty stream (the transport adapter never
    /// calling this) is a no-op by construction.
    pub fn put_property_mapping_frame(&self, req: PutPropertyMappingRequest) -> procall_wire::Result<()> {
        session::apply_mapping_frame(&self.sessions, req.client_id, req.mapping.id, &req.mapping, req.mapping_version)
    }

    /// §4.6.4 Generic unary call.
    pub async fn generic_call(&self, req: ServiceRequest) -> Option<ServiceReply> {
        let Some(service) = self.services.find(&req.request) else {
            return None; // transport layer answers UNIMPLEMENTED
        };

        let server_version = session::current_version(&self.sessions, req.client_id);

        if !session::mapping_is_current(&self.sessions, req.client_id, req.mapping_version) {
            return Some(ServiceReply {
                result: CallResult::PropertyMappingExpired,
                mapping_version: server_version,
                props: Vec::new(),
                exception: None,
            });
        }

        let args = match self.unmarshal_args(&req) {
            Ok(args) => args,
            Err(_) => {
                return Some(ServiceReply {
                    result: CallResult::PropertyMappingExpired,
                    mapping_version: server_version,
                    props: Vec::new(),
                    exception: None,
                })
            }
        };

        let reply = match service.request(&req.request, req.client_id, &args).await {
            Ok(result) => ServiceReply {
                result: CallResult::Success,
                mapping_version: server_version,
                props: marshal_reply_props(&result),
                exception: None,
            },
            Err(err) => ServiceReply {
                // the call completed; it produced an exception reply, not a
                // transport failure — only the streaming error path uses
                // CallResult::Failure
                result: CallResult::Success,
                mapping_version: server_version,
                props: Vec::new(),
                exception: Some(exception::marshal(&err)),
            },
        };

        Some(reply)
    }

    /// §4.6.5 Generic streaming call, `Lookup` and the mismatch checks
    /// done eagerly; the remainder of the state machine runs as a
    /// supervised task feeding `rx`. The stream ends either because the
    /// transport drops `rx` (the next send fails) or because it calls
    /// `cancel()` on the returned token (§5's `OnCancel`) — both paths
    /// call `end_stream` before the task finishes.
    pub fn generic_stream(
        self: &Arc<Self>,
        req: ServiceRequest,
    ) -> Option<(mpsc::Receiver<ServiceReply>, procall_worker::CancelToken)> {
        let service = self.services.find(&req.request)?;
        let (tx, rx) = mpsc::channel(1);
        let cancel = procall_worker::CancelToken::new();
        let task_cancel = cancel.clone();
        let this = Arc::clone(self);

        procall_worker::spawn_supervised("generic-stream", async move {
            this.drive_stream(service, req, tx, task_cancel).await;
        });

        Some((rx, cancel))
    }

    async fn drive_stream(
        &self,
        service: Arc<dyn Service>,
        req: ServiceRequest,
        tx: mpsc::Sender<ServiceReply>,
        cancel: procall_worker::CancelToken,
    ) {
        let server_version = session::current_version(&self.sessions, req.client_id);

        if !session::mapping_is_current(&self.sessions, req.client_id, req.mapping_version) {
            let _ = tx
                .send(ServiceReply {
                    result: CallResult::PropertyMappingExpired,
                    mapping_version: server_version,
                    props: Vec::new(),
                    exception: None,
                })
                .await;
            return;
        }

        let args = match self.unmarshal_args(&req) {
            Ok(args) => args,
            Err(_) => {
                let _ = tx
                    .send(ServiceReply {
                        result: CallResult::PropertyMappingExpired,
                        mapping_version: server_version,
                        props: Vec::new(),
                        exception: None,
                    })
                    .await;
                return;
            }
        };

        let stream_id = match service.begin_stream(&req.request, req.client_id, &args).await {
            Ok(id) => id,
            Err(err) => {
                let _ = tx
                    .send(ServiceReply {
                        result: CallResult::Failure,
                        mapping_version: server_version,
                        props: Vec::new(),
                        exception: Some(exception::marshal(&err)),
                    })
                    .await;
                return;
            }
        };

        loop {
            let frame = tokio::select! {
                _ = cancel.cancelled() => break,
                result = service.next(stream_id) => match result {
                    Ok(frame) => frame,
                    Err(err) => {
                        let _ = tx
                            .send(ServiceReply {
                                result: CallResult::Failure,
                                mapping_version: server_version,
                                props: Vec::new(),
                                exception: Some(exception::marshal(&err)),
                            })
                            .await;
                        break;
                    }
                },
            };

            if frame.is_empty() {
                break; // end of stream
            }

            let reply = ServiceReply {
                result: CallResult::Success,
                mapping_version: server_version,
                props: marshal_reply_props(&frame),
                exception: None,
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                result = tx.send(reply) => if result.is_err() {
                    break; // consumer dropped the receiver: cancellation
                },
            }
        }

        service.end_stream(stream_id).await;
    }

    fn unmarshal_args(&self, req: &ServiceRequest) -> Result<PropertyBag, ServiceError> {
        let mut bag = PropertyBag::with_capacity(req.args.len());
        for arg in &req.args {
            let info = session::resolve_remote_id(&self.sessions, req.client_id, arg.id)
                .ok_or_else(|| ServiceError::InvalidArgument(format!("unmapped property id {}", arg.id)))?;
            let prop = procall_wire::decode(arg, info)
                .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;
            bag.push(prop);
        }
        Ok(bag)
    }
}

fn marshal_reply_props(bag: &PropertyBag) -> Vec<PropertyWire> {
    bag.iter()
        .enumerate()
        .map(|(i, prop)| procall_wire::encode(prop, prop.info().unique_id().unwrap_or(i as u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use procall_property::{Property, PropertyInfo, PropertyType};
    use pretty_assertions::assert_eq;

    struct Echo;

    #[async_trait]
    impl Service for Echo {
        async fn request(&self, _name: &str, _client_id: u32, args: &PropertyBag) -> procall_service::Result<PropertyBag> {
            Ok(args.clone())
        }
        async fn begin_stream(&self, _name: &str, _client_id: u32, args: &PropertyBag) -> procall_service::Result<StreamId> {
            let _ = args;
            Ok(StreamId(1))
        }
        async fn next(&self, _id: StreamId) -> procall_service::Result<PropertyBag> {
            Ok(PropertyBag::new())
        }
        async fn end_stream(&self, _id: StreamId) {}
    }

    fn server() -> Arc<Server> {
        Server::new(ServerConfig::default())
    }

    #[tokio::test]
    async fn ping_echoes_the_frame() {
        let server = server();
        let reply = server.ping(PingRequest { client_id: 1, timestamp: 9, payload: vec![1, 2, 3] });
        assert_eq!(reply.payload, vec![1, 2, 3]);
        assert_eq!(reply.client_id, 1);
    }

    #[tokio::test]
    async fn generic_call_is_unimplemented_for_an_unknown_service() {
        let server = server();
        let req = ServiceRequest {
            request: "nope".into(),
            client_id: 1,
            mapping_version: 0,
            args: Vec::new(),
            cookie: None,
        };
        assert!(server.generic_call(req).await.is_none());
    }

    #[tokio::test]
    async fn generic_call_rejects_stale_mapping_version() {
        let server = server();
        server.services.register("echo", Arc::new(Echo));
        let req = ServiceRequest {
            request: "echo".into(),
            client_id: 1,
            mapping_version: 0,
            args: Vec::new(),
            cookie: None,
        };
        let reply = server.generic_call(req).await.unwrap();
        assert_eq!(reply.result, CallResult::PropertyMappingExpired);
    }

    #[tokio::test]
    async fn generic_call_succeeds_once_mapping_is_current() {
        let server = server();
        server.services.register("echo", Arc::new(Echo));

        let descriptor = PropertyInfoWire { id: 5, ty: PropertyType::Int32.to_wire(), name: "n".into(), readable_name: "n".into() };
        server
            .put_property_mapping_frame(PutPropertyMappingRequest { client_id: 1, mapping_version: 3, mapping: descriptor })
            .unwrap();

        let info = Arc::new(PropertyInfo::with_id(PropertyType::Int32, "n", "n", 5));
        let prop = Property::int32(42, info);
        let wire = procall_wire::encode(&prop, 5);

        let req = ServiceRequest {
            request: "echo".into(),
            client_id: 1,
            mapping_version: 3,
            args: vec![wire],
            cookie: None,
        };
        let reply = server.generic_call(req).await.unwrap();
        assert_eq!(reply.result, CallResult::Success);
        assert_eq!(reply.props.len(), 1);
    }

    #[tokio::test]
    async fn generic_stream_ends_after_empty_frame() {
        let server = server();
        server.services.register("echo", Arc::new(Echo));

        let descriptor = PropertyInfoWire { id: 1, ty: PropertyType::Int32.to_wire(), name: "n".into(), readable_name: "n".into() };
        server
            .put_property_mapping_frame(PutPropertyMappingRequest { client_id: 2, mapping_version: 1, mapping: descriptor })
            .unwrap();

        let req = ServiceRequest { request: "echo".into(), client_id: 2, mapping_version: 1, args: Vec::new(), cookie: None };
        let (mut rx, _cancel) = server.generic_stream(req).unwrap();
        // `Echo::next` always returns empty, so the stream ends immediately
        // with no frames at all.
        assert!(rx.recv().await.is_none());
    }
}
