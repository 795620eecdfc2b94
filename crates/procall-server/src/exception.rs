//! Marshals a [`ServiceError`] escaping from a [`procall_service::Service`]
//! call into the wire's [`ExceptionReply`], the one spot the source calls
//! the `ExceptionMarshaler` adapter — it simultaneously logs and writes
//! the reply, so the reactor never lets an exception cross the transport
//! boundary as a transport failure.

use procall_service::ServiceError;
use procall_wire::{ExceptionReply, PropertyWire};

pub fn marshal(err: &ServiceError) -> ExceptionReply {
    tracing::error!(error = %err, "service call raised an exception");

    match err {
        ServiceError::Application { message, props } => ExceptionReply {
            message: message.clone(),
            props: props
                .iter()
                .enumerate()
                .map(|(i, p)| procall_wire::encode(p, p.info().unique_id().unwrap_or(i as u32)))
                .collect::<Vec<PropertyWire>>(),
        },
        other => ExceptionReply { message: other.to_string(), props: Vec::new() },
    }
}
