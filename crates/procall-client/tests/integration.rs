//! End-to-end scenarios against `Client` directly, with the server side
//! hand-built from `procall-wire` message values rather than a real
//! transport. Covers the request-building and reply-interpretation half
//! of the seeded scenarios: mapping negotiation, a successful call, the
//! server/client mapping-expiry precedence, and stream interpretation.

use std::sync::Arc;

use procall_client::{CallOutcome, Client, StreamEvent};
use procall_property::{Property, PropertyInfo, PropertyRegistry, PropertyType};
use procall_wire::{
    CallResult, ExceptionReply, GetPropertyMappingReply, PropertyInfoWire, ServiceReply,
};
use pretty_assertions::assert_eq;

fn registry_with_one_property() -> (Arc<PropertyRegistry>, Arc<PropertyInfo>) {
    let registry = Arc::new(PropertyRegistry::new());
    let info = registry.register(PropertyInfo::new(PropertyType::Int32, "n", "N"));
    (registry, info)
}

#[test]
fn scenario_1_ping_round_trips() {
    let (registry, _) = registry_with_one_property();
    let client = Client::new(registry);
    let req = client.build_ping(vec![1, 2, 3], 42);
    // the server side just echoes the frame back unchanged
    let reply = procall_wire::PingReply { client_id: req.client_id, timestamp: req.timestamp, payload: req.payload.clone() };
    assert!(client.ping_round_trip(&req, &reply));
}

#[test]
fn scenario_2_mapping_negotiation_then_a_successful_call() {
    let (registry, info) = registry_with_one_property();
    let client = Client::new(registry);

    // client tells the server about its own descriptors
    let put_frames = client.build_put_mapping_frames();
    assert_eq!(put_frames.len(), 1);
    assert_eq!(put_frames[0].mapping.name, "n");

    // server tells the client about its descriptors (a different remote id
    // than the client's own local one, as would happen against a real peer)
    let server_frame = GetPropertyMappingReply {
        mapping_version: 1,
        mapping: PropertyInfoWire { id: 99, ty: PropertyType::Int32.to_wire(), name: "n".into(), readable_name: "N".into() },
    };
    client.apply_mapping_frame(&server_frame).unwrap();
    assert_eq!(client.mapping_version(), 1);

    // build a call, with the server replying success under the agreed id
    let mut args = procall_property::PropertyBag::new();
    args.push(Property::int32(7, Arc::clone(&info)));
    let request = client.build_request("echo", &args);
    assert_eq!(request.request, "echo");
    assert_eq!(request.args.len(), 1);

    let wire = procall_wire::encode(&args[0], 99);
    let reply = ServiceReply { result: CallResult::Success, mapping_version: 1, props: vec![wire], exception: None };
    match client.interpret_call_reply(&reply) {
        CallOutcome::Reply(bag) => {
            assert_eq!(bag.len(), 1);
            assert_eq!(bag[0].get_int32(), 7);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn scenario_3_server_mapping_expiry_wins_over_everything_else() {
    let (registry, _) = registry_with_one_property();
    let client = Client::new(registry);
    let reply = ServiceReply {
        result: CallResult::PropertyMappingExpired,
        mapping_version: 123,
        props: Vec::new(),
        exception: Some(ExceptionReply { message: "irrelevant".into(), props: Vec::new() }),
    };
    assert_eq!(client.interpret_call_reply(&reply), CallOutcome::ServerMappingExpired);
}

#[test]
fn scenario_4_client_mapping_expiry_is_detected_once_server_result_is_ok() {
    let (registry, _) = registry_with_one_property();
    let client = Client::new(registry);
    // the client never cached a server mapping, so its version (WILDCARD)
    // never matches a concrete server-reported version
    let reply = ServiceReply { result: CallResult::Success, mapping_version: 5, props: Vec::new(), exception: None };
    assert_eq!(client.interpret_call_reply(&reply), CallOutcome::ClientMappingExpired);
}

#[test]
fn scenario_5_application_exception_is_decoded() {
    let (registry, info) = registry_with_one_property();
    let client = Client::new(registry);
    let frame = GetPropertyMappingReply {
        mapping_version: 2,
        mapping: PropertyInfoWire { id: 1, ty: PropertyType::Int32.to_wire(), name: "n".into(), readable_name: "N".into() },
    };
    client.apply_mapping_frame(&frame).unwrap();

    // a unary call that produced an exception still reports CallResult::Success —
    // it completed, it just completed with an exception reply, not a
    // transport failure
    let wire = procall_wire::encode(&Property::int32(9, info), 1);
    let reply = ServiceReply {
        result: CallResult::Success,
        mapping_version: 2,
        props: Vec::new(),
        exception: Some(ExceptionReply { message: "boom".into(), props: vec![wire] }),
    };
    match client.interpret_call_reply(&reply) {
        CallOutcome::Exception(exc) => {
            assert_eq!(exc.message, "boom");
            assert_eq!(exc.props.len(), 1);
            assert_eq!(exc.props[0].get_int32(), 9);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn scenario_6_a_ten_frame_stream_ends_with_an_empty_frame() {
    let (registry, info) = registry_with_one_property();
    let client = Client::new(registry);
    let frame = GetPropertyMappingReply {
        mapping_version: 1,
        mapping: PropertyInfoWire { id: 1, ty: PropertyType::Int32.to_wire(), name: "n".into(), readable_name: "N".into() },
    };
    client.apply_mapping_frame(&frame).unwrap();

    let mut seen = Vec::new();
    for i in 0..10 {
        let prop = Property::int32(i, Arc::clone(&info));
        let wire = procall_wire::encode(&prop, 1);
        let reply = ServiceReply { result: CallResult::Success, mapping_version: 1, props: vec![wire], exception: None };
        match client.interpret_stream_frame(&reply) {
            StreamEvent::Frame(bag) => seen.push(bag[0].get_int32()),
            other => panic!("unexpected event: {other:?}"),
        }
    }
    assert_eq!(seen, (0..10).collect::<Vec<_>>());

    let end = ServiceReply { result: CallResult::Success, mapping_version: 1, props: Vec::new(), exception: None };
    assert_eq!(client.interpret_stream_frame(&end), StreamEvent::EndOfStream);
}

#[test]
fn scenario_7_unmapped_reply_properties_are_dropped_not_fatal() {
    let (registry, info) = registry_with_one_property();
    let client = Client::new(registry);
    let frame = GetPropertyMappingReply {
        mapping_version: 1,
        mapping: PropertyInfoWire { id: 1, ty: PropertyType::Int32.to_wire(), name: "n".into(), readable_name: "N".into() },
    };
    client.apply_mapping_frame(&frame).unwrap();

    let known = procall_wire::encode(&Property::int32(1, Arc::clone(&info)), 1);
    let unknown = procall_wire::encode(&Property::int32(2, info), 77); // id 77 was never mapped

    let reply = ServiceReply { result: CallResult::Success, mapping_version: 1, props: vec![known, unknown], exception: None };
    match client.interpret_call_reply(&reply) {
        CallOutcome::Reply(bag) => assert_eq!(bag.len(), 1),
        other => panic!("unexpected outcome: {other:?}"),
    }
}
