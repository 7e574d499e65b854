//! Interface: selectors, topics and event log decoding

use wabi::abi::TypeDescriptor;
use wabi::{AbiError, DecodedLogEntry, Indexed, Interface, RevertReason, Token, H256, U256};

const EVENTS_ABI: &str = r#"{
    "contractName": "Events",
    "abi": [
        {"type":"event","name":"testEvent","anonymous":false,"inputs":[
            {"name":"a","type":"uint256","indexed":true},
            {"name":"b","type":"string","indexed":false}]},
        {"type":"event","name":"named","anonymous":false,"inputs":[
            {"name":"c","type":"string","indexed":true},
            {"name":"d","type":"uint256[]","indexed":true},
            {"name":"e","type":"bool","indexed":false}]},
        {"type":"event","name":"Raw","anonymous":true,"inputs":[
            {"name":"who","type":"address","indexed":true},
            {"name":"amount","type":"uint256","indexed":false}]},
        {"type":"function","name":"transfer","inputs":[
            {"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
            "outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
        {"type":"function","name":"fail","inputs":[],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"}
    ]
}"#;

fn iface() -> Interface {
    Interface::from_json(EVENTS_ABI).unwrap()
}

#[test]
fn test_transfer_selector() {
    let iface = iface();
    let transfer = iface.function("transfer").unwrap();
    assert_eq!(transfer.selector(), Some([0xa9, 0x05, 0x9c, 0xbb]));
}

#[test]
fn test_static_indexed_without_topics_is_placeholder() {
    let iface = iface();
    let event = iface.event("testEvent").unwrap();
    let log = iface
        .encode_event_log(event, &[Token::uint(7), Token::string("hello")])
        .unwrap();

    let entries = iface.decode_event_log(event, &log.data, None).unwrap();
    assert_eq!(
        entries,
        vec![
            DecodedLogEntry::Indexed(Indexed { hash: None }),
            DecodedLogEntry::Value(Token::string("hello")),
        ]
    );
}

#[test]
fn test_static_indexed_with_topics_is_value() {
    let iface = iface();
    let event = iface.event("testEvent(uint256,string)").unwrap();
    let log = iface
        .encode_event_log(event, &[Token::uint(7), Token::string("hello")])
        .unwrap();
    assert_eq!(log.topics[0], wabi_crypto::keccak256(b"testEvent(uint256,string)"));
    assert_eq!(log.topics[1], H256::from_u256(&U256::from(7)));

    let entries = iface
        .decode_event_log(event, &log.data, Some(&log.topics))
        .unwrap();
    assert_eq!(
        entries,
        vec![
            DecodedLogEntry::Value(Token::uint(7)),
            DecodedLogEntry::Value(Token::string("hello")),
        ]
    );
}

#[test]
fn test_dynamic_indexed_with_topics_is_hash() {
    let iface = iface();
    let event = iface.event("named").unwrap();
    let ids = Token::Array(vec![Token::uint(1), Token::uint(2)]);
    let log = iface
        .encode_event_log(event, &[Token::string("label"), ids, Token::Bool(true)])
        .unwrap();

    let label_hash = wabi_crypto::keccak256(b"label");
    assert_eq!(log.topics[1], label_hash);

    // indexed arrays hash their in-place encoding
    let mut preimage = [0u8; 64];
    preimage[31] = 1;
    preimage[63] = 2;
    assert_eq!(log.topics[2], wabi_crypto::keccak256(preimage));

    let entries = iface
        .decode_event_log(event, &log.data, Some(&log.topics))
        .unwrap();
    assert_eq!(entries[0], DecodedLogEntry::Indexed(Indexed { hash: Some(label_hash) }));
    assert!(entries[0].value().is_none());
    assert_eq!(entries[1].indexed().unwrap().hash, Some(log.topics[2]));
    assert_eq!(entries[2], DecodedLogEntry::Value(Token::Bool(true)));
}

#[test]
fn test_three_states_distinguishable() {
    let iface = iface();
    let event = iface.event("named").unwrap();
    let log = iface
        .encode_event_log(
            event,
            &[Token::string("x"), Token::Array(vec![]), Token::Bool(false)],
        )
        .unwrap();

    let without = iface.decode_event_log(event, &log.data, None).unwrap();
    let with = iface
        .decode_event_log(event, &log.data, Some(&log.topics))
        .unwrap();

    assert_eq!(without[0].indexed().unwrap().hash, None);
    assert!(with[0].indexed().unwrap().hash.is_some());
    assert!(with[2].value().is_some());
}

#[test]
fn test_anonymous_event() {
    let iface = iface();
    let event = iface.event("Raw").unwrap();
    let who = wabi::Address::from_hex("0x00000000000000000000000000000000000000aa").unwrap();
    let log = iface
        .encode_event_log(event, &[Token::Address(who), Token::uint(5)])
        .unwrap();
    assert_eq!(log.topics.len(), 1);

    let entries = iface
        .decode_event_log(event, &log.data, Some(&log.topics))
        .unwrap();
    assert_eq!(entries[0], DecodedLogEntry::Value(Token::Address(who)));
    assert_eq!(entries[1], DecodedLogEntry::Value(Token::uint(5)));

    // anonymous events cannot be found by topic
    assert!(iface.parse_log(&log.topics, &log.data).is_err());
}

#[test]
fn test_parse_log_to_json() {
    let iface = iface();
    let event = iface.event("testEvent").unwrap();
    let log = iface
        .encode_event_log(event, &[Token::uint(1), Token::string("hi")])
        .unwrap();

    let parsed = iface.parse_log(&log.topics, &log.data).unwrap();
    let json = parsed.to_json_value();
    assert_eq!(json["event"], "testEvent(uint256,string)");
    assert_eq!(json["args"]["a"], "1");
    assert_eq!(json["args"]["b"], "hi");
}

#[test]
fn test_truncated_log_data() {
    let iface = iface();
    let event = iface.event("testEvent").unwrap();
    let log = iface
        .encode_event_log(event, &[Token::uint(1), Token::string("hello world")])
        .unwrap();
    let truncated = &log.data[..log.data.len() - 32];
    assert!(matches!(
        iface.decode_event_log(event, truncated, None),
        Err(AbiError::BufferOverrun { .. })
    ));
}

#[test]
fn test_revert_message_from_return_data() {
    let iface = iface();
    let fail = iface.function("fail").unwrap();

    let mut data = wabi::ERROR_SELECTOR.to_vec();
    data.extend(
        wabi::abi::encode(
            &[TypeDescriptor::parse("string").unwrap()],
            &[Token::string("Ownable: caller is not the owner")],
        )
        .unwrap(),
    );

    match iface.decode_function_result(fail, &data) {
        Err(AbiError::Revert(RevertReason::Message(message))) => {
            assert_eq!(message, "Ownable: caller is not the owner")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
