//! State mutability resolution and fragment validation

use wabi::json::JsonFragment;
use wabi::{verified_state, AbiError, Fragment, FormatType, StateMutability};

fn entry(
    ty: &str,
    state_mutability: Option<&str>,
    constant: Option<bool>,
    payable: Option<bool>,
) -> JsonFragment {
    JsonFragment {
        ty: Some(ty.to_string()),
        name: Some("f".to_string()),
        inputs: Some(vec![]),
        outputs: Some(vec![]),
        state_mutability: state_mutability.map(str::to_string),
        constant,
        payable,
        anonymous: None,
    }
}

#[derive(Debug)]
enum Expected {
    State(bool, bool, StateMutability),
    InvalidMutability,
    InvalidPayable,
    Undetermined,
}

#[test]
fn test_state_resolution_table() {
    use Expected::*;
    use StateMutability::*;

    let cases = [
        // stateMutability wins
        ("function", Some("pure"), None, None, State(true, false, Pure)),
        ("function", Some("view"), None, None, State(true, false, View)),
        ("function", Some("nonpayable"), None, None, State(false, false, NonPayable)),
        ("function", Some("payable"), None, None, State(false, true, Payable)),
        ("function", Some("view"), Some(true), Some(false), State(true, false, View)),
        ("function", Some("payable"), Some(false), Some(true), State(false, true, Payable)),
        // explicit flags must agree
        ("function", Some("view"), Some(false), None, InvalidMutability),
        ("function", Some("nonpayable"), Some(true), None, InvalidMutability),
        ("function", Some("payable"), None, Some(false), InvalidPayable),
        ("function", Some("nonpayable"), None, Some(true), InvalidPayable),
        ("function", Some("constant"), None, None, InvalidMutability),
        // payable present
        ("function", None, Some(false), Some(true), State(false, true, Payable)),
        ("function", None, Some(false), Some(false), State(false, false, NonPayable)),
        ("function", None, Some(true), Some(false), State(true, false, View)),
        ("function", None, None, Some(true), State(false, true, Payable)),
        ("function", None, None, Some(false), Undetermined),
        ("function", None, Some(true), Some(true), InvalidPayable),
        ("constructor", None, None, Some(false), State(false, false, NonPayable)),
        // constant only
        ("function", None, Some(true), None, State(true, false, View)),
        ("function", None, Some(false), None, State(false, true, Payable)),
        // nothing
        ("function", None, None, None, Undetermined),
        ("constructor", None, None, None, State(false, true, Payable)),
    ];

    for (ty, state_mutability, constant, payable, expected) in cases {
        let json = entry(ty, state_mutability, constant, payable);
        let result = verified_state(&json);
        let label = format!("{ty} {state_mutability:?} constant={constant:?} payable={payable:?}");
        match (&expected, result) {
            (State(c, p, m), Ok(state)) => {
                assert_eq!(state.constant, *c, "{label}");
                assert_eq!(state.payable, *p, "{label}");
                assert_eq!(state.state_mutability, *m, "{label}");
            }
            (InvalidMutability, Err(AbiError::InvalidMutability(_))) => {}
            (InvalidPayable, Err(AbiError::InvalidPayable(_))) => {}
            (Undetermined, Err(AbiError::UndeterminedStateMutability(_))) => {}
            (expected, got) => panic!("{label}: expected {expected:?}, got {got:?}"),
        }
    }
}

#[test]
fn test_legacy_abi_function() {
    let json = r#"[{"constant":true,"inputs":[],"name":"totalSupply","outputs":[{"name":"","type":"uint256"}],"payable":false,"type":"function"}]"#;
    let entries = wabi::json::parse_abi(json).unwrap();
    let f = Fragment::from_json(&entries[0]).unwrap();
    assert_eq!(f.state().unwrap().state_mutability, StateMutability::View);
    assert_eq!(
        f.format(FormatType::Full),
        "function totalSupply() view returns (uint256)"
    );
}

#[test]
fn test_event_requires_type() {
    let mut json = entry("event", None, None, None);
    json.ty = None;
    assert!(matches!(
        Fragment::event_from_json(&json),
        Err(AbiError::TypeMismatch { .. })
    ));
}

#[test]
fn test_malformed_parameter_type_fails() {
    let json = r#"[{"type":"function","name":"f","inputs":[{"name":"x","type":"uint256[2"}],"outputs":[],"stateMutability":"pure"}]"#;
    let entries = wabi::json::parse_abi(json).unwrap();
    assert!(matches!(
        Fragment::from_json(&entries[0]),
        Err(AbiError::FromStringParse { .. })
    ));
}

#[test]
fn test_tuple_signature() {
    let json = r#"[{"type":"function","name":"submit","inputs":[{"name":"order","type":"tuple","components":[{"name":"maker","type":"address"},{"name":"amounts","type":"uint[]"},{"name":"salt","type":"bytes32"}]}],"outputs":[],"stateMutability":"nonpayable"}]"#;
    let entries = wabi::json::parse_abi(json).unwrap();
    let f = Fragment::from_json(&entries[0]).unwrap();
    assert_eq!(f.signature(), "submit((address,uint256[],bytes32))");
    assert_eq!(
        f.format(FormatType::Full),
        "function submit(tuple(address maker, uint256[] amounts, bytes32 salt) order)"
    );
}
