use pretty_assertions::assert_eq;
use serde_json::json;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn s1_block_sequence() {
    init();
    let doc = yaml_ptr::parse("- Mark McGwire\n- Sammy Sosa\n- Ken Griffey\n").unwrap();
    assert_eq!(doc.root(), &json!(["Mark McGwire", "Sammy Sosa", "Ken Griffey"]));
    assert_eq!(doc.get_tag("").unwrap(), "tag:yaml.org,2002:seq");
}

#[test]
fn s2_block_mapping_with_numbers() {
    init();
    let doc = yaml_ptr::parse("hr: 65\navg: 0.278\nrbi: 147\n").unwrap();
    assert_eq!(doc.root(), &json!({"hr": 65, "avg": 0.278, "rbi": 147}));
    assert_eq!(doc.get_tag("/avg").unwrap(), "tag:yaml.org,2002:float");
    assert_eq!(doc.get_tag("/hr").unwrap(), "tag:yaml.org,2002:int");
}

#[test]
fn s3_anchor_alias_share_a_node() {
    init();
    let doc = yaml_ptr::parse("a: &X\n  street: 21 Wonder St\nb: *X\n").unwrap();
    let root = doc.root();
    assert_eq!(root["a"], root["b"]);
    assert_eq!(doc.get_tag("/a").unwrap(), "tag:yaml.org,2002:map");
}

#[test]
fn s4_literal_block_scalar_with_strip() {
    init();
    let doc = yaml_ptr::parse("s: |-\n  line1\n  line2\n").unwrap();
    assert_eq!(doc.root(), &json!({"s": "line1\nline2"}));
}

#[test]
fn s5_flow_mapping() {
    init();
    let doc = yaml_ptr::parse(r#"{abcde: 1234, hello: "World!"}"#).unwrap();
    assert_eq!(doc.root(), &json!({"abcde": 1234, "hello": "World!"}));
    assert_eq!(doc.get_tag("/abcde").unwrap(), "tag:yaml.org,2002:int");
    assert_eq!(doc.get_tag("/hello").unwrap(), "tag:yaml.org,2002:str");
}

#[test]
fn s6_float_special() {
    init();
    let doc = yaml_ptr::parse("x: .nan\ny: -.inf\n").unwrap();
    assert_eq!(doc.root(), &json!({"x": ".nan", "y": "-.inf"}));
    assert_eq!(doc.get_tag("/x").unwrap(), "tag:yaml.org,2002:float");
    assert_eq!(doc.get_tag("/y").unwrap(), "tag:yaml.org,2002:float");
}

#[test]
fn s7_multi_document_stream() {
    init();
    let docs = yaml_ptr::parse_stream("---\nabc\n---\ndef\n...\n").unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].root(), &json!("abc"));
    assert_eq!(docs[1].root(), &json!("def"));
}

#[test]
fn s8_tag_directive_and_shorthand() {
    init();
    let doc = yaml_ptr::parse("%TAG !e! tag:example.com,2023:\n---\n- !e!thing v\n").unwrap();
    assert_eq!(doc.root(), &json!(["v"]));
    assert_eq!(doc.get_tag("/0").unwrap(), "tag:example.com,2023:thing");
}

#[test]
fn invariant_json_superset() {
    init();
    let text = r#"{"a": 1, "b": [true, false, null, "str"], "c": {"d": 2.5}}"#;
    let doc = yaml_ptr::parse(text).unwrap();
    let json_ref: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(doc.root(), &json_ref);
}

#[test]
fn invariant_duplicate_key_fails_at_second_occurrence() {
    init();
    let err = yaml_ptr::parse("a: 1\nb: 2\na: 3\n").unwrap_err();
    assert!(matches!(err, yaml_ptr::ParseError::Reference { .. }));
}

#[test]
fn invariant_duplicate_key_fails_in_flow_mapping_too() {
    init();
    assert!(yaml_ptr::parse("{a: 1, a: 2}").is_err());
}

#[test]
fn invariant_chomping_clip_vs_strip_vs_keep() {
    init();
    let strip = yaml_ptr::parse("s: |-\n  x\n").unwrap();
    assert_eq!(strip.root()["s"], "x");
    let clip = yaml_ptr::parse("s: |\n  x\n").unwrap();
    assert_eq!(clip.root()["s"], "x\n");
    let keep = yaml_ptr::parse("s: |+\n  x\n\n\n").unwrap();
    assert_eq!(keep.root()["s"], "x\n\n\n");
}

#[test]
fn supplement_unknown_tag_handle_is_fatal() {
    init();
    assert!(yaml_ptr::parse("- !e!thing v\n").is_err());
}

#[test]
fn supplement_verbatim_tag_is_used_as_is() {
    init();
    let doc = yaml_ptr::parse("a: !<tag:example.com,2023:thing> v\n").unwrap();
    assert_eq!(doc.get_tag("/a").unwrap(), "tag:example.com,2023:thing");
}

#[test]
fn supplement_single_pair_flow_sequence_with_colon_becomes_a_mapping() {
    init();
    let doc = yaml_ptr::parse("[a: 1]\n").unwrap();
    assert_eq!(doc.root(), &json!([{"a": 1}]));
}

#[test]
fn supplement_numeric_widening_beyond_i64_stays_exact() {
    init();
    let doc = yaml_ptr::parse("big: 123456789012345678901234567890\n").unwrap();
    assert_eq!(doc.root()["big"].to_string(), "123456789012345678901234567890");
    assert_eq!(doc.get_tag("/big").unwrap(), "tag:yaml.org,2002:int");
}

#[test]
fn supplement_block_scalar_indentation_is_autodetected() {
    init();
    let doc = yaml_ptr::parse("s: |\n    deeper\n    indent\n").unwrap();
    assert_eq!(doc.root(), &json!({"s": "deeper\nindent\n"}));
}

#[test]
fn supplement_dot_dot_dot_alone_produces_an_empty_document_in_a_stream() {
    init();
    let docs = yaml_ptr::parse_stream("...\nabc\n").unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].root(), &serde_json::Value::Null);
    assert_eq!(docs[1].root(), &json!("abc"));
}

#[test]
fn supplement_empty_stream_is_one_null_document() {
    init();
    let docs = yaml_ptr::parse_stream("").unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].root(), &serde_json::Value::Null);
}
