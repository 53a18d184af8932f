use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_leaf_types() {
    assert!(is_leaf("int"));
    assert!(is_leaf("System.Guid"));
    assert!(is_leaf("byte[]"));
    assert!(is_leaf("System.ArraySegment<byte>?"));
    assert!(!is_leaf("int[,]"));
    assert!(!is_leaf("Demo.Widget"));
}

#[test]
fn test_known_container_lookup() {
    assert_eq!(
        known_container("System.Collections.Generic.Dictionary<,>"),
        Some("MsgPack::Formatters.DictionaryFormatter<TREPLACE>")
    );
    assert_eq!(
        known_container("System.Collections.Immutable.ImmutableList<>"),
        Some("MsgPack::ImmutableCollection.ImmutableListFormatter<TREPLACE>")
    );
    assert_eq!(
        known_container("System.Threading.Tasks.ValueTask<>"),
        Some("MsgPack::Formatters.ValueTaskFormatter<TREPLACE>")
    );
    assert_eq!(known_container("System.Collections.Generic.List<,>"), None);
    assert_eq!(known_container("Demo.Box<>"), None);
}

#[test]
fn test_every_tuple_arity_is_known() {
    for arity in 1..=8 {
        let commas = ",".repeat(arity - 1);
        assert!(known_container(&format!("System.Tuple<{commas}>")).is_some());
        assert!(known_container(&format!("System.ValueTuple<{commas}>")).is_some());
    }
}

#[test]
fn test_lookup_companions_are_known() {
    assert!(known_container(LOOKUP_SIGNATURE).is_some());
    assert!(known_container(GROUPING_SIGNATURE).is_some());
    assert!(known_container(ENUMERABLE_SIGNATURE).is_some());
}

#[test]
fn test_instantiate() {
    assert_eq!(
        instantiate(
            "MsgPack::Formatters.DictionaryFormatter<TREPLACE>",
            "string, Demo.Widget"
        ),
        "MsgPack::Formatters.DictionaryFormatter<string, Demo.Widget>"
    );
}

#[test]
fn test_array_codec_by_rank() {
    assert_eq!(
        array_codec(1),
        Some("MsgPack::Formatters.ArrayFormatter<TREPLACE>")
    );
    assert_eq!(
        array_codec(4),
        Some("MsgPack::Formatters.FourDimensionalArrayFormatter<TREPLACE>")
    );
    assert_eq!(array_codec(5), None);
}

#[test]
fn test_policy_uses_options() {
    let options = CollectorOptions::new()
        .ignore_type("Demo.External")
        .with_custom_formatter("Demo.Money", "Demo.MoneyFormatter");
    let policy = Policy::new(&options);

    assert!(policy.is_terminal("int"));
    assert!(policy.is_terminal("Demo.External"));
    assert!(!policy.is_terminal("Demo.Money"));
    assert_eq!(policy.custom_codec("Demo.Money"), Some("Demo.MoneyFormatter"));
    assert_eq!(policy.custom_codec("Demo.External"), None);
    assert!(!policy.force_map_mode());
}
