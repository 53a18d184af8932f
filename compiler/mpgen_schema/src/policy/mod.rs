//! Static collection policy.
//!
//! Two tables decide where the closure stops or short-circuits:
//! - Leaf types, whose codecs ship with the runtime library
//! - Known generic containers, mapped to parameterized codec templates
//!
//! `Policy` combines them with the per-invocation `CollectorOptions`.

use crate::CollectorOptions;

/// Placeholder replaced by the comma-joined type arguments of a container.
pub const TEMPLATE_ARGS: &str = "TREPLACE";

/// Unbound signature of the lookup container, which needs companion entries.
pub const LOOKUP_SIGNATURE: &str = "System.Linq.ILookup<,>";

/// Unbound signature of the grouping container.
pub const GROUPING_SIGNATURE: &str = "System.Linq.IGrouping<,>";

/// Unbound signature of the sequence interface.
pub const ENUMERABLE_SIGNATURE: &str = "System.Collections.Generic.IEnumerable<>";

/// Types with built-in codecs. Never recursed into.
const LEAF_TYPES: &[&str] = &[
    "short",
    "int",
    "long",
    "ushort",
    "uint",
    "ulong",
    "float",
    "double",
    "bool",
    "byte",
    "sbyte",
    "decimal",
    "char",
    "string",
    "object",
    "System.Guid",
    "System.TimeSpan",
    "System.DateTime",
    "System.DateTimeOffset",
    "MessagePack.Nil",
    // arrays
    "short[]",
    "int[]",
    "long[]",
    "ushort[]",
    "uint[]",
    "ulong[]",
    "float[]",
    "double[]",
    "bool[]",
    "byte[]",
    "sbyte[]",
    "decimal[]",
    "char[]",
    "string[]",
    "System.DateTime[]",
    "System.ArraySegment<byte>",
    "System.ArraySegment<byte>?",
    // extensions
    "UnityEngine.Vector2",
    "UnityEngine.Vector3",
    "UnityEngine.Vector4",
    "UnityEngine.Quaternion",
    "UnityEngine.Color",
    "UnityEngine.Bounds",
    "UnityEngine.Rect",
    "UnityEngine.AnimationCurve",
    "UnityEngine.RectOffset",
    "UnityEngine.Gradient",
    "UnityEngine.WrapMode",
    "UnityEngine.GradientMode",
    "UnityEngine.Keyframe",
    "UnityEngine.Matrix4x4",
    "UnityEngine.GradientColorKey",
    "UnityEngine.GradientAlphaKey",
    "UnityEngine.Color32",
    "UnityEngine.LayerMask",
    "UnityEngine.Vector2Int",
    "UnityEngine.Vector3Int",
    "UnityEngine.RangeInt",
    "UnityEngine.RectInt",
    "UnityEngine.BoundsInt",
    "System.Reactive.Unit",
];

/// Check whether `signature` names a type with a built-in codec.
pub fn is_leaf(signature: &str) -> bool {
    LEAF_TYPES.contains(&signature)
}

/// Codec template for a known generic container, keyed by unbound
/// signature (`System.Collections.Generic.Dictionary<,>`).
pub fn known_container(unbound: &str) -> Option<&'static str> {
    let template = match unbound {
        "System.Collections.Generic.List<>" => "MsgPack::Formatters.ListFormatter<TREPLACE>",
        "System.Collections.Generic.LinkedList<>" => {
            "MsgPack::Formatters.LinkedListFormatter<TREPLACE>"
        }
        "System.Collections.Generic.Queue<>" => "MsgPack::Formatters.QueueFormatter<TREPLACE>",
        "System.Collections.Generic.Stack<>" => "MsgPack::Formatters.StackFormatter<TREPLACE>",
        "System.Collections.Generic.HashSet<>" => "MsgPack::Formatters.HashSetFormatter<TREPLACE>",
        "System.Collections.ObjectModel.ReadOnlyCollection<>" => {
            "MsgPack::Formatters.ReadOnlyCollectionFormatter<TREPLACE>"
        }
        "System.Collections.Generic.IList<>" => {
            "MsgPack::Formatters.InterfaceListFormatter2<TREPLACE>"
        }
        "System.Collections.Generic.ICollection<>" => {
            "MsgPack::Formatters.InterfaceCollectionFormatter2<TREPLACE>"
        }
        "System.Collections.Generic.IEnumerable<>" => {
            "MsgPack::Formatters.InterfaceEnumerableFormatter<TREPLACE>"
        }
        "System.Collections.Generic.Dictionary<,>" => {
            "MsgPack::Formatters.DictionaryFormatter<TREPLACE>"
        }
        "System.Collections.Generic.IDictionary<,>" => {
            "MsgPack::Formatters.InterfaceDictionaryFormatter<TREPLACE>"
        }
        "System.Collections.Generic.SortedDictionary<,>" => {
            "MsgPack::Formatters.SortedDictionaryFormatter<TREPLACE>"
        }
        "System.Collections.Generic.SortedList<,>" => {
            "MsgPack::Formatters.SortedListFormatter<TREPLACE>"
        }
        "System.Linq.ILookup<,>" => "MsgPack::Formatters.InterfaceLookupFormatter<TREPLACE>",
        "System.Linq.IGrouping<,>" => "MsgPack::Formatters.InterfaceGroupingFormatter<TREPLACE>",
        "System.Collections.ObjectModel.ObservableCollection<>" => {
            "MsgPack::Formatters.ObservableCollectionFormatter<TREPLACE>"
        }
        "System.Collections.ObjectModel.ReadOnlyObservableCollection<>" => {
            "MsgPack::Formatters.ReadOnlyObservableCollectionFormatter<TREPLACE>"
        }
        "System.Collections.Generic.IReadOnlyList<>" => {
            "MsgPack::Formatters.InterfaceReadOnlyListFormatter<TREPLACE>"
        }
        "System.Collections.Generic.IReadOnlyCollection<>" => {
            "MsgPack::Formatters.InterfaceReadOnlyCollectionFormatter<TREPLACE>"
        }
        "System.Collections.Generic.ISet<>" => "MsgPack::Formatters.InterfaceSetFormatter<TREPLACE>",
        "System.Collections.Concurrent.ConcurrentBag<>" => {
            "MsgPack::Formatters.ConcurrentBagFormatter<TREPLACE>"
        }
        "System.Collections.Concurrent.ConcurrentQueue<>" => {
            "MsgPack::Formatters.ConcurrentQueueFormatter<TREPLACE>"
        }
        "System.Collections.Concurrent.ConcurrentStack<>" => {
            "MsgPack::Formatters.ConcurrentStackFormatter<TREPLACE>"
        }
        "System.Collections.ObjectModel.ReadOnlyDictionary<,>" => {
            "MsgPack::Formatters.ReadOnlyDictionaryFormatter<TREPLACE>"
        }
        "System.Collections.Generic.IReadOnlyDictionary<,>" => {
            "MsgPack::Formatters.InterfaceReadOnlyDictionaryFormatter<TREPLACE>"
        }
        "System.Collections.Concurrent.ConcurrentDictionary<,>" => {
            "MsgPack::Formatters.ConcurrentDictionaryFormatter<TREPLACE>"
        }
        "System.Lazy<>" => "MsgPack::Formatters.LazyFormatter<TREPLACE>",
        "System.Threading.Tasks.Task<>" => "MsgPack::Formatters.TaskValueFormatter<TREPLACE>",
        "System.Threading.Tasks.ValueTask<>" => "MsgPack::Formatters.ValueTaskFormatter<TREPLACE>",

        "System.Tuple<>"
        | "System.Tuple<,>"
        | "System.Tuple<,,>"
        | "System.Tuple<,,,>"
        | "System.Tuple<,,,,>"
        | "System.Tuple<,,,,,>"
        | "System.Tuple<,,,,,,>"
        | "System.Tuple<,,,,,,,>" => "MsgPack::Formatters.TupleFormatter<TREPLACE>",

        "System.ValueTuple<>"
        | "System.ValueTuple<,>"
        | "System.ValueTuple<,,>"
        | "System.ValueTuple<,,,>"
        | "System.ValueTuple<,,,,>"
        | "System.ValueTuple<,,,,,>"
        | "System.ValueTuple<,,,,,,>"
        | "System.ValueTuple<,,,,,,,>" => "MsgPack::Formatters.ValueTupleFormatter<TREPLACE>",

        "System.Collections.Generic.KeyValuePair<,>" => {
            "MsgPack::Formatters.KeyValuePairFormatter<TREPLACE>"
        }
        "System.ArraySegment<>" => "MsgPack::Formatters.ArraySegmentFormatter<TREPLACE>",

        // extensions
        "System.Collections.Immutable.ImmutableArray<>" => {
            "MsgPack::ImmutableCollection.ImmutableArrayFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.ImmutableList<>" => {
            "MsgPack::ImmutableCollection.ImmutableListFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.ImmutableDictionary<,>" => {
            "MsgPack::ImmutableCollection.ImmutableDictionaryFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.ImmutableHashSet<>" => {
            "MsgPack::ImmutableCollection.ImmutableHashSetFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.ImmutableSortedDictionary<,>" => {
            "MsgPack::ImmutableCollection.ImmutableSortedDictionaryFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.ImmutableSortedSet<>" => {
            "MsgPack::ImmutableCollection.ImmutableSortedSetFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.ImmutableQueue<>" => {
            "MsgPack::ImmutableCollection.ImmutableQueueFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.ImmutableStack<>" => {
            "MsgPack::ImmutableCollection.ImmutableStackFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.IImmutableList<>" => {
            "MsgPack::ImmutableCollection.InterfaceImmutableListFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.IImmutableDictionary<,>" => {
            "MsgPack::ImmutableCollection.InterfaceImmutableDictionaryFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.IImmutableQueue<>" => {
            "MsgPack::ImmutableCollection.InterfaceImmutableQueueFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.IImmutableSet<>" => {
            "MsgPack::ImmutableCollection.InterfaceImmutableSetFormatter<TREPLACE>"
        }
        "System.Collections.Immutable.IImmutableStack<>" => {
            "MsgPack::ImmutableCollection.InterfaceImmutableStackFormatter<TREPLACE>"
        }

        "Reactive.Bindings.ReactiveProperty<>" => {
            "MsgPack::ReactivePropertyExtension.ReactivePropertyFormatter<TREPLACE>"
        }
        "Reactive.Bindings.IReactiveProperty<>" => {
            "MsgPack::ReactivePropertyExtension.InterfaceReactivePropertyFormatter<TREPLACE>"
        }
        "Reactive.Bindings.IReadOnlyReactiveProperty<>" => {
            "MsgPack::ReactivePropertyExtension.InterfaceReadOnlyReactivePropertyFormatter<TREPLACE>"
        }
        "Reactive.Bindings.ReactiveCollection<>" => {
            "MsgPack::ReactivePropertyExtension.ReactiveCollectionFormatter<TREPLACE>"
        }
        _ => return None,
    };
    Some(template)
}

/// Substitute rendered type arguments into a container template.
pub fn instantiate(template: &str, args: &str) -> String {
    template.replace(TEMPLATE_ARGS, args)
}

/// Codec template for an array of `rank` dimensions.
pub fn array_codec(rank: u32) -> Option<&'static str> {
    match rank {
        1 => Some("MsgPack::Formatters.ArrayFormatter<TREPLACE>"),
        2 => Some("MsgPack::Formatters.TwoDimensionalArrayFormatter<TREPLACE>"),
        3 => Some("MsgPack::Formatters.ThreeDimensionalArrayFormatter<TREPLACE>"),
        4 => Some("MsgPack::Formatters.FourDimensionalArrayFormatter<TREPLACE>"),
        _ => None,
    }
}

/// Codec template for `System.Nullable<T>`.
pub const NULLABLE_CODEC: &str = "MsgPack::Formatters.NullableFormatter<TREPLACE>";

/// Static tables combined with the options of one invocation.
#[derive(Clone, Copy, Debug)]
pub struct Policy<'a> {
    options: &'a CollectorOptions,
}

impl<'a> Policy<'a> {
    pub fn new(options: &'a CollectorOptions) -> Self {
        Policy { options }
    }

    /// Check whether the closure stops at `signature` without resolving it.
    pub fn is_terminal(&self, signature: &str) -> bool {
        is_leaf(signature) || self.options.ignored_type_names.contains(signature)
    }

    /// Hand-written codec configured for `signature`.
    pub fn custom_codec(&self, signature: &str) -> Option<&'a str> {
        self.options
            .custom_formatter_catalog
            .get(signature)
            .map(String::as_str)
    }

    pub fn force_map_mode(&self) -> bool {
        self.options.force_map_mode
    }
}

#[cfg(test)]
mod tests;
