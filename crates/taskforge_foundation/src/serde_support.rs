//! `Serialize` implementations for runtime values.
//!
//! Artifacts are exported for the game runtime, so only serialization is
//! provided. Objects serialize as `{ "type": name, "members": {..} }`;
//! extension-property state is included under `"host_state"` when present.

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::graph::EdgeKind;
use crate::types::AggregateRef;
use crate::value::{Object, Value};

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for item in v.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Set(s) => {
                let mut seq = serializer.serialize_seq(Some(s.len()))?;
                for item in s.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Self::Object(o) => o.serialize(serializer),
            Self::Prototype(p) => p.serialize(serializer),
            Self::Graph(g) => g.serialize(serializer),
        }
    }
}

struct Members<'a>(&'a im::OrdMap<std::sync::Arc<str>, Value>);

impl Serialize for Members<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0 {
            map.serialize_entry(&**k, v)?;
        }
        map.end()
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_host = !self.host_state.is_empty();
        let mut st = serializer.serialize_struct("Object", if with_host { 3 } else { 2 })?;
        st.serialize_field("type", &*self.ty.name)?;
        st.serialize_field("members", &Members(&self.members))?;
        if with_host {
            st.serialize_field("host_state", &Members(&self.host_state))?;
        } else {
            st.skip_field("host_state")?;
        }
        st.end()
    }
}

impl Serialize for AggregateRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl Serialize for EdgeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.attribute())
    }
}
