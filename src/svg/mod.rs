//! SVG document tree: parse, inspect, mutate, serialize.

mod dom;
mod parse;
mod serialize;

pub use dom::{
    Attribute, ChildrenIter, Node, NodeData, NodeId, QualName, SVG_NS, SvgDom, XLINK_NS, XML_NS,
};
pub use parse::parse;
pub use serialize::serialize;
