//! Per-document parsing context: tag handles, the anchor table, the tag
//! map, the YAML version, and the current JSON-pointer trail.
//!
//! A [`Context`] is cheap to clone (it shares its three maps and the
//! version through an `Rc<RefCell<_>>`) but carries its own `pointer` and
//! its own pending anchor/tag, so that descending into a child node never
//! leaks a pending anchor to a sibling.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde_json::Value;

use crate::error::{Mark, ParseError};
use crate::pointer;

#[derive(Debug, Default)]
struct Shared {
    tag_handles: HashMap<String, String>,
    anchor_values: HashMap<String, Value>,
    /// pointer -> explicit or inferred tag, for `Document::tag_map`/`get_tag`.
    tag_map: BTreeMap<String, String>,
    /// pointer -> anchor name, recorded both where an anchor is defined and
    /// where an alias resolves it, so tests can assert "same node" by
    /// comparing the anchor name at two pointers ( invariant 2).
    node_anchors: BTreeMap<String, String>,
    version: Option<(u32, u32)>,
    max_depth: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Context {
    shared: Rc<RefCell<Shared>>,
    pointer: String,
    pending_anchor: Option<String>,
    pending_tag: Option<String>,
    depth: usize,
}

impl Context {
    pub fn new_document() -> Self {
        Self::new_document_with_max_depth(None)
    }

    pub fn new_document_with_max_depth(max_depth: Option<usize>) -> Self {
        let mut tag_handles = HashMap::new();
        tag_handles.insert("!".to_string(), "!".to_string());
        tag_handles.insert("!!".to_string(), "tag:yaml.org,2002:".to_string());
        Context {
            shared: Rc::new(RefCell::new(Shared {
                tag_handles,
                max_depth,
                ..Default::default()
            })),
            pointer: String::new(),
            pending_anchor: None,
            pending_tag: None,
            depth: 0,
        }
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Fails once nesting exceeds the configured `max_depth` — a
    /// per-document resource guard sourced from `ParserOptions`, not a
    /// correctness rule of the grammar itself.
    pub fn check_depth(&self, mark: Mark) -> Result<(), ParseError> {
        if let Some(max) = self.shared.borrow().max_depth {
            if self.depth > max {
                return Err(ParseError::syntax(mark, "maximum nesting depth exceeded"));
            }
        }
        Ok(())
    }

    pub fn child_key(&self, key: &str) -> Context {
        Context {
            shared: Rc::clone(&self.shared),
            pointer: pointer::push_key(&self.pointer, key),
            pending_anchor: None,
            pending_tag: None,
            depth: self.depth + 1,
        }
    }

    pub fn child_index(&self, index: usize) -> Context {
        Context {
            shared: Rc::clone(&self.shared),
            pointer: pointer::push_index(&self.pointer, index),
            pending_anchor: None,
            pending_tag: None,
            depth: self.depth + 1,
        }
    }

    pub fn pending_anchor(&self) -> Option<&str> {
        self.pending_anchor.as_deref()
    }

    pub fn pending_tag(&self) -> Option<&str> {
        self.pending_tag.as_deref()
    }

    /// Returns `false` if an anchor was already pending on this node (the
    /// caller should report a duplicate-anchor error).
    #[must_use]
    pub fn set_pending_anchor(&mut self, name: String) -> bool {
        if self.pending_anchor.is_some() {
            return false;
        }
        self.pending_anchor = Some(name);
        true
    }

    pub fn set_pending_tag(&mut self, tag: String) {
        self.pending_tag = Some(tag);
    }

    pub fn declare_tag_handle(&self, handle: String, prefix: String) {
        self.shared.borrow_mut().tag_handles.insert(handle, prefix);
    }

    pub fn resolve_tag_handle(&self, handle: &str) -> Option<String> {
        self.shared.borrow().tag_handles.get(handle).cloned()
    }

    pub fn set_version(&self, major: u32, minor: u32) {
        self.shared.borrow_mut().version = Some((major, minor));
    }

    pub fn version(&self) -> (u32, u32) {
        self.shared.borrow().version.unwrap_or((1, 2))
    }

    pub fn lookup_alias(&self, name: &str) -> Option<Value> {
        self.shared.borrow().anchor_values.get(name).cloned()
    }

    /// Record that an alias at the current pointer resolved to `name`.
    pub fn record_alias_use(&self, name: &str) {
        self.shared
            .borrow_mut()
            .node_anchors
            .insert(self.pointer.clone(), name.to_string());
    }

    /// Persist this node's pending anchor/tag once its value is fully
    /// built. Forward references are impossible by construction: the
    /// anchor only becomes visible to `lookup_alias` after this call.
    pub fn save_node_properties(&self, value: &Value) {
        let mut shared = self.shared.borrow_mut();
        if let Some(name) = &self.pending_anchor {
            shared.anchor_values.insert(name.clone(), value.clone());
            shared.node_anchors.insert(self.pointer.clone(), name.clone());
        }
        if let Some(tag) = &self.pending_tag {
            shared.tag_map.insert(self.pointer.clone(), tag.clone());
        }
    }

    pub fn tag_map_snapshot(&self) -> BTreeMap<String, String> {
        self.shared.borrow().tag_map.clone()
    }

    pub fn node_anchors_snapshot(&self) -> BTreeMap<String, String> {
        self.shared.borrow().node_anchors.clone()
    }
}
