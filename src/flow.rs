//! Flow Sub-parser: `[...]` sequences and `{...}` mappings,
//! which may span multiple lines. Driven one [`Line`] at a time so it can
//! be suspended at any point (mid-scalar, mid-item, between items) and
//! resumed with the next line, the same way the block machines are.

use crate::classifier::classify;
use crate::context::Context;
use crate::error::{Mark, ParseError};
use crate::lexer::{DoubleQuotedScalar, PlainScalar, SingleQuotedScalar};
use crate::line::Line;
use crate::properties;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Seq,
    Map,
}

/// What a flow sequence item currently holds, between separators.
#[derive(Debug, Default)]
enum SeqSlot {
    #[default]
    Empty,
    /// A value has been produced; still waiting to see `,`, `:`, or `]`.
    Value(Value),
    /// A `:` upgraded the value to a mapping key; waiting for
    /// the value.
    Key(Value),
    /// Key and value both produced; waiting for `,` or `]` to push the
    /// one-entry mapping as this item.
    Pair(Value, Value),
}

/// What a flow mapping entry currently holds, between separators.
#[derive(Debug, Default)]
enum MapSlot {
    #[default]
    ExpectKey,
    /// A key has been read; still deciding whether a `:` follows.
    HaveKey { key: String, was_quoted: bool },
    /// `:` consumed; waiting for the value.
    HaveColon { key: String },
}

struct Frame {
    delim: Delim,
    ctx: Context,
    next_index: usize,
    items: Vec<Value>,
    map: serde_json::Map<String, Value>,
    seq_slot: SeqSlot,
    map_slot: MapSlot,
}

impl Frame {
    fn new(delim: Delim, ctx: Context) -> Self {
        Frame {
            delim,
            ctx,
            next_index: 0,
            items: Vec::new(),
            map: serde_json::Map::new(),
            seq_slot: SeqSlot::Empty,
            map_slot: MapSlot::ExpectKey,
        }
    }

    fn close(self) -> Value {
        match self.delim {
            Delim::Seq => Value::Array(self.items),
            Delim::Map => Value::Object(self.map),
        }
    }
}

enum Pending {
    Plain(PlainScalar, Context),
    Single(SingleQuotedScalar, Context),
    Double(DoubleQuotedScalar, Context),
}

enum SlotKind {
    SeqEmpty,
    SeqKey(Value),
    MapKey,
    MapValue(String),
}

/// Parses one `[...]` or `{...}` container, possibly across many lines.
///
/// `stack` holds one [`Frame`] per open container; it is the durable
/// state. `pending_slot` records which slot in the parent frame is
/// waiting for the frame currently on top of the stack to close — set
/// right before a push, consumed immediately on the matching pop, so a
/// single field suffices even for nested containers (see the module
/// tests for multi-level nesting).
pub struct FlowParser {
    stack: Vec<Frame>,
    pending: Option<Pending>,
    pending_slot: Option<SlotKind>,
    value_mark: Mark,
    result: Option<Value>,
}

impl FlowParser {
    /// `line` must be positioned just after the opening `[`/`{`. `ctx` is
    /// the context for the container node itself (its pending anchor/tag,
    /// if any, were already consumed by the caller).
    pub fn start(open: char, line: &mut Line, ctx: Context) -> Result<Self, ParseError> {
        let delim = if open == '[' { Delim::Seq } else { Delim::Map };
        let mut parser = FlowParser {
            stack: vec![Frame::new(delim, ctx)],
            pending: None,
            pending_slot: None,
            value_mark: Mark::default(),
            result: None,
        };
        parser.drive(line)?;
        Ok(parser)
    }

    pub fn complete(&self) -> bool {
        self.result.is_some()
    }

    pub fn continuation(&mut self, line: &mut Line) -> Result<(), ParseError> {
        self.drive(line)
    }

    pub fn into_value(self) -> Value {
        self.result.expect("FlowParser::into_value called before completion")
    }

    fn drive(&mut self, line: &mut Line) -> Result<(), ParseError> {
        loop {
            if let Some(pending) = &mut self.pending {
                let terminated = match pending {
                    Pending::Plain(s, _) => {
                        s.continuation(line);
                        s.terminated()
                    }
                    Pending::Single(s, _) => {
                        s.continuation(line);
                        s.terminated()
                    }
                    Pending::Double(s, _) => {
                        s.continuation(line)?;
                        s.terminated()
                    }
                };
                if !terminated {
                    return Ok(());
                }
                let value = self.finish_pending();
                let slot = self.pending_slot.take().expect("a value completed with no waiting slot");
                self.commit_slot(slot, value)?;
                if self.result.is_some() {
                    return Ok(());
                }
                continue;
            }

            line.skip_spaces();
            if line.at_logical_end() {
                return Ok(());
            }
            self.step(line)?;
            if self.result.is_some() {
                return Ok(());
            }
        }
    }

    fn finish_pending(&mut self) -> Value {
        match self.pending.take().unwrap() {
            Pending::Plain(s, mut ctx) => {
                let text = s.into_text();
                let classified = classify(&text, ctx.pending_tag(), ctx.version());
                if let Some(inferred) = classified.inferred_tag {
                    ctx.set_pending_tag(inferred.to_string());
                }
                ctx.save_node_properties(&classified.value);
                classified.value
            }
            Pending::Single(s, ctx) => {
                let value = Value::String(s.into_text());
                ctx.save_node_properties(&value);
                value
            }
            Pending::Double(s, ctx) => {
                let value = Value::String(s.into_text());
                ctx.save_node_properties(&value);
                value
            }
        }
    }

    /// Handle exactly one token at the cursor: a separator for the
    /// current frame's slot, or the start of a new value.
    fn step(&mut self, line: &mut Line) -> Result<(), ParseError> {
        match self.stack.last().unwrap().delim {
            Delim::Seq => self.step_seq(line),
            Delim::Map => self.step_map(line),
        }
    }

    fn step_seq(&mut self, line: &mut Line) -> Result<(), ParseError> {
        let mark = line.mark();
        let slot = std::mem::take(&mut self.stack.last_mut().unwrap().seq_slot);
        match slot {
            SeqSlot::Empty => {
                if line.consume_char(']') {
                    self.close_top(line)?;
                } else if line.consume_char(',') {
                    let top = self.stack.last_mut().unwrap();
                    top.items.push(Value::Null);
                    top.next_index += 1;
                } else {
                    self.begin_value(line, SlotKind::SeqEmpty)?;
                }
            }
            SeqSlot::Value(v) => {
                if is_flow_colon(line) {
                    line.advance();
                    line.skip_spaces();
                    self.stack.last_mut().unwrap().seq_slot = SeqSlot::Key(v);
                } else if line.consume_char(',') {
                    self.push_seq_item(v);
                } else if line.consume_char(']') {
                    self.push_seq_item(v);
                    self.close_top(line)?;
                } else {
                    return Err(ParseError::syntax(mark, "expected ',' or ']' in flow sequence"));
                }
            }
            SeqSlot::Key(k) => {
                self.begin_value(line, SlotKind::SeqKey(k))?;
            }
            SeqSlot::Pair(k, v) => {
                if line.consume_char(',') {
                    self.push_seq_pair(k, v);
                } else if line.consume_char(']') {
                    self.push_seq_pair(k, v);
                    self.close_top(line)?;
                } else {
                    return Err(ParseError::syntax(mark, "expected ',' or ']' in flow sequence"));
                }
            }
        }
        Ok(())
    }

    fn step_map(&mut self, line: &mut Line) -> Result<(), ParseError> {
        let mark = line.mark();
        let slot = std::mem::take(&mut self.stack.last_mut().unwrap().map_slot);
        match slot {
            MapSlot::ExpectKey => {
                if line.consume_char('}') {
                    self.close_top(line)?;
                } else if line.peek() == Some(',') {
                    return Err(ParseError::syntax(mark, "missing key in flow mapping"));
                } else {
                    self.begin_value(line, SlotKind::MapKey)?;
                }
            }
            MapSlot::HaveKey { key, was_quoted } => {
                let bare_colon_after_quoted_key = was_quoted && line.peek() == Some(':');
                if is_flow_colon(line) || bare_colon_after_quoted_key {
                    line.advance();
                    line.skip_spaces();
                    self.stack.last_mut().unwrap().map_slot = MapSlot::HaveColon { key };
                } else if line.consume_char(',') {
                    self.insert_now(key, Value::Null);
                } else if line.consume_char('}') {
                    self.insert_now(key, Value::Null);
                    self.close_top(line)?;
                } else {
                    return Err(ParseError::syntax(mark, "expected ':' after flow mapping key"));
                }
            }
            MapSlot::HaveColon { key } => {
                self.begin_value(line, SlotKind::MapValue(key))?;
            }
        }
        Ok(())
    }

    fn push_seq_item(&mut self, v: Value) {
        let top = self.stack.last_mut().unwrap();
        top.items.push(v);
        top.next_index += 1;
        top.seq_slot = SeqSlot::Empty;
    }

    fn push_seq_pair(&mut self, k: Value, v: Value) {
        let mut pair = serde_json::Map::new();
        pair.insert(key_text(&k), v);
        let top = self.stack.last_mut().unwrap();
        top.items.push(Value::Object(pair));
        top.next_index += 1;
        top.seq_slot = SeqSlot::Empty;
    }

    fn insert_now(&mut self, key: String, value: Value) {
        let top = self.stack.last_mut().unwrap();
        top.map.insert(key, value);
        top.map_slot = MapSlot::ExpectKey;
    }

    /// Dispatch on the next token to start a value: nested flow
    /// container, quoted scalar, alias, or plain scalar. Updates the
    /// owning slot or pushes a new frame / pending scalar as needed.
    fn begin_value(&mut self, line: &mut Line, slot: SlotKind) -> Result<(), ParseError> {
        self.value_mark = line.mark();
        let parent_ctx = self.stack.last().unwrap().ctx.clone();
        let mut item_ctx = match &slot {
            SlotKind::SeqEmpty | SlotKind::SeqKey(_) => {
                let idx = self.stack.last().unwrap().next_index;
                parent_ctx.child_index(idx)
            }
            SlotKind::MapKey => parent_ctx.child_key("<key>"),
            SlotKind::MapValue(key) => parent_ctx.child_key(key),
        };
        properties::consume_properties(line, &mut item_ctx)?;
        let mark = line.mark();
        match line.peek() {
            Some('[') => {
                line.advance();
                self.stack.push(Frame::new(Delim::Seq, item_ctx));
                self.pending_slot = Some(slot);
                self.drive(line)?;
            }
            Some('{') => {
                line.advance();
                self.stack.push(Frame::new(Delim::Map, item_ctx));
                self.pending_slot = Some(slot);
                self.drive(line)?;
            }
            Some('"') => {
                line.advance();
                let scalar = DoubleQuotedScalar::scan(line)?;
                if scalar.terminated() {
                    let value = Value::String(scalar.into_text());
                    item_ctx.save_node_properties(&value);
                    self.commit_slot(slot, value)?;
                } else {
                    self.pending = Some(Pending::Double(scalar, item_ctx));
                    self.pending_slot = Some(slot);
                }
            }
            Some('\'') => {
                line.advance();
                let scalar = SingleQuotedScalar::scan(line);
                if scalar.terminated() {
                    let value = Value::String(scalar.into_text());
                    item_ctx.save_node_properties(&value);
                    self.commit_slot(slot, value)?;
                } else {
                    self.pending = Some(Pending::Single(scalar, item_ctx));
                    self.pending_slot = Some(slot);
                }
            }
            Some('*') => {
                let name = properties::parse_alias_name(line)?;
                let value = item_ctx
                    .lookup_alias(&name)
                    .ok_or_else(|| ParseError::reference(mark, format!("unknown alias '*{name}'")))?;
                item_ctx.record_alias_use(&name);
                self.commit_slot(slot, value)?;
            }
            _ => {
                let scalar = PlainScalar::scan(line, true);
                if scalar.terminated() {
                    let text = scalar.into_text();
                    let classified = classify(&text, item_ctx.pending_tag(), item_ctx.version());
                    if let Some(inferred) = classified.inferred_tag {
                        item_ctx.set_pending_tag(inferred.to_string());
                    }
                    item_ctx.save_node_properties(&classified.value);
                    self.commit_slot(slot, classified.value)?;
                } else {
                    self.pending = Some(Pending::Plain(scalar, item_ctx));
                    self.pending_slot = Some(slot);
                }
            }
        }
        Ok(())
    }

    fn commit_slot(&mut self, slot: SlotKind, value: Value) -> Result<(), ParseError> {
        match slot {
            SlotKind::SeqEmpty => {
                self.stack.last_mut().unwrap().seq_slot = SeqSlot::Value(value);
            }
            SlotKind::SeqKey(k) => {
                self.stack.last_mut().unwrap().seq_slot = SeqSlot::Pair(k, value);
            }
            SlotKind::MapKey => {
                let key = key_text(&value);
                let mark = self.value_mark;
                let was_quoted = matches!(value, Value::String(_));
                let top = self.stack.last_mut().unwrap();
                if top.map.contains_key(&key) {
                    return Err(ParseError::reference(mark, format!("duplicate key {key:?} in flow mapping")));
                }
                top.map_slot = MapSlot::HaveKey { key, was_quoted };
            }
            SlotKind::MapValue(key) => {
                self.insert_now(key, value);
            }
        }
        Ok(())
    }

    fn close_top(&mut self, line: &mut Line) -> Result<(), ParseError> {
        let frame = self.stack.pop().expect("closed a flow frame with none open");
        let ctx = frame.ctx.clone();
        let value = frame.close();
        ctx.save_node_properties(&value);
        if self.stack.is_empty() {
            self.result = Some(value);
        } else {
            let slot = self.pending_slot.take().expect("nested frame closed with no waiting slot");
            self.commit_slot(slot, value)?;
            self.drive(line)?;
        }
        Ok(())
    }
}

fn key_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A `:` that separates a flow key from its value: followed by
/// whitespace, end of line, or a flow indicator (the concession flow
/// makes over block, ).
fn is_flow_colon(line: &Line) -> bool {
    if line.peek() != Some(':') {
        return false;
    }
    matches!(line.peek_at(1), None | Some(' ') | Some('\t') | Some(',') | Some(']') | Some('}'))
}
