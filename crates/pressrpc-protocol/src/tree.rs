//! Generic XML tree used by the response parser.
//!
//! A parsed document is turned into a loose, name-keyed tree before any
//! XML-RPC meaning is applied to it:
//!
//! - an element with child elements becomes a [`Node::Map`] from child
//!   name to child node;
//! - children repeating the same name collapse into one [`Node::List`];
//! - a leaf element becomes [`Node::Text`], or an empty map when it has
//!   no text at all.
//!
//! The catch is that a list of one is indistinguishable from a single
//! child: `<data><value/></data>` has no list in it. Callers that always
//! expect a sequence go through [`Node::items`], which puts that right.

use indexmap::IndexMap;
use indexmap::map::Entry;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::ProtocolError;

/// Key under which non-blank text mixed with child elements is kept.
pub const TEXT_KEY: &str = "#text";

/// A node of the generic tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Map(IndexMap<String, Node>),
    List(Vec<Node>),
}

impl Node {
    /// Looks up a child by name.
    ///
    /// `None` means absent. A present-but-empty element is `Some` of an
    /// empty map, so presence checks never depend on content.
    pub fn get(&self, name: &str) -> Option<&Node> {
        match self {
            Self::Map(children) => children.get(name),
            _ => None,
        }
    }

    /// Follows a chain of child names.
    ///
    /// A collapsed list met along the way is entered through its first
    /// element.
    pub fn path(&self, names: &[&str]) -> Option<&Node> {
        names
            .iter()
            .try_fold(self, |node, name| node.first().get(name))
    }

    /// The text content of a leaf.
    ///
    /// An empty element reads as `""`. An element with children has no
    /// leaf text, unless non-blank text was mixed in with them.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Map(children) if children.is_empty() => Some(""),
            Self::Map(children) => match children.get(TEXT_KEY) {
                Some(Self::Text(text)) => Some(text),
                _ => None,
            },
            Self::List(_) => None,
        }
    }

    /// Iterates over this node as a sequence.
    ///
    /// A list yields its elements; any other node is a list of one.
    pub fn items(&self) -> std::slice::Iter<'_, Node> {
        match self {
            Self::List(items) => items.iter(),
            single => std::slice::from_ref(single).iter(),
        }
    }

    /// Names of the child elements, in document order.
    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        let children = match self {
            Self::Map(children) => Some(children),
            _ => None,
        };
        children
            .into_iter()
            .flat_map(|children| children.keys())
            .map(String::as_str)
            .filter(|name| *name != TEXT_KEY)
    }

    fn first(&self) -> &Node {
        match self {
            Self::List(items) => items.first().unwrap_or(self),
            _ => self,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// An element still being read.
struct Frame {
    name: String,
    children: Vec<(String, Node)>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
            text: String::new(),
        }
    }

    fn into_node(self) -> (String, Node) {
        if self.children.is_empty() {
            let node = if self.text.is_empty() {
                Node::Map(IndexMap::new())
            } else {
                Node::Text(self.text)
            };
            return (self.name, node);
        }

        let mut map: IndexMap<String, Node> = IndexMap::new();
        for (name, node) in self.children {
            match map.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
                // Child nodes are never lists themselves, so an existing
                // list can only be one we collapsed earlier.
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    Node::List(items) => items.push(node),
                    existing => {
                        let first = std::mem::replace(existing, Node::List(Vec::new()));
                        *existing = Node::List(vec![first, node]);
                    }
                },
            }
        }
        if !self.text.trim().is_empty() {
            map.insert(TEXT_KEY.to_owned(), Node::Text(self.text));
        }
        (self.name, Node::Map(map))
    }
}

/// Parses an XML document into its root element name and tree.
///
/// # Errors
/// Returns `ProtocolError::Malformed` if the text is not well-formed XML
/// or holds no root element.
pub fn parse_document(text: &str) -> Result<(String, Node), ProtocolError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(&reader, e))?;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ProtocolError::Malformed(
                        "multiple root elements".into(),
                    ));
                }
                stack.push(Frame::new(element_name(start.name().as_ref())?));
            }
            Event::Empty(start) => {
                let name = element_name(start.name().as_ref())?;
                let node = (name, Node::Map(IndexMap::new()));
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| malformed(&reader, e))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    let bytes = data.into_inner();
                    let text = std::str::from_utf8(&bytes).map_err(|e| {
                        ProtocolError::Malformed(format!("CDATA is not UTF-8: {e}"))
                    })?;
                    frame.text.push_str(text);
                }
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| {
                    ProtocolError::Malformed("unbalanced closing tag".into())
                })?;
                attach(&mut stack, &mut root, frame.into_node())?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ProtocolError::Malformed("unexpected end of document".into()));
    }
    root.ok_or_else(|| ProtocolError::Malformed("no root element".into()))
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, Node)>,
    node: (String, Node),
) -> Result<(), ProtocolError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(ProtocolError::Malformed("multiple root elements".into()));
        }
    }
    Ok(())
}

fn element_name(raw: &[u8]) -> Result<String, ProtocolError> {
    std::str::from_utf8(raw).map(str::to_owned).map_err(|e| {
        ProtocolError::Malformed(format!("element name is not UTF-8: {e}"))
    })
}

fn malformed(reader: &Reader<&[u8]>, error: impl std::fmt::Display) -> ProtocolError {
    ProtocolError::Malformed(format!(
        "{error} at byte {}",
        reader.buffer_position()
    ))
}
