//! Decoded documents as navigable trees of nodes.
//!
//! A [`Document`] owns a tree of decoded values. Each value lives in a node
//! that knows its name within its parent, a dotted path unique within the
//! document, its children in decoding order, and its parent. Nodes are
//! accessed through the lightweight [`Node`] handle which also provides the
//! way back to the document for document-wide queries.
//!
//! Documents are immutable once built. They are created either by decoding
//! a DER encoded certificate via [`Document::decode`] or, for values coming
//! from elsewhere, through a [`DocumentBuilder`].

use std::fmt;
use bcder::{Captured, Oid};
use bytes::Bytes;
use crate::oid;

pub use self::string::{StringKind, StringValue};

mod decode;
mod string;


//------------ NodeId --------------------------------------------------------

/// The identifier of a node within its document.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);


//------------ Pdu -----------------------------------------------------------

/// A decoded value.
///
/// This is a closed set of the value shapes the decoder produces. The
/// structure of a value is expressed through the children of its node,
/// the variant itself only carries data for leaves and for values whose
/// complete encoding is of interest.
#[derive(Clone, Debug)]
pub enum Pdu {
    /// The outer Certificate sequence.
    Certificate,

    /// The TBSCertificate sequence.
    TbsCertificate,

    /// An AlgorithmIdentifier together with its complete encoding.
    ///
    /// Its children are `algorithm` and, if present, `parameters`.
    AlgorithmIdentifier(Captured),

    /// A SubjectPublicKeyInfo sequence.
    SubjectPublicKeyInfo,

    /// A Name.
    ///
    /// Its only child is the `rdnSequence`.
    Name,

    /// An RDNSequence with one child per relative distinguished name.
    RdnSequence,

    /// A RelativeDistinguishedName with one child per attribute.
    RelativeDistinguishedName,

    /// An AttributeTypeAndValue with children `type` and `value`.
    AttributeTypeAndValue,

    /// The encoded value of an attribute.
    ///
    /// If the value could be decoded according to its attribute type, the
    /// node has a single child with the decoded string.
    AttributeValue(Captured),

    /// The Extensions sequence with one child per extension.
    Extensions,

    /// An Extension with children `extnID`, `critical` if present, and
    /// `extnValue`.
    Extension,

    /// The GeneralNames of a Subject Alternative Name extension.
    GeneralNames,

    /// A GeneralName with a single child named after the chosen variant.
    GeneralName,

    /// An OtherName with children `type-id` and `value`.
    OtherName,

    /// The explicitly tagged value of an OtherName.
    ///
    /// If the type is known, the node has a single child with the decoded
    /// value.
    OtherNameValue,

    /// An object identifier.
    ObjectIdentifier(Oid<Bytes>),

    /// A boolean.
    Boolean(bool),

    /// The content of an octet string.
    OctetString(Bytes),

    /// The content of a bit string including the unused bits octet.
    BitString(Bytes),

    /// A character string.
    String(StringValue),

    /// A value that is not decoded any further.
    Any(Captured),
}

impl Pdu {
    /// Returns the kind of the value.
    pub fn kind(&self) -> PduKind {
        match *self {
            Pdu::Certificate => PduKind::Certificate,
            Pdu::TbsCertificate => PduKind::TbsCertificate,
            Pdu::AlgorithmIdentifier(_) => PduKind::AlgorithmIdentifier,
            Pdu::SubjectPublicKeyInfo => PduKind::SubjectPublicKeyInfo,
            Pdu::Name => PduKind::Name,
            Pdu::RdnSequence => PduKind::RdnSequence,
            Pdu::RelativeDistinguishedName => {
                PduKind::RelativeDistinguishedName
            }
            Pdu::AttributeTypeAndValue => PduKind::AttributeTypeAndValue,
            Pdu::AttributeValue(_) => PduKind::AttributeValue,
            Pdu::Extensions => PduKind::Extensions,
            Pdu::Extension => PduKind::Extension,
            Pdu::GeneralNames => PduKind::GeneralNames,
            Pdu::GeneralName => PduKind::GeneralName,
            Pdu::OtherName => PduKind::OtherName,
            Pdu::OtherNameValue => PduKind::OtherNameValue,
            Pdu::ObjectIdentifier(_) => PduKind::ObjectIdentifier,
            Pdu::Boolean(_) => PduKind::Boolean,
            Pdu::OctetString(_) => PduKind::OctetString,
            Pdu::BitString(_) => PduKind::BitString,
            Pdu::String(_) => PduKind::String,
            Pdu::Any(_) => PduKind::Any,
        }
    }

    /// Returns the object identifier if the value is one.
    pub fn as_oid(&self) -> Option<&Oid<Bytes>> {
        match *self {
            Pdu::ObjectIdentifier(ref oid) => Some(oid),
            _ => None
        }
    }

    /// Returns the string if the value is one.
    pub fn as_string(&self) -> Option<&StringValue> {
        match *self {
            Pdu::String(ref value) => Some(value),
            _ => None
        }
    }
}


//------------ PduKind -------------------------------------------------------

/// The kind of a decoded value.
///
/// This is the tag of the [`Pdu`] variant without its data and is what
/// validators match against to declare the values they apply to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PduKind {
    Certificate,
    TbsCertificate,
    AlgorithmIdentifier,
    SubjectPublicKeyInfo,
    Name,
    RdnSequence,
    RelativeDistinguishedName,
    AttributeTypeAndValue,
    AttributeValue,
    Extensions,
    Extension,
    GeneralNames,
    GeneralName,
    OtherName,
    OtherNameValue,
    ObjectIdentifier,
    Boolean,
    OctetString,
    BitString,
    String,
    Any,
}


//------------ Document ------------------------------------------------------

/// A decoded document.
///
/// The document owns all its nodes and keeps indexes for the lookups that
/// validators need across the tree: extensions by their identifier and
/// subject attributes by their type.
#[derive(Clone, Debug)]
pub struct Document {
    /// All nodes of the tree. The root is the first one.
    nodes: Vec<NodeData>,

    /// The extension nodes with their identifiers in order of appearance.
    extensions: Vec<(Oid<Bytes>, NodeId)>,

    /// The subject attribute nodes with their type and RDN index.
    subject_attributes: Vec<(Oid<Bytes>, NodeId, usize)>,
}

#[derive(Clone, Debug)]
struct NodeData {
    name: String,
    path: String,
    pdu: Pdu,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Document {
    fn from_nodes(nodes: Vec<NodeData>) -> Self {
        let mut res = Document {
            nodes,
            extensions: Vec::new(),
            subject_attributes: Vec::new(),
        };
        res.extensions = res.root().navigate(
            "tbsCertificate.extensions"
        ).map(|extensions| {
            extensions.children().filter_map(|ext| {
                let id = ext.child_by_name("extnID")?.pdu().as_oid()?;
                Some((id.clone(), ext.id))
            }).collect()
        }).unwrap_or_default();
        res.subject_attributes = res.root().navigate(
            "tbsCertificate.subject.rdnSequence"
        ).map(|rdns| {
            rdns.children().enumerate().flat_map(|(idx, rdn)| {
                rdn.children().filter_map(move |atv| {
                    let attr_type = atv.attribute_type()?;
                    Some((attr_type.clone(), atv.id, idx))
                })
            }).collect()
        }).unwrap_or_default();
        res
    }

    /// Returns the root node of the document.
    pub fn root(&self) -> Node<'_> {
        Node { document: self, id: NodeId(0) }
    }

    /// Returns the node with the given identifier.
    ///
    /// # Panics
    ///
    /// The method panics if the identifier is not from this document.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id.0 < self.nodes.len(), "node from a different document");
        Node { document: self, id }
    }

    /// Returns the number of nodes in the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the document consists of the root node only.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() < 2
    }

    /// Returns all nodes in pre-order.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder { document: self, stack: vec![NodeId(0)] }
    }

    /// Returns the extension with the given identifier and its index.
    ///
    /// If the extension appears more than once, the first one is returned.
    pub fn get_extension_by_oid<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Option<(Node<'_>, usize)> {
        self.extensions.iter().enumerate().find_map(|(idx, (id, node))| {
            if id == oid { Some((self.node(*node), idx)) }
            else { None }
        })
    }

    /// Returns all subject attributes of the given type.
    ///
    /// Each item is the AttributeTypeAndValue node and the index of the
    /// relative distinguished name it appears in.
    pub fn get_subject_attributes_by_type<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Vec<(Node<'_>, usize)> {
        self.subject_attributes.iter().filter_map(|(id, node, idx)| {
            if id == oid { Some((self.node(*node), *idx)) }
            else { None }
        }).collect()
    }
}


//------------ Node ----------------------------------------------------------

/// A reference to a node in a document.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    document: &'a Document,
    id: NodeId,
}

impl<'a> Node<'a> {
    fn data(self) -> &'a NodeData {
        &self.document.nodes[self.id.0]
    }

    /// Returns the identifier of the node within its document.
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Returns the document the node belongs to.
    pub fn document(self) -> &'a Document {
        self.document
    }

    /// Returns the decoded value of the node.
    pub fn pdu(self) -> &'a Pdu {
        &self.data().pdu
    }

    /// Returns the kind of the decoded value of the node.
    pub fn kind(self) -> PduKind {
        self.pdu().kind()
    }

    /// Returns the name of the node within its parent.
    pub fn name(self) -> &'a str {
        &self.data().name
    }

    /// Returns the dotted path of the node.
    pub fn path(self) -> &'a str {
        &self.data().path
    }

    /// Returns the children of the node in order.
    pub fn children(self) -> impl Iterator<Item = Node<'a>> + 'a {
        let document = self.document;
        self.data().children.iter().map(move |&id| Node { document, id })
    }

    /// Returns the child with the given name.
    pub fn child_by_name(self, name: &str) -> Option<Node<'a>> {
        self.children().find(|child| child.name() == name)
    }

    /// Returns the only child of the node.
    ///
    /// This is used for choices where the child is named after the chosen
    /// variant. Returns `None` if the node doesn’t have exactly one child.
    pub fn child(self) -> Option<Node<'a>> {
        match self.data().children.as_slice() {
            [id] => Some(Node { document: self.document, id: *id }),
            _ => None
        }
    }

    /// Returns the descendant at the given relative dotted path.
    pub fn navigate(self, path: &str) -> Option<Node<'a>> {
        path.split('.').try_fold(self, |node, name| {
            node.child_by_name(name)
        })
    }

    /// Returns the parent of the node.
    pub fn parent(self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node { document: self.document, id })
    }

    /// Returns the ancestors of the node, nearest first.
    pub fn parents(self) -> Parents<'a> {
        Parents { next: self.parent() }
    }

    /// Returns the attribute type if this is an AttributeTypeAndValue.
    pub fn attribute_type(self) -> Option<&'a Oid<Bytes>> {
        if self.kind() != PduKind::AttributeTypeAndValue {
            return None
        }
        self.child_by_name("type")?.pdu().as_oid()
    }

    /// Returns whether this is an attribute value of the given type.
    pub fn is_attribute_value_of<T: AsRef<[u8]>>(self, oid: &Oid<T>) -> bool {
        self.kind() == PduKind::AttributeValue && self.parent().and_then(
            |atv| atv.attribute_type()
        ).map(|attr_type| attr_type == oid).unwrap_or(false)
    }
}


//--- Debug

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Node")
            .field("path", &self.path())
            .field("kind", &self.kind())
            .finish()
    }
}


//------------ Parents -------------------------------------------------------

/// An iterator over the ancestors of a node.
pub struct Parents<'a> {
    next: Option<Node<'a>>,
}

impl<'a> Iterator for Parents<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let res = self.next?;
        self.next = res.parent();
        Some(res)
    }
}


//------------ PreOrder ------------------------------------------------------

/// An iterator over all nodes of a document in pre-order.
pub struct PreOrder<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = Node { document: self.document, id };
        self.stack.extend(node.data().children.iter().rev());
        Some(node)
    }
}


//------------ DocumentBuilder -----------------------------------------------

/// Assembles a document node by node.
///
/// The builder starts out with the root node. Children are appended to
/// their parent in order and receive a path made from the parent’s path and
/// their name.
#[derive(Clone, Debug)]
pub struct DocumentBuilder {
    nodes: Vec<NodeData>,
}

impl DocumentBuilder {
    /// Creates a new builder with the given root node.
    pub fn new(name: impl Into<String>, pdu: Pdu) -> Self {
        let name = name.into();
        DocumentBuilder {
            nodes: vec![NodeData {
                path: name.clone(),
                name,
                pdu,
                parent: None,
                children: Vec::new(),
            }]
        }
    }

    /// Creates a builder for a certificate document.
    pub fn certificate() -> Self {
        Self::new("certificate", Pdu::Certificate)
    }

    /// Returns the identifier of the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new child to a node and returns its identifier.
    ///
    /// # Panics
    ///
    /// Paths must be unique within a document, so the method panics if the
    /// parent already has a child of the same name. It also panics if the
    /// parent is not a node of this builder.
    pub fn push(
        &mut self, parent: NodeId, name: impl Into<String>, pdu: Pdu
    ) -> NodeId {
        let name = name.into();
        let parent_data = &self.nodes[parent.0];
        assert!(
            !parent_data.children.iter().any(|id| {
                self.nodes[id.0].name == name
            }),
            "duplicate child {} in {}", name, parent_data.path
        );
        let id = NodeId(self.nodes.len());
        let path = format!("{}.{}", parent_data.path, name);
        self.nodes.push(NodeData {
            name, path, pdu, parent: Some(parent), children: Vec::new()
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Appends an AttributeTypeAndValue with a string value.
    ///
    /// A string value is attached as a decoded child unless its kind is
    /// not allowed for the attribute type, just as the decoder does it.
    pub fn push_attribute(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        attr_type: Oid<Bytes>,
        encoded: Captured,
    ) -> NodeId {
        let atv = self.push(parent, name, Pdu::AttributeTypeAndValue);
        self.push(atv, "type", Pdu::ObjectIdentifier(attr_type.clone()));
        let decoded = decode::decode_attribute_value(&attr_type, &encoded);
        let value = self.push(atv, "value", Pdu::AttributeValue(encoded));
        if let Some(decoded) = decoded {
            self.push(value, decoded.kind().field_name(), Pdu::String(decoded));
        }
        atv
    }

    /// Finishes building and returns the document.
    pub fn finish(self) -> Document {
        Document::from_nodes(self.nodes)
    }
}


//------------ Attribute syntax helpers --------------------------------------

/// Returns the string kinds an attribute type’s value may be encoded as.
///
/// Returns `None` for attribute types we don’t know the syntax of.
pub fn attribute_syntax<T: AsRef<[u8]>>(
    attr_type: &Oid<T>
) -> Option<&'static [StringKind]> {
    const DIRECTORY_STRING: &[StringKind] = &[
        StringKind::Teletex, StringKind::Printable, StringKind::Universal,
        StringKind::Utf8, StringKind::Bmp,
    ];
    const PRINTABLE: &[StringKind] = &[StringKind::Printable];
    const IA5: &[StringKind] = &[StringKind::Ia5];

    if *attr_type == oid::AT_COUNTRY_NAME
        || *attr_type == oid::AT_SERIAL_NUMBER
        || *attr_type == oid::AT_DN_QUALIFIER
    {
        Some(PRINTABLE)
    }
    else if *attr_type == oid::EMAIL_ADDRESS
        || *attr_type == oid::AT_DOMAIN_COMPONENT
    {
        Some(IA5)
    }
    else if [
        oid::AT_COMMON_NAME, oid::AT_SURNAME, oid::AT_LOCALITY_NAME,
        oid::AT_STATE_OR_PROVINCE_NAME, oid::AT_STREET_ADDRESS,
        oid::AT_ORGANIZATION_NAME, oid::AT_ORGANIZATIONAL_UNIT_NAME,
        oid::AT_TITLE, oid::AT_DESCRIPTION, oid::AT_BUSINESS_CATEGORY,
        oid::AT_POSTAL_CODE, oid::AT_NAME, oid::AT_GIVEN_NAME,
        oid::AT_INITIALS, oid::AT_GENERATION_QUALIFIER, oid::AT_PSEUDONYM,
        oid::AT_ORGANIZATION_IDENTIFIER, oid::AT_USER_ID,
    ].iter().any(|known| known == attr_type) {
        Some(DIRECTORY_STRING)
    }
    else {
        None
    }
}


//============ Tests =========================================================
