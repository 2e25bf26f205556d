//! Decoding certificates into documents.
//!
//! The decoder only descends into the parts of a certificate that rules
//! look at: algorithm identifiers, names, extensions and the subject
//! alternative name. Everything else ends up in a node with the captured
//! encoding.
//!
//! ```text
//! Certificate  ::=  SEQUENCE  {
//!      tbsCertificate       TBSCertificate,
//!      signatureAlgorithm   AlgorithmIdentifier,
//!      signature            BIT STRING  }
//!
//! TBSCertificate  ::=  SEQUENCE  {
//!      version         [0]  Version DEFAULT v1,
//!      serialNumber         CertificateSerialNumber,
//!      signature            AlgorithmIdentifier,
//!      issuer               Name,
//!      validity             Validity,
//!      subject              Name,
//!      subjectPublicKeyInfo SubjectPublicKeyInfo,
//!      issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
//!      subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
//!      extensions      [3]  Extensions OPTIONAL }
//! ```

use bcder::{decode, Captured, Mode, OctetString, Oid, Tag};
use bcder::decode::DecodeError;
use bytes::Bytes;
use log::trace;
use crate::oid;
use crate::error::DocumentError;
use super::{
    attribute_syntax, Document, DocumentBuilder, NodeId, Pdu, StringKind,
    StringValue,
};


//------------ Document ------------------------------------------------------

impl Document {
    /// Decodes a DER encoded certificate into a document.
    pub fn decode(data: impl Into<Bytes>) -> Result<Self, DocumentError> {
        let data = data.into();
        if data.is_empty() {
            return Err(DocumentError::empty())
        }
        let mut builder = DocumentBuilder::certificate();
        Mode::Der.decode(data, |cons| {
            cons.take_sequence(|cons| take_certificate(cons, &mut builder))
        })?;
        let res = builder.finish();
        trace!("decoded certificate into {} nodes", res.len());
        Ok(res)
    }
}


//------------ Certificate and TBSCertificate --------------------------------

fn take_certificate<S: decode::Source>(
    cons: &mut decode::Constructed<S>,
    builder: &mut DocumentBuilder,
) -> Result<(), DecodeError<S::Error>> {
    let root = builder.root();
    let tbs = builder.push(root, "tbsCertificate", Pdu::TbsCertificate);
    cons.take_sequence(|cons| take_tbs_certificate(cons, builder, tbs))?;
    take_algorithm(cons, builder, root, "signatureAlgorithm")?;
    let signature = take_bit_string(cons)?;
    builder.push(root, "signature", Pdu::BitString(signature));
    Ok(())
}

fn take_tbs_certificate<S: decode::Source>(
    cons: &mut decode::Constructed<S>,
    builder: &mut DocumentBuilder,
    tbs: NodeId,
) -> Result<(), DecodeError<S::Error>> {
    if let Some(version) = cons.take_opt_constructed_if(
        Tag::CTX_0, |cons| cons.capture_one()
    )? {
        builder.push(tbs, "version", Pdu::Any(version));
    }
    let serial = cons.capture_one()?;
    builder.push(tbs, "serialNumber", Pdu::Any(serial));
    take_algorithm(cons, builder, tbs, "signature")?;
    take_name(cons, builder, tbs, "issuer")?;
    let validity = cons.capture_one()?;
    builder.push(tbs, "validity", Pdu::Any(validity));
    take_name(cons, builder, tbs, "subject")?;
    cons.take_sequence(|cons| {
        let spki = builder.push(
            tbs, "subjectPublicKeyInfo", Pdu::SubjectPublicKeyInfo
        );
        take_algorithm(cons, builder, spki, "algorithm")?;
        let key = take_bit_string(cons)?;
        builder.push(spki, "subjectPublicKey", Pdu::BitString(key));
        Ok(())
    })?;
    if let Some(id) = cons.take_opt_value_if(Tag::CTX_1, |content| {
        content.as_primitive()?.take_all()
    })? {
        builder.push(tbs, "issuerUniqueID", Pdu::BitString(id));
    }
    if let Some(id) = cons.take_opt_value_if(Tag::CTX_2, |content| {
        content.as_primitive()?.take_all()
    })? {
        builder.push(tbs, "subjectUniqueID", Pdu::BitString(id));
    }
    cons.take_opt_constructed_if(Tag::CTX_3, |cons| {
        cons.take_sequence(|cons| take_extensions(cons, builder, tbs))
    })?;
    Ok(())
}

/// Takes the content octets of a bit string including the unused octet.
fn take_bit_string<S: decode::Source>(
    cons: &mut decode::Constructed<S>
) -> Result<Bytes, DecodeError<S::Error>> {
    cons.take_value_if(Tag::BIT_STRING, |content| {
        content.as_primitive()?.take_all()
    })
}


//------------ AlgorithmIdentifier -------------------------------------------

/// Takes an algorithm identifier.
///
/// ```text
/// AlgorithmIdentifier  ::=  SEQUENCE  {
///      algorithm               OBJECT IDENTIFIER,
///      parameters              ANY DEFINED BY algorithm OPTIONAL  }
/// ```
///
/// The parameters are kept as they are. Whether they are correct for the
/// algorithm is for the rules to decide.
fn take_algorithm<S: decode::Source>(
    cons: &mut decode::Constructed<S>,
    builder: &mut DocumentBuilder,
    parent: NodeId,
    name: &str,
) -> Result<(), DecodeError<S::Error>> {
    let captured = cons.capture_one()?;
    let node = builder.push(
        parent, name, Pdu::AlgorithmIdentifier(captured.clone())
    );
    captured.decode(|cons| {
        cons.take_sequence(|cons| {
            let algorithm = Oid::take_from(cons)?;
            builder.push(node, "algorithm", Pdu::ObjectIdentifier(algorithm));
            let params = cons.capture_all()?;
            if !params.as_slice().is_empty() {
                builder.push(node, "parameters", Pdu::Any(params));
            }
            Ok(())
        })
    }).map_err(DecodeError::convert)
}


//------------ Name ----------------------------------------------------------

/// Takes a name.
///
/// ```text
/// Name ::= CHOICE { rdnSequence  RDNSequence }
/// RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
/// RelativeDistinguishedName ::= SET SIZE (1..MAX) OF AttributeTypeAndValue
/// AttributeTypeAndValue ::= SEQUENCE {
///      type     AttributeType,
///      value    AttributeValue }
/// ```
///
/// An empty RDNSequence is fine since subjects may be empty.
fn take_name<S: decode::Source>(
    cons: &mut decode::Constructed<S>,
    builder: &mut DocumentBuilder,
    parent: NodeId,
    name: &str,
) -> Result<(), DecodeError<S::Error>> {
    let name = builder.push(parent, name, Pdu::Name);
    let rdns = builder.push(name, "rdnSequence", Pdu::RdnSequence);
    cons.take_sequence(|cons| {
        let mut rdn_count = 0usize;
        while let Some(()) = cons.take_opt_set(|cons| {
            let rdn = builder.push(
                rdns, rdn_count.to_string(), Pdu::RelativeDistinguishedName
            );
            rdn_count += 1;
            let mut atv_count = 0usize;
            while let Some(()) = cons.take_opt_sequence(|cons| {
                let attr_type = Oid::take_from(cons)?;
                let value = cons.capture_one()?;
                builder.push_attribute(
                    rdn, atv_count.to_string(), attr_type, value
                );
                atv_count += 1;
                Ok(())
            })? { }
            if atv_count == 0 {
                return Err(cons.content_err(
                    "empty relative distinguished name"
                ))
            }
            Ok(())
        })? { }
        Ok(())
    })
}

/// Decodes an attribute value according to its attribute type.
///
/// Values of attribute types with an unknown syntax are decoded if they
/// are any kind of character string. Returns `None` if the value doesn’t
/// follow the syntax or isn’t a string at all.
pub(super) fn decode_attribute_value(
    attr_type: &Oid<Bytes>, value: &Captured
) -> Option<StringValue> {
    let value = StringValue::from_captured(value)?;
    match attribute_syntax(attr_type) {
        Some(allowed) if !allowed.contains(&value.kind()) => None,
        _ => Some(value)
    }
}


//------------ Extensions ----------------------------------------------------

/// Takes the content of the extensions sequence.
///
/// ```text
/// Extension  ::=  SEQUENCE  {
///      extnID      OBJECT IDENTIFIER,
///      critical    BOOLEAN DEFAULT FALSE,
///      extnValue   OCTET STRING }
/// ```
fn take_extensions<S: decode::Source>(
    cons: &mut decode::Constructed<S>,
    builder: &mut DocumentBuilder,
    tbs: NodeId,
) -> Result<(), DecodeError<S::Error>> {
    let extensions = builder.push(tbs, "extensions", Pdu::Extensions);
    let mut count = 0usize;
    while let Some(()) = cons.take_opt_sequence(|cons| {
        let extension = builder.push(
            extensions, count.to_string(), Pdu::Extension
        );
        count += 1;
        let id = Oid::take_from(cons)?;
        let critical = cons.take_opt_bool()?;
        let value = OctetString::take_from(cons)?;
        builder.push(extension, "extnID", Pdu::ObjectIdentifier(id.clone()));
        if let Some(critical) = critical {
            builder.push(extension, "critical", Pdu::Boolean(critical));
        }
        let value_node = builder.push(
            extension, "extnValue", Pdu::OctetString(value.to_bytes())
        );
        if id == oid::CE_SUBJECT_ALT_NAME {
            Mode::Der.decode(value, |cons| {
                take_general_names(cons, builder, value_node)
            }).map_err(DecodeError::convert)?;
        }
        Ok(())
    })? { }
    Ok(())
}


//------------ GeneralNames --------------------------------------------------

/// Takes the GeneralNames of a subject alternative name extension.
///
/// ```text
/// GeneralName ::= CHOICE {
///      otherName                 [0]  OtherName,
///      rfc822Name                [1]  IA5String,
///      dNSName                   [2]  IA5String,
///      x400Address               [3]  ORAddress,
///      directoryName             [4]  Name,
///      ediPartyName              [5]  EDIPartyName,
///      uniformResourceIdentifier [6]  IA5String,
///      iPAddress                 [7]  OCTET STRING,
///      registeredID              [8]  OBJECT IDENTIFIER }
/// ```
///
/// Variants we don’t look into are skipped and leave the GeneralName node
/// without a child.
fn take_general_names<S: decode::Source>(
    cons: &mut decode::Constructed<S>,
    builder: &mut DocumentBuilder,
    parent: NodeId,
) -> Result<(), DecodeError<S::Error>> {
    let names = builder.push(parent, "subjectAltName", Pdu::GeneralNames);
    cons.take_sequence(|cons| {
        let mut count = 0usize;
        while let Some(()) = cons.take_opt_value(|tag, content| {
            let name = builder.push(
                names, count.to_string(), Pdu::GeneralName
            );
            count += 1;
            if tag == Tag::CTX_0 {
                take_other_name(content.as_constructed()?, builder, name)
            }
            else if tag == Tag::CTX_1 {
                take_ia5_name(content, builder, name, "rfc822Name")
            }
            else if tag == Tag::CTX_2 {
                take_ia5_name(content, builder, name, "dNSName")
            }
            else if tag == Tag::CTX_4 {
                take_name(
                    content.as_constructed()?, builder, name, "directoryName"
                )
            }
            else if tag == Tag::CTX_6 {
                take_ia5_name(
                    content, builder, name, "uniformResourceIdentifier"
                )
            }
            else {
                match *content {
                    decode::Content::Primitive(ref mut inner) => {
                        inner.skip_all()
                    }
                    decode::Content::Constructed(ref mut inner) => {
                        inner.skip_all()
                    }
                }
            }
        })? { }
        Ok(())
    })
}

/// Takes a general name that is an IA5String.
///
/// Content that isn’t valid IA5 is kept as raw octets.
fn take_ia5_name<S: decode::Source>(
    content: &mut decode::Content<S>,
    builder: &mut DocumentBuilder,
    parent: NodeId,
    name: &str,
) -> Result<(), DecodeError<S::Error>> {
    let octets = content.as_primitive()?.take_all()?;
    let pdu = match StringValue::from_content(StringKind::Ia5, &octets) {
        Some(value) => Pdu::String(value),
        None => Pdu::OctetString(octets),
    };
    builder.push(parent, name, pdu);
    Ok(())
}

/// Takes the content of an other name.
///
/// ```text
/// OtherName ::= SEQUENCE {
///      type-id    OBJECT IDENTIFIER,
///      value      [0] EXPLICIT ANY DEFINED BY type-id }
/// ```
///
/// Only the value of an SmtpUTF8Mailbox is decoded further. A mailbox that
/// isn’t a UTF8String is kept undecoded like the values of other types.
fn take_other_name<S: decode::Source>(
    cons: &mut decode::Constructed<S>,
    builder: &mut DocumentBuilder,
    parent: NodeId,
) -> Result<(), DecodeError<S::Error>> {
    let other_name = builder.push(parent, "otherName", Pdu::OtherName);
    let type_id = Oid::take_from(cons)?;
    let value = cons.take_constructed_if(Tag::CTX_0, |cons| {
        cons.capture_one()
    })?;
    builder.push(other_name, "type-id", Pdu::ObjectIdentifier(type_id.clone()));
    let value_node = builder.push(other_name, "value", Pdu::OtherNameValue);
    let mailbox = if type_id == oid::ON_SMTP_UTF8_MAILBOX {
        StringValue::from_captured(&value).filter(|mailbox| {
            mailbox.kind() == StringKind::Utf8
        })
    }
    else {
        None
    };
    match mailbox {
        Some(mailbox) => {
            builder.push(value_node, "utf8String", Pdu::String(mailbox));
        }
        None => {
            builder.push(value_node, "any", Pdu::Any(value));
        }
    }
    Ok(())
}


//============ Tests =========================================================
