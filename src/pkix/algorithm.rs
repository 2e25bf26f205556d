//! Signature algorithm identifiers.
//!
//! There are two independent checks for the AlgorithmIdentifier of a
//! certificate’s signature. The first one checks that the parameters have
//! the shape the algorithm demands. The second one compares the complete
//! encoding of the identifier against a list of encodings that are
//! acceptable. Policies prohibit algorithms by their exact encoding, so the
//! same algorithm may be fine with one encoding of its parameters and
//! prohibited with another.

use std::fmt;
use std::convert::Infallible;
use bcder::{decode, Captured, ConstOid, Integer, Oid, Tag};
use bcder::decode::DecodeError;
use crate::oid;
use crate::document::{Node, Pdu, PduKind};
use crate::util::hex;
use crate::validation::{
    Finding, Predicate, Severity, Validator, ValidatorContainer,
    ValidatorResult,
};


//------------ Signature algorithm paths -------------------------------------

/// The paths of the signature algorithm identifiers in a certificate.
pub const SIGNATURE_ALGORITHM_PATHS: &[&str] = &[
    "certificate.signatureAlgorithm",
    "certificate.tbsCertificate.signature",
];

/// Creates the container with all signature algorithm checks.
pub fn create_signature_algorithm_validator_container() -> ValidatorContainer {
    ValidatorContainer::new("signature algorithm")
        .with_shapes(&[PduKind::AlgorithmIdentifier])
        .with_predicate(Predicate::path_in(SIGNATURE_ALGORITHM_PATHS))
        .with_validator(AlgorithmIdentifierDecodingValidator::signature())
        .with_validator(AllowedSignatureAlgorithmEncodingValidator::signature())
}


//------------ ParameterShape ------------------------------------------------

/// The shape the parameters of an algorithm identifier must have.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParameterShape {
    /// The parameters field must be absent.
    Absent,

    /// The parameters must be present and be NULL.
    Null,

    /// The parameters must be RSASSA-PSS-params.
    RsassaPssParams,
}

impl ParameterShape {
    /// Checks whether the given parameters have this shape.
    pub fn check(self, params: Option<&Captured>) -> Result<(), ShapeError> {
        match (self, params) {
            (ParameterShape::Absent, None) => Ok(()),
            (ParameterShape::Absent, Some(_)) => Err(ShapeError::Present),
            (_, None) => Err(ShapeError::Absent),
            (ParameterShape::Null, Some(params)) => {
                params.clone().decode(|cons| {
                    cons.take_value_if(Tag::NULL, |content| content.to_null())
                }).map_err(ShapeError::Decoding)
            }
            (ParameterShape::RsassaPssParams, Some(params)) => {
                params.clone().decode(take_rsassa_pss_params)
                    .map_err(ShapeError::Decoding)
            }
        }
    }
}

impl fmt::Display for ParameterShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ParameterShape::Absent => "absent",
            ParameterShape::Null => "NULL",
            ParameterShape::RsassaPssParams => "RSASSA-PSS-params",
        })
    }
}

/// Takes RSASSA-PSS parameters.
///
/// ```text
/// RSASSA-PSS-params  ::=  SEQUENCE  {
///     hashAlgorithm      [0] HashAlgorithm DEFAULT sha1Identifier,
///     maskGenAlgorithm   [1] MaskGenAlgorithm DEFAULT mgf1SHA1Identifier,
///     saltLength         [2] INTEGER DEFAULT 20,
///     trailerField       [3] INTEGER DEFAULT 1  }
/// ```
fn take_rsassa_pss_params<S: decode::Source>(
    cons: &mut decode::Constructed<S>
) -> Result<(), DecodeError<S::Error>> {
    cons.take_sequence(|cons| {
        cons.take_opt_constructed_if(Tag::CTX_0, skip_algorithm)?;
        cons.take_opt_constructed_if(Tag::CTX_1, |cons| {
            cons.take_sequence(|cons| {
                let mgf = Oid::take_from(cons)?;
                if mgf != oid::MGF1 {
                    return Err(cons.content_err("unknown mask generation"))
                }
                skip_algorithm(cons)
            })
        })?;
        cons.take_opt_constructed_if(Tag::CTX_2, Integer::take_from)?;
        cons.take_opt_constructed_if(Tag::CTX_3, Integer::take_from)?;
        Ok(())
    })
}

/// Skips over a hash algorithm identifier.
fn skip_algorithm<S: decode::Source>(
    cons: &mut decode::Constructed<S>
) -> Result<(), DecodeError<S::Error>> {
    cons.take_sequence(|cons| {
        Oid::skip_in(cons)?;
        cons.skip_all()
    })
}


//------------ ShapeError ----------------------------------------------------

/// The parameters of an algorithm identifier have the wrong shape.
#[derive(Debug)]
pub enum ShapeError {
    Present,
    Absent,
    Decoding(DecodeError<Infallible>),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ShapeError::Present => f.write_str("parameters present"),
            ShapeError::Absent => f.write_str("parameters missing"),
            ShapeError::Decoding(ref err) => write!(f, "{}", err),
        }
    }
}


//------------ AlgorithmIdentifierDecodingValidator --------------------------

/// Checks that the parameters of an algorithm identifier have the right shape.
///
/// Algorithms not in the validator’s map are not checked.
pub struct AlgorithmIdentifierDecodingValidator {
    shapes: Vec<(ConstOid, ParameterShape)>,
}

impl AlgorithmIdentifierDecodingValidator {
    pub const DECODING_ERROR: Finding = Finding::new(
        Severity::Error, "pkix.algorithm_identifier_parameters_decoding_error"
    );

    pub fn new(shapes: Vec<(ConstOid, ParameterShape)>) -> Self {
        AlgorithmIdentifierDecodingValidator { shapes }
    }

    /// Creates a validator for the known signature algorithms.
    pub fn signature() -> Self {
        Self::new(SIGNATURE_ALGORITHM_SHAPES.into())
    }

    fn shape<T: AsRef<[u8]>>(&self, alg: &Oid<T>) -> Option<ParameterShape> {
        self.shapes.iter().find_map(|(known, shape)| {
            if alg == known { Some(*shape) } else { None }
        })
    }
}

impl Validator for AlgorithmIdentifierDecodingValidator {
    fn name(&self) -> &'static str {
        "AlgorithmIdentifierDecodingValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::DECODING_ERROR]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::AlgorithmIdentifier]
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let alg = match node.child_by_name("algorithm").and_then(|node| {
            node.pdu().as_oid()
        }) {
            Some(alg) => alg,
            None => return Ok(Vec::new())
        };
        let shape = match self.shape(alg) {
            Some(shape) => shape,
            None => return Ok(Vec::new())
        };
        let params = node.child_by_name("parameters").and_then(|node| {
            match *node.pdu() {
                Pdu::Any(ref params) => Some(params),
                _ => None
            }
        });
        shape.check(params).map(|_| Vec::new()).map_err(|err| {
            Self::DECODING_ERROR.with_message(format!(
                "Parameters of {} must be {}: {}",
                oid::describe(alg), shape, err
            ))
        })
    }
}

/// The parameter shapes of the signature algorithms we know.
const SIGNATURE_ALGORITHM_SHAPES: &[(ConstOid, ParameterShape)] = &[
    (oid::ED448, ParameterShape::Absent),
    (oid::ED25519, ParameterShape::Absent),
    (oid::X448, ParameterShape::Absent),
    (oid::X25519, ParameterShape::Absent),
    (oid::DSA_WITH_SHA1, ParameterShape::Absent),
    (oid::DSA_WITH_SHA224, ParameterShape::Absent),
    (oid::DSA_WITH_SHA256, ParameterShape::Absent),
    (oid::ECDSA_WITH_SHA1, ParameterShape::Absent),
    (oid::ECDSA_WITH_SHA224, ParameterShape::Absent),
    (oid::ECDSA_WITH_SHA256, ParameterShape::Absent),
    (oid::ECDSA_WITH_SHA384, ParameterShape::Absent),
    (oid::ECDSA_WITH_SHA512, ParameterShape::Absent),
    (oid::MD2_WITH_RSA_ENCRYPTION, ParameterShape::Null),
    (oid::MD5_WITH_RSA_ENCRYPTION, ParameterShape::Null),
    (oid::SHA1_WITH_RSA_ENCRYPTION, ParameterShape::Null),
    (oid::SHA224_WITH_RSA_ENCRYPTION, ParameterShape::Null),
    (oid::SHA256_WITH_RSA_ENCRYPTION, ParameterShape::Null),
    (oid::SHA384_WITH_RSA_ENCRYPTION, ParameterShape::Null),
    (oid::SHA512_WITH_RSA_ENCRYPTION, ParameterShape::Null),
    (oid::RSASSA_PSS, ParameterShape::RsassaPssParams),
];


//------------ AllowedSignatureAlgorithmEncodingValidator --------------------

/// Checks the complete encoding of an algorithm identifier.
///
/// Any encoding not in the allow list is prohibited. If the encoding is one
/// of the known bad ones, the finding names the algorithm.
pub struct AllowedSignatureAlgorithmEncodingValidator {
    allowed: Vec<Vec<u8>>,
}

impl AllowedSignatureAlgorithmEncodingValidator {
    pub const PROHIBITED_ENCODING: Finding = Finding::new(
        Severity::Error, "pkix.prohibited_signature_algorithm_encoding"
    );

    /// Creates a validator allowing the given hex encoded encodings.
    ///
    /// # Panics
    ///
    /// The function panics if one of the strings isn’t valid hex.
    pub fn new<'a>(allowed: impl IntoIterator<Item = &'a str>) -> Self {
        AllowedSignatureAlgorithmEncodingValidator {
            allowed: allowed.into_iter().map(|item| {
                match hex::decode(item) {
                    Some(item) => item,
                    None => panic!("invalid allowed encoding {}", item)
                }
            }).collect()
        }
    }

    /// Creates a validator allowing the acceptable signature algorithms.
    pub fn signature() -> Self {
        Self::new(
            ALLOWED_SIGNATURE_ALGORITHM_ENCODINGS.iter().map(|(_, hex)| *hex)
        )
    }
}

impl Validator for AllowedSignatureAlgorithmEncodingValidator {
    fn name(&self) -> &'static str {
        "AllowedSignatureAlgorithmEncodingValidator"
    }

    fn findings(&self) -> &[Finding] {
        &[Self::PROHIBITED_ENCODING]
    }

    fn shapes(&self) -> &[PduKind] {
        &[PduKind::AlgorithmIdentifier]
    }

    fn validate(&self, node: Node) -> ValidatorResult {
        let encoded = match *node.pdu() {
            Pdu::AlgorithmIdentifier(ref encoded) => encoded.as_slice(),
            _ => return Ok(Vec::new())
        };
        if self.allowed.iter().any(|item| item.as_slice() == encoded) {
            return Ok(Vec::new())
        }
        let encoded = hex::encode(encoded);
        let name = PROHIBITED_SIGNATURE_ALGORITHM_ENCODINGS.iter().find_map(
            |(name, item)| if *item == encoded { Some(*name) } else { None }
        ).unwrap_or("unknown");
        Err(Self::PROHIBITED_ENCODING.with_message(format!(
            "Prohibited encoding: {} Signature algorithms: {}",
            encoded, name
        )))
    }
}

/// The acceptable encodings of signature algorithm identifiers.
const ALLOWED_SIGNATURE_ALGORITHM_ENCODINGS: &[(&str, &str)] = &[
    (
        "RSASSA-PKCS1-v1_5 with SHA-256",
        "300d06092a864886f70d01010b0500"
    ),
    (
        "RSASSA-PKCS1-v1_5 with SHA-384",
        "300d06092a864886f70d01010c0500"
    ),
    (
        "RSASSA-PKCS1-v1_5 with SHA-512",
        "300d06092a864886f70d01010d0500"
    ),
    (
        "RSASSA-PSS with SHA-256, MGF-1 with SHA-256, salt length 32",
        "304106092a864886f70d01010a3034a00f300d06096086480165030402010500\
         a11c301a06092a864886f70d010108300d06096086480165030402010500\
         a203020120"
    ),
    (
        "RSASSA-PSS with SHA-384, MGF-1 with SHA-384, salt length 48",
        "304106092a864886f70d01010a3034a00f300d06096086480165030402020500\
         a11c301a06092a864886f70d010108300d06096086480165030402020500\
         a203020130"
    ),
    (
        "RSASSA-PSS with SHA-512, MGF-1 with SHA-512, salt length 64",
        "304106092a864886f70d01010a3034a00f300d06096086480165030402030500\
         a11c301a06092a864886f70d010108300d06096086480165030402030500\
         a203020140"
    ),
    ("ECDSA with SHA-256", "300a06082a8648ce3d040302"),
    ("ECDSA with SHA-384", "300a06082a8648ce3d040303"),
    ("Ed25519", "300506032b6570"),
    ("Ed448", "300506032b6571"),
];

/// Encodings of signature algorithm identifiers known to be prohibited.
const PROHIBITED_SIGNATURE_ALGORITHM_ENCODINGS: &[(&str, &str)] = &[
    ("RSASSA-PKCS1-v1_5 with SHA-1", "300d06092a864886f70d0101050500"),
    ("ECDSA with SHA-512", "300a06082a8648ce3d040304"),
];


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::Document;
    use crate::test::CertBuilder;
    use crate::validation::{all_findings, validate};

    const RSA_SHA1: &str = "300d06092a864886f70d0101050500";
    const ECDSA_SHA256: &str = "300a06082a8648ce3d040302";

    fn check(doc: &Document) -> Vec<(&'static str, Option<String>)> {
        validate(
            doc, &[create_signature_algorithm_validator_container()]
        ).iter().flat_map(|result| {
            result.findings().iter().map(|item| {
                (item.code(), item.message().map(Into::into))
            }).collect::<Vec<_>>()
        }).collect()
    }

    #[test]
    fn rsa_with_sha1_is_named() {
        let doc = CertBuilder::new().signature_algorithm(RSA_SHA1).document();
        let results = validate(
            &doc, &[create_signature_algorithm_validator_container()]
        );
        assert_eq!(
            results.iter().map(|item| item.node_path()).collect::<Vec<_>>(),
            [
                "certificate.tbsCertificate.signature",
                "certificate.signatureAlgorithm",
            ]
        );
        for finding in all_findings(&results) {
            assert_eq!(
                finding.code(), "pkix.prohibited_signature_algorithm_encoding"
            );
            assert_eq!(
                finding.message(),
                Some(
                    "Prohibited encoding: 300d06092a864886f70d0101050500 \
                     Signature algorithms: RSASSA-PKCS1-v1_5 with SHA-1"
                )
            );
        }
    }

    #[test]
    fn only_one_algorithm_is_checked() {
        let doc = CertBuilder::new()
            .signature_algorithm(ECDSA_SHA256)
            .tbs_signature(RSA_SHA1)
            .document();
        let findings = check(&doc);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn allowed_encodings() {
        for (_, encoded) in ALLOWED_SIGNATURE_ALGORITHM_ENCODINGS {
            let doc = CertBuilder::new()
                .signature_algorithm(encoded)
                .document();
            assert!(check(&doc).is_empty(), "{}", encoded);
        }
    }

    #[test]
    fn ecdsa_with_sha512_is_named() {
        let doc = CertBuilder::new()
            .signature_algorithm("300a06082a8648ce3d040304")
            .document();
        let findings = check(&doc);
        assert_eq!(findings.len(), 2);
        assert!(
            findings[0].1.as_ref().unwrap().ends_with(
                "Signature algorithms: ECDSA with SHA-512"
            )
        );
    }

    #[test]
    fn unknown_encoding() {
        // ECDSA with SHA-256 with NULL parameters
        let doc = CertBuilder::new()
            .signature_algorithm("300c06082a8648ce3d0403020500")
            .document();
        let findings = check(&doc);
        let codes: Vec<_> = findings.iter().map(|item| item.0).collect();
        assert_eq!(
            codes,
            [
                "pkix.algorithm_identifier_parameters_decoding_error",
                "pkix.prohibited_signature_algorithm_encoding",
                "pkix.algorithm_identifier_parameters_decoding_error",
                "pkix.prohibited_signature_algorithm_encoding",
            ]
        );
        assert_eq!(
            findings[1].1.as_deref(),
            Some(
                "Prohibited encoding: 300c06082a8648ce3d0403020500 \
                 Signature algorithms: unknown"
            )
        );
    }

    #[test]
    fn parameter_shapes() {
        let doc = CertBuilder::new()
            // sha256WithRSAEncryption without NULL
            .signature_algorithm("300b06092a864886f70d01010b")
            .document();
        let findings = check(&doc);
        assert_eq!(
            findings[0].0,
            "pkix.algorithm_identifier_parameters_decoding_error"
        );

        let doc = CertBuilder::new()
            // RSASSA-PSS with an OCTET STRING instead of params
            .signature_algorithm("300f06092a864886f70d01010a04020000")
            .document();
        let findings = check(&doc);
        assert_eq!(
            findings[0].0,
            "pkix.algorithm_identifier_parameters_decoding_error"
        );

        let doc = CertBuilder::new()
            // RSASSA-PSS with all defaults
            .signature_algorithm("300d06092a864886f70d01010a3000")
            .document();
        let codes: Vec<_> = check(&doc).into_iter().map(|i| i.0).collect();
        assert_eq!(
            codes,
            [
                "pkix.prohibited_signature_algorithm_encoding",
                "pkix.prohibited_signature_algorithm_encoding",
            ]
        );
    }
}
