//! Unit tests for the public surface.

use preg_parser::*;

#[test]
fn test_header_constants() {
    assert_eq!(HEADER_SIZE, 8);
    assert_eq!(PREG_SIGNATURE, b"PReg");
    assert_eq!(PREG_VERSION, 1);
}

#[test]
fn test_value_name_cap() {
    assert_eq!(MAX_VALUE_NAME_LEN, 259);
}

#[test]
fn test_type_tags() {
    assert_eq!(PolicyRegType::from_u32(1).unwrap(), PolicyRegType::Sz);
    assert_eq!(PolicyRegType::from_u32(2).unwrap(), PolicyRegType::ExpandSz);
    assert_eq!(PolicyRegType::from_u32(3).unwrap(), PolicyRegType::Binary);
    assert_eq!(
        PolicyRegType::from_u32(4).unwrap(),
        PolicyRegType::DwordLittleEndian
    );
    assert_eq!(
        PolicyRegType::from_u32(5).unwrap(),
        PolicyRegType::DwordBigEndian
    );
    assert_eq!(PolicyRegType::from_u32(6).unwrap(), PolicyRegType::Link);
    assert_eq!(PolicyRegType::from_u32(7).unwrap(), PolicyRegType::MultiSz);
    assert_eq!(
        PolicyRegType::from_u32(8).unwrap(),
        PolicyRegType::ResourceList
    );
    assert_eq!(
        PolicyRegType::from_u32(9).unwrap(),
        PolicyRegType::FullResourceDescriptor
    );
    assert_eq!(
        PolicyRegType::from_u32(10).unwrap(),
        PolicyRegType::ResourceRequirementsList
    );
    assert_eq!(
        PolicyRegType::from_u32(11).unwrap(),
        PolicyRegType::QwordLittleEndian
    );
    assert_eq!(
        PolicyRegType::from_u32(12).unwrap(),
        PolicyRegType::QwordBigEndian
    );
}

#[test]
fn test_type_tag_round_trip() {
    for tag in 1..=12u32 {
        assert_eq!(PolicyRegType::from_u32(tag).unwrap().as_u32(), tag);
    }
}

#[test]
fn test_reg_none_is_rejected() {
    assert!(matches!(
        PolicyRegType::from_u32(0),
        Err(PolicyError::InvalidValueType(0))
    ));
}

#[test]
fn test_type_names() {
    assert_eq!(PolicyRegType::Sz.name(), "REG_SZ");
    assert_eq!(PolicyRegType::ExpandSz.name(), "REG_EXPAND_SZ");
    assert_eq!(PolicyRegType::Binary.name(), "REG_BINARY");
    assert_eq!(
        PolicyRegType::DwordLittleEndian.name(),
        "REG_DWORD_LITTLE_ENDIAN"
    );
    assert_eq!(PolicyRegType::Link.name(), "REG_LINK");
    assert_eq!(PolicyRegType::MultiSz.name(), "REG_MULTI_SZ");
    assert_eq!(
        PolicyRegType::QwordLittleEndian.name(),
        "REG_QWORD_LITTLE_ENDIAN"
    );
}

#[test]
fn test_data_display() {
    assert_eq!(PolicyData::String("Hello".into()).to_string(), "Hello");
    assert_eq!(
        PolicyData::MultiString(vec!["a".into(), "b".into()]).to_string(),
        "a, b"
    );
    assert!(PolicyData::Dword(0x12345678).to_string().contains("0x12345678"));
    assert!(PolicyData::Binary(vec![0x01, 0x02]).to_string().contains("01"));
    assert!(PolicyData::Qword(1).to_string().contains("0x0000000000000001"));
}

#[test]
fn test_instruction_constructor_validates() {
    assert!(PolicyInstruction::new(
        "Software\\Policies",
        "Setting",
        PolicyRegType::Sz,
        PolicyData::String("on".into()),
    )
    .is_ok());

    assert!(matches!(
        PolicyInstruction::new("", "v", PolicyRegType::Sz, PolicyData::String("x".into())),
        Err(PolicyError::InvalidKeyPath(_))
    ));
    assert!(matches!(
        PolicyInstruction::new(
            "k",
            "v",
            PolicyRegType::Binary,
            PolicyData::String("x".into())
        ),
        Err(PolicyError::DataTypeMismatch { .. })
    ));
}

#[test]
fn test_instruction_key_segments() {
    let instr = PolicyInstruction::new(
        "a\\b\\c",
        "",
        PolicyRegType::Binary,
        PolicyData::Binary(vec![]),
    )
    .unwrap();
    assert_eq!(instr.key_segments().collect::<Vec<_>>(), ["a", "b", "c"]);
}

#[test]
fn test_document_shapes() {
    let empty = PolicyFile::empty();
    assert!(empty.body.is_none());

    let header_only = PolicyFile::with_instructions(vec![]);
    assert_eq!(header_only.body.as_ref().map(|b| b.len()), Some(0));

    // The empty document and the header-only document are distinct.
    assert_ne!(empty, header_only);
}

#[test]
fn test_document_equality_is_structural() {
    let make = || {
        PolicyFile::with_instructions(vec![PolicyInstruction::new(
            "K",
            "V",
            PolicyRegType::DwordBigEndian,
            PolicyData::Dword(9),
        )
        .unwrap()])
    };
    assert_eq!(make(), make());

    let mut other = make();
    other.body.as_mut().unwrap().instructions[0].data = PolicyData::Dword(10);
    assert_ne!(make(), other);
}

#[test]
fn test_error_helpers() {
    let err = PolicyError::invalid_signature(*b"PReg", *b"XXXX");
    assert!(matches!(err, PolicyError::InvalidSignature { .. }));

    let err = PolicyError::unexpected_delimiter('[', 0x0041, 8);
    assert!(matches!(
        err,
        PolicyError::UnexpectedDelimiter { expected: '[', .. }
    ));

    let err = PolicyError::invalid_data_size("REG_DWORD_LITTLE_ENDIAN", 3);
    assert!(matches!(err, PolicyError::InvalidDataSize { size: 3, .. }));
}

#[cfg(feature = "serde")]
mod serde_tests {
    use super::*;

    #[test]
    fn test_policy_file_json_round_trip() {
        let file = PolicyFile::with_instructions(vec![
            PolicyInstruction::new(
                "Software\\Test",
                "Name",
                PolicyRegType::MultiSz,
                PolicyData::MultiString(vec!["a".into(), "b".into()]),
            )
            .unwrap(),
            PolicyInstruction::new(
                "Software\\Test",
                "Raw",
                PolicyRegType::Binary,
                PolicyData::Binary(vec![1, 2, 3]),
            )
            .unwrap(),
        ]);

        let json = serde_json::to_string_pretty(&file).unwrap();
        let back: PolicyFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, file);
    }
}
