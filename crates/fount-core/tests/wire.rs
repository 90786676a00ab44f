use fount_core::{
    ConfigFault, EncodingUnit, FountError, StreamHeader, Symbol, WireFault, FOUNT_MAGIC,
    MAX_INTERMEDIATE,
};
use proptest::prelude::*;

#[test]
fn test_unit_layout_is_big_endian() {
    let unit = EncodingUnit::new(0x0102_0304, vec![7, 1], Symbol::from(vec![0xAA, 0xBB])).unwrap();
    let mut buf = Vec::new();
    unit.write_to(&mut buf);

    assert_eq!(
        buf,
        vec![
            0x01, 0x02, 0x03, 0x04, // id
            0x00, 0x02, // degree
            0x00, 0x00, 0x00, 0x01, // neighbor 1
            0x00, 0x00, 0x00, 0x07, // neighbor 7
            0xAA, 0xBB, // value
        ]
    );
    assert_eq!(buf.len(), unit.encoded_len());
}

#[test]
fn test_stream_of_units_parses_back_in_order() {
    let units = vec![
        EncodingUnit::new(0, vec![0], Symbol::from(vec![1, 2, 3])).unwrap(),
        EncodingUnit::new(1, vec![0, 2, 4], Symbol::from(vec![4, 5, 6])).unwrap(),
    ];
    let mut buf = Vec::new();
    for u in &units {
        u.write_to(&mut buf);
    }

    let mut at = 0;
    let mut parsed = Vec::new();
    while at < buf.len() {
        let (unit, used) = EncodingUnit::read_from(&buf[at..], 3).unwrap();
        parsed.push(unit);
        at += used;
    }
    assert_eq!(parsed, units);
}

#[test]
fn test_malformed_units_are_rejected() {
    // Truncated value.
    let unit = EncodingUnit::new(5, vec![3], Symbol::from(vec![9, 9, 9, 9])).unwrap();
    let mut buf = Vec::new();
    unit.write_to(&mut buf);
    assert_eq!(
        EncodingUnit::read_from(&buf[..buf.len() - 1], 4),
        Err(FountError::WireFormat(WireFault::Truncated { needed: 14, got: 13 }))
    );

    // Duplicate neighbor on the wire.
    let raw = [0, 0, 0, 1, 0, 2, 0, 0, 0, 3, 0, 0, 0, 3, 0xFF];
    assert_eq!(
        EncodingUnit::read_from(&raw, 1),
        Err(FountError::InvalidConfig(ConfigFault::DuplicateNeighbor { unit: 1, index: 3 }))
    );

    // Degree zero.
    let raw = [0, 0, 0, 1, 0, 0, 0xFF];
    assert!(matches!(
        EncodingUnit::read_from(&raw, 1),
        Err(FountError::InvalidConfig(ConfigFault::Degree { degree: 0, .. }))
    ));
}

#[test]
fn test_header_roundtrip_and_magic() {
    let header = StreamHeader {
        k: 15,
        p: 3,
        symbol_len: 64,
        min_degree: 3,
        max_degree: 5,
        seed: 0xDEAD_BEEF_0000_0001,
        count: 40,
    };
    let mut buf = [0u8; StreamHeader::SIZE];
    header.to_bytes(&mut buf).unwrap();
    assert_eq!(&buf[0..4], &FOUNT_MAGIC.to_be_bytes());
    assert_eq!(StreamHeader::from_bytes(&buf).unwrap(), header);

    buf[0] = b'X';
    assert!(matches!(
        StreamHeader::from_bytes(&buf),
        Err(FountError::WireFormat(WireFault::BadMagic(_)))
    ));

    let mut short = [0u8; 8];
    assert!(header.to_bytes(&mut short).is_err());
}

#[test]
fn test_header_bounds_what_a_decoder_allocates() {
    let huge = StreamHeader {
        k: u32::MAX,
        p: 0,
        symbol_len: 1,
        min_degree: 3,
        max_degree: 5,
        seed: 0,
        count: 0,
    };
    let mut buf = [0u8; StreamHeader::SIZE];
    huge.to_bytes(&mut buf).unwrap();
    assert_eq!(
        StreamHeader::from_bytes(&buf),
        Err(FountError::InvalidConfig(ConfigFault::Overflow {
            field: "k + p",
            value: u32::MAX as usize,
        }))
    );

    // k alone fits, k + p does not.
    let over = StreamHeader { k: MAX_INTERMEDIATE as u32, p: 1, ..huge };
    over.to_bytes(&mut buf).unwrap();
    assert!(matches!(
        StreamHeader::from_bytes(&buf),
        Err(FountError::InvalidConfig(ConfigFault::Overflow { .. }))
    ));

    let at_cap = StreamHeader { k: MAX_INTERMEDIATE as u32 - 3, p: 3, ..huge };
    at_cap.to_bytes(&mut buf).unwrap();
    assert_eq!(StreamHeader::from_bytes(&buf), Ok(at_cap));

    let empty = StreamHeader { k: 0, ..huge };
    assert_eq!(empty.validate(), Err(FountError::InvalidConfig(ConfigFault::NoSources)));
    let hollow = StreamHeader { k: 4, symbol_len: 0, ..huge };
    assert_eq!(hollow.validate(), Err(FountError::InvalidConfig(ConfigFault::EmptySymbol)));
}

fn arb_unit() -> impl Strategy<Value = EncodingUnit> {
    (
        any::<u32>(),
        prop::collection::btree_set(0u32..10_000, 1..40),
        prop::collection::vec(any::<u8>(), 1..64),
    )
        .prop_map(|(id, neighbors, value)| {
            EncodingUnit::new(id, neighbors.into_iter().collect(), Symbol::from(value)).unwrap()
        })
}

proptest! {
    #[test]
    fn prop_any_valid_unit_survives_the_wire(unit in arb_unit()) {
        let mut buf = Vec::new();
        unit.write_to(&mut buf);
        let (parsed, used) = EncodingUnit::read_from(&buf, unit.value().len()).unwrap();
        prop_assert_eq!(used, buf.len());
        prop_assert_eq!(parsed, unit);
    }
}
