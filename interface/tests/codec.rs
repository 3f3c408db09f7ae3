use bootcamp_interface::{
    codec::{
        FieldKind,
        FieldValue,
        Schema,
    },
    error::EncodingError,
    instructions::{
        authorized_counter::COUNTER_SCHEMA,
        echo::ECHO_SCHEMA,
        native_token::TOKEN_SCHEMA,
        runtime_limitations::RUNTIME_SCHEMA,
        tracker::TRACKER_SCHEMA,
    },
};
use rand::{
    rngs::StdRng,
    Rng,
    SeedableRng,
};
use solana_sdk::pubkey::Pubkey;

const SCHEMAS: [&Schema; 5] = [
    &COUNTER_SCHEMA,
    &TRACKER_SCHEMA,
    &RUNTIME_SCHEMA,
    &ECHO_SCHEMA,
    &TOKEN_SCHEMA,
];

fn random_value(rng: &mut StdRng, kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::U8 => rng.gen::<u8>().into(),
        FieldKind::U32 => rng.gen::<u32>().into(),
        FieldKind::U64 => rng.gen::<u64>().into(),
        FieldKind::Address => Pubkey::new_from_array(rng.gen()).into(),
        FieldKind::Bytes => {
            let len = rng.gen_range(0..64);
            (0..len).map(|_| rng.gen::<u8>()).collect::<Vec<u8>>().into()
        }
    }
}

#[test]
fn decode_inverts_encode_for_every_program() {
    let mut rng = StdRng::seed_from_u64(0xB007);
    for _ in 0..500 {
        let schema = SCHEMAS[rng.gen_range(0..SCHEMAS.len())];
        let layout = &schema.layouts[rng.gen_range(0..schema.layouts.len())];
        let fields: Vec<FieldValue> = layout
            .fields
            .iter()
            .map(|kind| random_value(&mut rng, *kind))
            .collect();

        let encoded = schema.encode(layout.tag, &fields).unwrap();
        assert_eq!(encoded[0], layout.tag);
        assert_eq!(schema.decode(&encoded).unwrap(), (layout.tag, fields));
    }
}

#[test]
fn every_strict_prefix_fails_to_decode() {
    let mut rng = StdRng::seed_from_u64(7);
    for schema in SCHEMAS {
        for layout in schema.layouts {
            let fields: Vec<FieldValue> = layout
                .fields
                .iter()
                .map(|kind| random_value(&mut rng, *kind))
                .collect();
            let encoded = schema.encode(layout.tag, &fields).unwrap();
            for len in 0..encoded.len() {
                assert_eq!(
                    schema.decode(&encoded[..len]),
                    Err(EncodingError::InsufficientByteLength),
                    "{} {} truncated to {len}",
                    schema.program,
                    layout.name,
                );
            }
        }
    }
}

#[test]
fn one_extra_byte_is_trailing() {
    let mut rng = StdRng::seed_from_u64(11);
    for schema in SCHEMAS {
        for layout in schema.layouts {
            let fields: Vec<FieldValue> = layout
                .fields
                .iter()
                .map(|kind| random_value(&mut rng, *kind))
                .collect();
            let mut encoded = schema.encode(layout.tag, &fields).unwrap();
            encoded.push(rng.gen());
            assert_eq!(schema.decode(&encoded), Err(EncodingError::TrailingBytes));
        }
    }
}
