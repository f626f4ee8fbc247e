use std::collections::HashMap;

use block::{
    decode_body, share, AttrValue, Block, BlockHeader, BlockId, BlockKey, BlockLink, BodyConfig,
    Container, EncodeContext, Payload, Transform, UvAnimation,
};
use proptest::prelude::*;
use stream::{ByteWriter, Codec, Deflate};

fn value_strategy() -> impl Strategy<Value = AttrValue> {
    prop_oneof![
        any::<bool>().prop_map(AttrValue::Bool),
        any::<i8>().prop_map(AttrValue::Int8),
        any::<i16>().prop_map(AttrValue::Int16),
        any::<i32>().prop_map(AttrValue::Int32),
        any::<u8>().prop_map(AttrValue::UInt8),
        any::<u16>().prop_map(AttrValue::UInt16),
        any::<u32>().prop_map(AttrValue::UInt32),
        (-1.0e3f32..1.0e3f32).prop_map(|v| AttrValue::Float(f64::from(v))),
        "[a-z_]{0,16}".prop_map(AttrValue::String),
        prop::collection::vec(-1.0e3f32..1.0e3f32, 0..8)
            .prop_map(|v| AttrValue::FloatArray(v.into_iter().map(f64::from).collect())),
        any::<u32>().prop_map(|id| AttrValue::Id(BlockId::new(id))),
    ]
}

fn transform_strategy() -> impl Strategy<Value = Transform> {
    prop::array::uniform16(-100.0f32..100.0f32).prop_map(|t| t.map(f64::from))
}

fn attributes_strategy() -> impl Strategy<Value = Vec<(u8, u16, AttrValue)>> {
    prop::collection::vec((any::<u8>(), any::<u16>(), value_strategy()), 0..6)
}

fn emitted(block: &dyn Block, ctx: &EncodeContext<'_>) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    block.write_body(&mut writer, ctx).unwrap();
    writer.finish()
}

proptest! {
    #[test]
    fn prop_container_length_matches_body(
        name in "[A-Za-z0-9_]{0,24}",
        attributes in attributes_strategy(),
        transform in transform_strategy(),
        wide in any::<bool>(),
        compressed in any::<bool>(),
    ) {
        let mut container = Container::new(name).unwrap();
        for (ns, id, value) in attributes {
            container.add_attribute(ns, id, value).unwrap();
        }
        container.set_transform(&transform).unwrap();

        let ids: HashMap<BlockKey, BlockId> = HashMap::new();
        let codec = Deflate::default();
        let ctx = EncodeContext::new(BodyConfig::new(wide, compressed), &ids).with_codec(&codec);

        let first = container.compute_body_length(&ctx).unwrap();
        let second = container.compute_body_length(&ctx).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(emitted(&container, &ctx).len(), first as usize);
    }

    #[test]
    fn prop_uv_animation_payload_size_and_order(
        frames in prop::collection::vec(transform_strategy(), 1..12),
        wide in any::<bool>(),
    ) {
        let count = u16::try_from(frames.len()).unwrap();
        let mut anim = UvAnimation::new("", count).unwrap();
        for frame in &frames {
            anim.append_frame(frame).unwrap();
        }

        let ids: HashMap<BlockKey, BlockId> = HashMap::new();
        let config = BodyConfig::new(wide, false);
        let ctx = EncodeContext::new(config, &ids);
        let width = if wide { 8 } else { 4 };
        let len = anim.compute_body_length(&ctx).unwrap() as usize;
        prop_assert_eq!(len, 2 + frames.len() * 16 * width);

        let body = emitted(&anim, &ctx);
        prop_assert_eq!(body.len(), len);

        let header = BlockHeader::new(BlockId::new(1), anim.block_type(), anim.flags(config), 0);
        let decoded = decode_body(&header, &body).unwrap();
        match decoded.payload {
            Payload::UvAnimation { frames: chain } => {
                let got: Vec<Transform> = chain.iter().copied().collect();
                prop_assert_eq!(got, frames);
            }
            other => prop_assert!(false, "unexpected payload {:?}", other),
        }
    }

    #[test]
    fn prop_compressed_body_inflates_to_raw_body(
        frames in prop::collection::vec(transform_strategy(), 1..8),
        wide in any::<bool>(),
    ) {
        let mut anim = UvAnimation::new("UVANIM", u16::try_from(frames.len()).unwrap()).unwrap();
        for frame in &frames {
            anim.append_frame(frame).unwrap();
        }
        let ids: HashMap<BlockKey, BlockId> = HashMap::new();
        let codec = Deflate::new(9);
        let raw_ctx = EncodeContext::new(BodyConfig::new(wide, false), &ids);
        let packed_ctx = EncodeContext::new(BodyConfig::new(wide, true), &ids).with_codec(&codec);

        let packed = emitted(&anim, &packed_ctx);
        prop_assert_eq!(packed.len(), anim.compute_body_length(&packed_ctx).unwrap() as usize);
        prop_assert_eq!(codec.decompress(&packed, usize::MAX).unwrap(), emitted(&anim, &raw_ctx));
    }
}

#[test]
fn linked_containers_length_matches_body() {
    let a = share(Container::new("a").unwrap());
    let b = share(Container::new("b").unwrap());
    a.borrow_mut().set_parent(Some(BlockLink::to(&b))).unwrap();
    b.borrow_mut().set_parent(Some(BlockLink::to(&a))).unwrap();
    a.borrow_mut()
        .add_attribute(0, 1, AttrValue::Link(BlockLink::to(&b)))
        .unwrap();

    let mut ids = HashMap::new();
    ids.insert(BlockKey::of(&a), BlockId::new(1));
    ids.insert(BlockKey::of(&b), BlockId::new(2));
    let ctx = EncodeContext::new(BodyConfig::new(true, false), &ids);

    for block in [&a, &b] {
        let block = block.borrow();
        let len = block.compute_body_length(&ctx).unwrap() as usize;
        assert_eq!(emitted(&*block, &ctx).len(), len);
    }
}
