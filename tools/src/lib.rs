//! Inspection and sample-generation tools for the awd block container.
//!
//! - Summarize file structure and block sizes without decoding bodies
//! - Decode a whole file into structured JSON
//! - Build a small sample scene to exercise the writer
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what a writer produced.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use awd::{read_file, read_frames, BlockRegistry, FileHeader, Limits};
use block::{
    share, AttrValue, BlockLink, BlockType, Container, DecodedBody, Payload, Transform,
    UvAnimation, IDENTITY,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Structural summary of a file.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub header: HeaderSummary,
    pub blocks: Vec<BlockSummary>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HeaderSummary {
    pub version: (u8, u8),
    pub wide_floats: bool,
    pub compression: u8,
    pub body_len: u32,
}

impl From<&FileHeader> for HeaderSummary {
    fn from(header: &FileHeader) -> Self {
        Self {
            version: (header.major, header.minor),
            wide_floats: header.flags.wide_floats(),
            compression: header.compression,
            body_len: header.body_len,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockSummary {
    pub id: u32,
    pub block_type: String,
    pub flags: u8,
    pub body_len: u32,
}

/// Summarizes `bytes` without decoding block bodies, so it works for any
/// compression scheme.
pub fn inspect_file(bytes: &[u8], limits: &Limits) -> Result<InspectReport> {
    let (header, frames) = read_frames(bytes, limits).context("read block frames")?;
    let blocks = frames
        .iter()
        .map(|frame| BlockSummary {
            id: frame.header.id.raw(),
            block_type: type_label(frame.header.type_tag),
            flags: frame.header.flags.raw(),
            body_len: frame.header.body_len,
        })
        .collect();
    Ok(InspectReport {
        header: HeaderSummary::from(&header),
        blocks,
    })
}

/// A fully decoded file in serializable form.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeOutput {
    pub header: HeaderSummary,
    pub blocks: Vec<DecodedBlockOutput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecodedBlockOutput {
    pub id: u32,
    pub block_type: String,
    pub name: Option<String>,
    pub attributes: Vec<AttributeOutput>,
    pub payload: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeOutput {
    pub namespace: u8,
    pub id: u16,
    pub value: Value,
}

/// Decodes every block of `bytes`.
pub fn decode_file_json(bytes: &[u8], limits: &Limits) -> Result<DecodeOutput> {
    let file = read_file(bytes, limits).context("decode file")?;
    let blocks = file
        .blocks
        .iter()
        .map(|block| DecodedBlockOutput {
            id: block.id().raw(),
            block_type: type_label(block.header.type_tag),
            name: block.name().map(str::to_owned),
            attributes: attributes_json(&block.body),
            payload: payload_json(&block.body.payload),
        })
        .collect();
    Ok(DecodeOutput {
        header: HeaderSummary::from(&file.header),
        blocks,
    })
}

/// Renders a decode result for terminals.
pub fn format_decode_pretty(output: &DecodeOutput) -> String {
    let mut out = String::new();
    let header = output.header;
    let _ = writeln!(
        out,
        "version: {}.{} wide_floats: {} compression: {} body_len: {} bytes",
        header.version.0, header.version.1, header.wide_floats, header.compression, header.body_len
    );
    for block in &output.blocks {
        let name = block.name.as_deref().unwrap_or("<unnamed>");
        let _ = writeln!(out, "block {} {} {name}", block.id, block.block_type);
        for attr in &block.attributes {
            let _ = writeln!(out, "  attr {}:{} = {}", attr.namespace, attr.id, attr.value);
        }
        let _ = writeln!(out, "  payload: {}", block.payload);
    }
    out
}

/// Builds a small scene: a root container, a child container with
/// attributes, and a UV animation scrolling along `u` over `frames` frames.
pub fn sample_scene(frames: u16) -> Result<BlockRegistry> {
    let root = share(Container::new("root")?);
    let child = share(Container::new("water_plane")?);
    {
        let mut child = child.borrow_mut();
        child.set_parent(Some(BlockLink::to(&root)))?;
        child.add_attribute(1, 1, AttrValue::Float(0.5))?;
        child.add_attribute(1, 2, AttrValue::String("water".into()))?;
    }

    let anim = share(UvAnimation::new("UVANIM_water", frames)?);
    for frame in 0..frames {
        let mut transform: Transform = IDENTITY;
        transform[3] = f64::from(frame) / f64::from(frames);
        anim.borrow_mut().append_frame(&transform)?;
    }
    child
        .borrow_mut()
        .add_attribute(1, 3, AttrValue::Link(BlockLink::to(&anim)))?;

    let mut registry = BlockRegistry::new();
    registry.register(&root)?;
    registry.register(&child)?;
    registry.register(&anim)?;
    Ok(registry)
}

fn type_label(tag: u8) -> String {
    match BlockType::parse(tag) {
        Some(BlockType::Container) => "container".to_owned(),
        Some(BlockType::UvAnimation) => "uv_animation".to_owned(),
        _ => format!("unknown({tag})"),
    }
}

fn attributes_json(body: &DecodedBody) -> Vec<AttributeOutput> {
    body.attributes
        .iter()
        .map(|entry| AttributeOutput {
            namespace: entry.namespace,
            id: entry.id,
            value: value_json(&entry.value),
        })
        .collect()
}

fn value_json(value: &AttrValue) -> Value {
    match value {
        AttrValue::Bool(v) => json!(v),
        AttrValue::Int8(v) => json!(v),
        AttrValue::Int16(v) => json!(v),
        AttrValue::Int32(v) => json!(v),
        AttrValue::UInt8(v) => json!(v),
        AttrValue::UInt16(v) => json!(v),
        AttrValue::UInt32(v) => json!(v),
        AttrValue::Float(v) => json!(v),
        AttrValue::String(v) => json!(v),
        AttrValue::FloatArray(v) => json!(v),
        AttrValue::Id(id) => json!({ "block": id.raw() }),
        AttrValue::Link(link) => json!({ "link_alive": link.is_alive() }),
    }
}

fn payload_json(payload: &Payload) -> Value {
    match payload {
        Payload::Container { parent, transform } => json!({
            "parent": parent.raw(),
            "transform": transform.as_slice(),
        }),
        Payload::UvAnimation { frames } => json!({
            "frame_count": frames.len(),
            "frames": frames.iter().map(|t| t.as_slice()).collect::<Vec<_>>(),
        }),
        Payload::Opaque(bytes) => json!({ "opaque_len": bytes.len() }),
    }
}
