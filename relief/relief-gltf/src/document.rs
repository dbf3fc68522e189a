//! Typed glTF 2.0 JSON document, limited to what a single-primitive
//! relief mesh needs.

use serde::Serialize;

fn is_false(value: &bool) -> bool {
    !value
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document {
    pub asset: Asset,
    pub scene: usize,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Buffer>,
}

#[derive(Serialize)]
pub(crate) struct Asset {
    pub version: &'static str,
    pub generator: &'static str,
}

#[derive(Serialize)]
pub(crate) struct Scene {
    pub nodes: Vec<usize>,
}

#[derive(Serialize)]
pub(crate) struct Node {
    pub mesh: usize,
}

#[derive(Serialize)]
pub(crate) struct Mesh {
    pub primitives: Vec<Primitive>,
}

#[derive(Serialize)]
pub(crate) struct Primitive {
    pub attributes: Attributes,
    pub indices: usize,
    pub mode: u32,
}

#[derive(Serialize)]
pub(crate) struct Attributes {
    #[serde(rename = "POSITION")]
    pub position: usize,

    #[serde(rename = "NORMAL", skip_serializing_if = "Option::is_none")]
    pub normal: Option<usize>,

    #[serde(rename = "COLOR_0", skip_serializing_if = "Option::is_none")]
    pub color0: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Accessor {
    pub buffer_view: usize,
    pub component_type: u32,
    pub count: usize,

    #[serde(rename = "type")]
    pub accessor_type: &'static str,

    #[serde(skip_serializing_if = "is_false")]
    pub normalized: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<[f32; 3]>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<[f32; 3]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub target: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Buffer {
    pub byte_length: usize,
}
