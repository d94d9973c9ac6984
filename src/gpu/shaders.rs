//! WGSL sources for the point and line pipelines.
//!
//! Both share one uniform block per renderable, laid out to match
//! [`RenderUniforms`](super::RenderUniforms).

/// Camera-facing round point sprites, one instance per position.
pub const POINT_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    color: vec4<f32>,
    proj_scale: vec2<f32>,
    point_size: f32,
    _pad: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    var clip = uniforms.view_proj * uniforms.model * vec4<f32>(position, 1.0);
    // Offset in view space, so sprites shrink with distance
    let offset = corner * uniforms.point_size * 0.5 * uniforms.proj_scale;
    clip = vec4<f32>(clip.xy + offset, clip.zw);

    var out: VertexOutput;
    out.clip_position = clip;
    out.uv = corner;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if dot(in.uv, in.uv) > 1.0 {
        discard;
    }
    return uniforms.color;
}
"#;

/// Plain line segments, two vertices per segment.
pub const LINE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    color: vec4<f32>,
    proj_scale: vec2<f32>,
    point_size: f32,
    _pad: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return uniforms.view_proj * uniforms.model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return uniforms.color;
}
"#;
