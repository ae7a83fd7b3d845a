/// WGSL program for the cubes: sinusoidal displacement along the normal in
/// the vertex stage, Lambert shading with tint in the fragment stage.
pub const CUBE_SHADER: &str = r#"
struct FrameUniforms {
    projection: mat4x4<f32>,
    tint: vec4<f32>,
    distortion: f32,
    distortion_speed: f32,
    light_intensity: f32,
    time: f32,
};

struct ObjectUniforms {
    model_view: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

@group(1) @binding(0)
var<uniform> object: ObjectUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) eye_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let phase = frame.time * frame.distortion_speed;
    let wave = sin(vertex.position.y * 2.0 + phase * 3.0)
        * cos(vertex.position.z * 2.0 + phase * 2.0);
    let displaced = vertex.position + vertex.normal * wave * frame.distortion * 0.25;

    var out: VertexOutput;
    out.clip_position = frame.projection * object.model_view * vec4<f32>(displaced, 1.0);
    out.eye_normal = (object.normal_matrix * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(0.85, 0.8, 0.75));
    let ambient = 0.3;
    let diffuse = max(dot(normalize(in.eye_normal), light_dir), 0.0);
    let lighting = ambient + diffuse * frame.light_intensity;
    let base = mix(in.color.rgb, frame.tint.rgb, 0.5);
    return vec4<f32>(base * lighting, in.color.a);
}
"#;
