//! WGSL sources for the render pipelines.

/// Particle dots and connection lines.
///
/// Both draw instanced quads (six vertices each) in pixel space and share one
/// uniform block. Pixel coordinates have their origin at the top-left corner.
pub const PARTICLE_SHADER: &str = r#"
struct Uniforms {
    viewport: vec2<f32>,
    link_width: f32,
    _pad: f32,
    dot_color: vec4<f32>,
    link_color: vec4<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = vec2<f32>(
        p.x / uniforms.viewport.x * 2.0 - 1.0,
        1.0 - p.y / uniforms.viewport.y * 2.0
    );
    return vec4<f32>(ndc, 0.0, 1.0);
}

fn quad_corner(index: u32) -> vec2<f32> {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    return corners[index];
}

struct DotOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) radius: f32,
};

@vertex
fn vs_dot(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
) -> DotOutput {
    // one extra pixel for the antialiased rim
    let extent = radius + 1.0;
    let offset = quad_corner(vertex_index) * extent;

    var out: DotOutput;
    out.clip_position = to_clip(center + offset);
    out.local = offset;
    out.radius = radius;
    return out;
}

@fragment
fn fs_dot(in: DotOutput) -> @location(0) vec4<f32> {
    let coverage = clamp(in.radius + 0.5 - length(in.local), 0.0, 1.0);
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(uniforms.dot_color.rgb, uniforms.dot_color.a * coverage);
}

struct LinkOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) coverage: f32,
};

@vertex
fn vs_link(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) p0: vec2<f32>,
    @location(1) p1: vec2<f32>,
) -> LinkOutput {
    let corner = quad_corner(vertex_index);
    let delta = p1 - p0;
    let len = length(delta);
    var dir = vec2<f32>(1.0, 0.0);
    if len > 0.0001 {
        dir = delta / len;
    }
    let normal = vec2<f32>(-dir.y, dir.x);

    // Strokes thinner than a pixel are rasterized one pixel wide and faded
    // by their width instead.
    let width = max(uniforms.link_width, 1.0);
    let along = select(p0, p1, corner.x > 0.0);

    var out: LinkOutput;
    out.clip_position = to_clip(along + normal * corner.y * width * 0.5);
    out.coverage = min(uniforms.link_width, 1.0);
    return out;
}

@fragment
fn fs_link(in: LinkOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(uniforms.link_color.rgb, uniforms.link_color.a * in.coverage);
}
"#;

/// Tesseract wireframe, drawn as a line list in world space.
pub const WIREFRAME_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return uniforms.view_proj * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return uniforms.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_particle_shader_valid() {
        validate_wgsl(PARTICLE_SHADER).expect("particle WGSL should be valid");
        for entry in ["vs_dot", "fs_dot", "vs_link", "fs_link"] {
            assert!(PARTICLE_SHADER.contains(&format!("fn {}(", entry)));
        }
    }

    #[test]
    fn test_wireframe_shader_valid() {
        validate_wgsl(WIREFRAME_SHADER).expect("wireframe WGSL should be valid");
    }
}
