/// WGSL shader for the primitives: Blinn-Phong lit by a hemisphere fill and
/// one shadowed point light, then ACES filmic tone mapped.
pub const PHONG_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    // rgb = color, w = intensity
    sky: vec4<f32>,
    ground: vec4<f32>,
    light_color: vec4<f32>,
    // xyz = position, w = cutoff distance
    light_pos: vec4<f32>,
    // x = decay, y = exposure, z = receives shadow, w = shadow bias
    params: vec4<f32>,
    diffuse: vec4<f32>,
    emissive: vec4<f32>,
    // rgb = specular, w = shininess
    specular: vec4<f32>,
};

struct ShadowFaces {
    view_proj: array<mat4x4<f32>, 6>,
};

@group(0) @binding(0)
var<uniform> g: Globals;
@group(0) @binding(1)
var shadow_map: texture_depth_2d_array;
@group(0) @binding(2)
var shadow_sampler: sampler_comparison;
@group(0) @binding(3)
var<uniform> shadow: ShadowFaces;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

const RECIPROCAL_PI: f32 = 0.3183098861837907;

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = g.view_proj * vec4<f32>(vertex.position, 1.0);
    out.world_pos = vertex.position;
    out.world_normal = vertex.normal;
    return out;
}

fn distance_attenuation(light_distance: f32, cutoff: f32, decay: f32) -> f32 {
    var falloff = 1.0 / max(pow(light_distance, decay), 0.01);
    if (cutoff > 0.0) {
        let ratio = light_distance / cutoff;
        let window = clamp(1.0 - ratio * ratio * ratio * ratio, 0.0, 1.0);
        falloff = falloff * window * window;
    }
    return falloff;
}

// Layer order +X, -X, +Y, -Y, +Z, -Z.
fn shadow_face(d: vec3<f32>) -> i32 {
    let a = abs(d);
    if (a.x >= a.y && a.x >= a.z) {
        return select(1, 0, d.x > 0.0);
    }
    if (a.y >= a.z) {
        return select(3, 2, d.y > 0.0);
    }
    return select(5, 4, d.z > 0.0);
}

// Fraction of the point light reaching `world_pos`, 3x3 PCF.
fn shadow_visibility(world_pos: vec3<f32>, n: vec3<f32>) -> f32 {
    if (g.params.z < 0.5) {
        return 1.0;
    }
    let biased = world_pos + n * 0.01;
    let face = shadow_face(biased - g.light_pos.xyz);
    let clip = shadow.view_proj[face] * vec4<f32>(biased, 1.0);
    if (clip.w <= 0.0) {
        return 1.0;
    }
    let ndc = clip.xyz / clip.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5);
    let texel = 1.0 / f32(textureDimensions(shadow_map).x);
    let depth_ref = ndc.z - g.params.w;
    var lit = 0.0;
    for (var y = -1; y <= 1; y = y + 1) {
        for (var x = -1; x <= 1; x = x + 1) {
            let offset = vec2<f32>(f32(x), f32(y)) * texel;
            lit = lit + textureSampleCompareLevel(shadow_map, shadow_sampler, uv + offset, face, depth_ref);
        }
    }
    return lit / 9.0;
}

fn f_schlick(f0: vec3<f32>, dot_vh: f32) -> vec3<f32> {
    let fresnel = pow(1.0 - dot_vh, 5.0);
    return f0 * (1.0 - fresnel) + vec3<f32>(fresnel);
}

fn rrt_and_odt_fit(v: vec3<f32>) -> vec3<f32> {
    let a = v * (v + 0.0245786) - 0.000090537;
    let b = v * (0.983729 * v + 0.4329510) + 0.238081;
    return a / b;
}

fn aces_filmic(color: vec3<f32>, exposure: f32) -> vec3<f32> {
    let input_mat = mat3x3<f32>(
        vec3<f32>(0.59719, 0.07600, 0.02840),
        vec3<f32>(0.35458, 0.90834, 0.13383),
        vec3<f32>(0.04823, 0.01566, 0.83777),
    );
    let output_mat = mat3x3<f32>(
        vec3<f32>(1.60475, -0.10208, -0.00327),
        vec3<f32>(-0.53108, 1.10813, -0.07276),
        vec3<f32>(-0.07367, -0.00605, 1.07602),
    );
    var c = color * exposure / 0.6;
    c = input_mat * c;
    c = rrt_and_odt_fit(c);
    c = output_mat * c;
    return clamp(c, vec3<f32>(0.0), vec3<f32>(1.0));
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var n = normalize(in.world_normal);
    if (!front) {
        n = -n;
    }
    let v = normalize(g.camera_pos.xyz - in.world_pos);
    let diffuse_color = g.diffuse.rgb;

    // Hemisphere fill.
    let hemi_weight = 0.5 * n.y + 0.5;
    let hemi = mix(g.ground.rgb, g.sky.rgb, hemi_weight) * g.sky.w;
    let indirect_diffuse = hemi * RECIPROCAL_PI * diffuse_color;

    // Point light.
    let to_light = g.light_pos.xyz - in.world_pos;
    let light_distance = length(to_light);
    let l = to_light / max(light_distance, 1e-5);
    let attenuation = distance_attenuation(light_distance, g.light_pos.w, g.params.x);
    let visibility = shadow_visibility(in.world_pos, n);
    let light = g.light_color.rgb * g.light_color.w * attenuation * visibility;
    let dot_nl = clamp(dot(n, l), 0.0, 1.0);
    let irradiance = dot_nl * light;
    let direct_diffuse = irradiance * RECIPROCAL_PI * diffuse_color;

    // Blinn-Phong specular.
    let h = normalize(l + v);
    let dot_nh = clamp(dot(n, h), 0.0, 1.0);
    let dot_vh = clamp(dot(v, h), 0.0, 1.0);
    let shininess = g.specular.w;
    let f = f_schlick(g.specular.rgb, dot_vh);
    let d = RECIPROCAL_PI * (shininess * 0.5 + 1.0) * pow(max(dot_nh, 1e-4), shininess);
    let direct_specular = irradiance * f * 0.25 * d;

    let outgoing = direct_diffuse + indirect_diffuse + direct_specular + g.emissive.rgb;
    return vec4<f32>(aces_filmic(outgoing, g.params.y), 1.0);
}
"#;

/// Depth-only pass rendering the caster into one shadow layer.
pub const SHADOW_SHADER: &str = r#"
@group(0) @binding(0)
var<uniform> face_view_proj: mat4x4<f32>;

@vertex
fn vs_shadow(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return face_view_proj * vec4<f32>(position, 1.0);
}
"#;
