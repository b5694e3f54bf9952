/// Island surface shader.
///
/// Geometry arrives in world space. Lighting is Cook-Torrance (GGX
/// distribution, Smith-Schlick visibility, Schlick Fresnel) for the single
/// point light, attenuated by a 3x3 PCF lookup into the light's shadow map,
/// plus an image-based ambient term read from the equirectangular environment.
/// Output is ACES filmic tone mapped linear colour; the sRGB surface does the
/// final encode.
pub const PBR_SHADER_SOURCE: &str = r#"
const PI: f32 = 3.14159265359;

struct CameraUniform {
    view_proj: mat4x4<f32>,
    position: vec4<f32>,
};

struct LightUniform {
    // xyz = world position, w = range (0 disables the cutoff)
    position_range: vec4<f32>,
    // rgb = linear colour, w = intensity
    color_intensity: vec4<f32>,
    // x = exposure
    params: vec4<f32>,
};

struct MaterialUniform {
    base_color: vec4<f32>,
    // roughness, metalness, env intensity, flat shading flag
    surface: vec4<f32>,
    // transmission, ior, thickness, data map flag
    transmission: vec4<f32>,
    // x = receives shadows
    shadow: vec4<f32>,
};

struct ShadowUniform {
    view_proj: mat4x4<f32>,
    // x = enabled, y = texel size in UV
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(1) @binding(0) var<uniform> light: LightUniform;
@group(1) @binding(1) var<uniform> shadow: ShadowUniform;
@group(1) @binding(2) var shadow_map: texture_depth_2d;
@group(1) @binding(3) var shadow_sampler: sampler_comparison;
@group(2) @binding(0) var<uniform> material: MaterialUniform;
@group(2) @binding(1) var base_map: texture_2d<f32>;
@group(2) @binding(2) var data_map: texture_2d<f32>;
@group(2) @binding(3) var material_sampler: sampler;
@group(3) @binding(0) var env_map: texture_2d<f32>;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.world_position = in.position;
    out.normal = in.normal;
    out.uv = in.uv;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    return out;
}

fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    return a2 / (PI * d * d + 1e-7);
}

fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = r * r / 8.0;
    let gv = n_dot_v / (n_dot_v * (1.0 - k) + k);
    let gl = n_dot_l / (n_dot_l * (1.0 - k) + k);
    return gv * gl;
}

fn fresnel_schlick(cos_theta: f32, f0: vec3<f32>) -> vec3<f32> {
    return f0 + (vec3<f32>(1.0) - f0) * pow(clamp(1.0 - cos_theta, 0.0, 1.0), 5.0);
}

// Inverse square, smoothly windowed to zero at `range`.
fn distance_falloff(dist: f32, range: f32) -> f32 {
    let inv_square = 1.0 / max(dist * dist, 0.01);
    if range <= 0.0 {
        return inv_square;
    }
    let ratio = dist / range;
    let window = clamp(1.0 - ratio * ratio * ratio * ratio, 0.0, 1.0);
    return inv_square * window * window;
}

// 1 = fully lit. Points outside the light frustum are lit.
fn shadow_visibility(world_position: vec3<f32>) -> f32 {
    let clip = shadow.view_proj * vec4<f32>(world_position, 1.0);
    if shadow.params.x < 0.5 || clip.w <= 0.0 {
        return 1.0;
    }
    let ndc = clip.xyz / clip.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5);
    if any(uv < vec2<f32>(0.0)) || any(uv > vec2<f32>(1.0)) || ndc.z <= 0.0 || ndc.z > 1.0 {
        return 1.0;
    }
    var lit = 0.0;
    for (var y = -1; y <= 1; y++) {
        for (var x = -1; x <= 1; x++) {
            let offset = vec2<f32>(f32(x), f32(y)) * shadow.params.y;
            lit += textureSampleCompareLevel(shadow_map, shadow_sampler, uv + offset, ndc.z);
        }
    }
    return lit / 9.0;
}

fn sample_environment(direction: vec3<f32>) -> vec3<f32> {
    let size = vec2<i32>(textureDimensions(env_map));
    let d = normalize(direction);
    let u = atan2(d.z, d.x) / (2.0 * PI) + 0.5;
    let v = acos(clamp(d.y, -1.0, 1.0)) / PI;
    let texel = clamp(
        vec2<i32>(vec2<f32>(u, v) * vec2<f32>(size)),
        vec2<i32>(0),
        size - vec2<i32>(1),
    );
    return textureLoad(env_map, texel, 0).rgb;
}

// Five-tap cone around `n`, a cheap stand-in for prefiltered irradiance.
fn diffuse_environment(n: vec3<f32>) -> vec3<f32> {
    let helper = select(vec3<f32>(0.0, 1.0, 0.0), vec3<f32>(1.0, 0.0, 0.0), abs(n.y) > 0.9);
    let t = normalize(cross(helper, n));
    let b = cross(n, t);
    var sum = sample_environment(n);
    sum += sample_environment(n + 0.6 * t);
    sum += sample_environment(n - 0.6 * t);
    sum += sample_environment(n + 0.6 * b);
    sum += sample_environment(n - 0.6 * b);
    return sum / 5.0;
}

fn rrt_and_odt_fit(v: vec3<f32>) -> vec3<f32> {
    let a = v * (v + 0.0245786) - 0.000090537;
    let b = v * (0.983729 * v + 0.4329510) + 0.238081;
    return a / b;
}

fn aces_filmic(color: vec3<f32>, exposure: f32) -> vec3<f32> {
    let aces_input = mat3x3<f32>(
        vec3<f32>(0.59719, 0.07600, 0.02840),
        vec3<f32>(0.35458, 0.90834, 0.13383),
        vec3<f32>(0.04823, 0.01566, 0.83777),
    );
    let aces_output = mat3x3<f32>(
        vec3<f32>(1.60475, -0.10208, -0.00327),
        vec3<f32>(-0.53108, 1.10813, -0.07276),
        vec3<f32>(-0.07367, -0.00605, 1.07602),
    );
    var c = color * exposure / 0.6;
    c = aces_input * c;
    c = rrt_and_odt_fit(c);
    c = aces_output * c;
    return clamp(c, vec3<f32>(0.0), vec3<f32>(1.0));
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front_facing: bool) -> @location(0) vec4<f32> {
    // Sampling and derivatives stay in uniform control flow.
    let base_sample = textureSample(base_map, material_sampler, in.uv);
    let data_sample = textureSample(data_map, material_sampler, in.uv);
    let dx = dpdx(in.world_position);
    let dy = dpdy(in.world_position);

    var n = normalize(in.normal);
    var flat_n = normalize(cross(dx, dy));
    if dot(flat_n, n) < 0.0 {
        flat_n = -flat_n;
    }
    if material.surface.w > 0.5 {
        n = flat_n;
    }
    if !front_facing {
        n = -n;
    }

    let albedo = material.base_color.rgb * base_sample.rgb;
    let use_data = material.transmission.w > 0.5;
    let roughness = clamp(material.surface.x * select(1.0, data_sample.g, use_data), 0.04, 1.0);
    let metalness = clamp(material.surface.y * select(1.0, data_sample.b, use_data), 0.0, 1.0);
    let env_intensity = material.surface.z;
    let transmission = clamp(material.transmission.x, 0.0, 1.0);
    let ior = max(material.transmission.y, 1.0);

    let v = normalize(camera.position.xyz - in.world_position);
    let n_dot_v = max(dot(n, v), 1e-4);
    let r0 = (ior - 1.0) / (ior + 1.0);
    let f0 = mix(vec3<f32>(r0 * r0), albedo, metalness);

    let to_light = light.position_range.xyz - in.world_position;
    let light_distance = length(to_light);
    let l = to_light / max(light_distance, 1e-4);
    let h = normalize(v + l);
    let n_dot_l = max(dot(n, l), 0.0);
    let n_dot_h = max(dot(n, h), 0.0);
    let h_dot_v = max(dot(h, v), 0.0);

    let radiance = light.color_intensity.rgb * light.color_intensity.w
        * distance_falloff(light_distance, light.position_range.w);
    let f = fresnel_schlick(h_dot_v, f0);
    let d = distribution_ggx(n_dot_h, roughness);
    let g = geometry_smith(n_dot_v, n_dot_l, roughness);
    let specular = d * g * f / (4.0 * n_dot_v * max(n_dot_l, 1e-4));
    let kd = (vec3<f32>(1.0) - f) * (1.0 - metalness) * (1.0 - transmission);
    var visibility = 1.0;
    if material.shadow.x > 0.5 {
        visibility = shadow_visibility(in.world_position);
    }
    let direct = (kd * albedo / PI + specular) * radiance * n_dot_l * visibility;

    let irradiance = diffuse_environment(n);
    let f_ambient = fresnel_schlick(n_dot_v, f0);
    let diffuse_ambient = irradiance * albedo * (1.0 - metalness) * (1.0 - transmission)
        * (vec3<f32>(1.0) - f_ambient);
    let specular_ambient = sample_environment(reflect(-v, n)) * f_ambient
        * (1.0 - 0.75 * roughness);
    var color = direct + (diffuse_ambient + specular_ambient) * env_intensity;

    // Transmissive surfaces let the scene behind show through, tinted by albedo.
    let transmitted = irradiance * albedo * transmission * env_intensity;
    color += transmitted;
    let alpha = mix(1.0, 0.55 + 0.45 * f_ambient.g, transmission);

    return vec4<f32>(aces_filmic(color, light.params.x), alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_declares_every_binding() {
        for binding in [
            "@group(0) @binding(0) var<uniform> camera",
            "@group(1) @binding(0) var<uniform> light",
            "@group(1) @binding(1) var<uniform> shadow",
            "@group(1) @binding(2) var shadow_map: texture_depth_2d",
            "@group(1) @binding(3) var shadow_sampler: sampler_comparison",
            "@group(2) @binding(0) var<uniform> material",
            "@group(2) @binding(1) var base_map",
            "@group(2) @binding(2) var data_map",
            "@group(2) @binding(3) var material_sampler",
            "@group(3) @binding(0) var env_map",
        ] {
            assert!(PBR_SHADER_SOURCE.contains(binding), "missing {binding}");
        }
    }

    #[test]
    fn test_shader_compiles() {
        let Some((device, _queue)) = crate::test_support::create_test_device_queue() else {
            return;
        };
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pbr-shader-test"),
            source: wgpu::ShaderSource::Wgsl(PBR_SHADER_SOURCE.into()),
        });
    }
}
