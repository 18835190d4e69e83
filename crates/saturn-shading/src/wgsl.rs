/// WGSL functions shared by every element shader.
///
/// Prepended to each element's own source. Function names and constants match
/// the Rust functions in this crate one to one.
pub const SHADING_PRELUDE: &str = r#"
// ---- shading prelude ----

fn step_between(e0: f32, e1: f32, x: f32) -> f32 {
    let t = clamp((x - e0) / (e1 - e0), 0.0, 1.0);
    return t * t * (3.0 - 2.0 * t);
}

fn hash21(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(127.1, 311.7))) * 43758.5453);
}

fn cloud_hash(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(12.9898, 78.233))) * 43758.5453);
}

fn hash3(p: vec2<f32>) -> vec3<f32> {
    var p3 = fract(vec3<f32>(p.x, p.y, p.x) * vec3<f32>(443.8975, 397.2973, 491.1871));
    p3 = p3 + dot(p3, p3.yxz + 19.19);
    return fract((p3.xxy + p3.yzz) * p3.zyx);
}

fn hermite2(f: vec2<f32>) -> vec2<f32> {
    return f * f * (3.0 - 2.0 * f);
}

fn value_noise(p: vec2<f32>) -> f32 {
    let i = floor(p);
    let f = hermite2(p - i);
    let a = hash21(i);
    let b = hash21(i + vec2<f32>(1.0, 0.0));
    let c = hash21(i + vec2<f32>(0.0, 1.0));
    let d = hash21(i + vec2<f32>(1.0, 1.0));
    return mix(mix(a, b, f.x), mix(c, d, f.x), f.y);
}

fn fbm(p: vec2<f32>) -> f32 {
    var value = 0.0;
    var amplitude = 0.5;
    var frequency = 2.0;
    for (var i = 0; i < 5; i = i + 1) {
        value = value + amplitude * value_noise(p * frequency);
        frequency = frequency * 2.0;
        amplitude = amplitude * 0.5;
    }
    return value;
}

fn overlay_noise(p: vec2<f32>) -> f32 {
    let i = floor(p);
    let u = hermite2(hermite2(p - i));
    let a = hash3(i).x;
    let b = hash3(i + vec2<f32>(1.0, 0.0)).x;
    let c = hash3(i + vec2<f32>(0.0, 1.0)).x;
    let d = hash3(i + vec2<f32>(1.0, 1.0)).x;
    return mix(mix(a, b, u.x), mix(c, d, u.x), u.y);
}

fn overlay_fbm(p: vec2<f32>, time: f32) -> f32 {
    var value = 0.0;
    var amplitude = 0.5;
    var frequency = 1.0;
    for (var i = 0; i < 6; i = i + 1) {
        value = value + amplitude * overlay_noise(p * frequency + time * 0.05);
        frequency = frequency * 2.0;
        amplitude = amplitude * 0.5;
    }
    return value;
}

fn planet_shade(uv: vec2<f32>, view_normal: vec3<f32>, time: f32) -> vec4<f32> {
    let hot_pink = vec3<f32>(1.0, 0.08, 0.58);
    let electric_cyan = vec3<f32>(0.0, 1.0, 1.0);
    let neon_mint = vec3<f32>(0.0, 1.0, 0.62);
    let electric_purple = vec3<f32>(0.62, 0.0, 1.0);
    let neon_orange = vec3<f32>(1.0, 0.4, 0.0);
    let electric_gold = vec3<f32>(1.0, 0.84, 0.0);

    let lat = uv.y;
    let band = sin(lat * 12.0 + time * 0.15) * 0.5 + 0.5;
    let band2 = sin(lat * 8.0 - time * 0.1) * 0.5 + 0.5;
    let streak = sin(uv.x * 30.0 + time * 0.08) * 0.5 + 0.5;

    var color = mix(hot_pink, electric_cyan, band);
    color = mix(color, neon_mint, band2 * 0.7);
    color = mix(color, electric_purple, streak * 0.4);
    color = mix(color, neon_orange, band * band2 * 0.5);

    let pole = step_between(0.85, 0.95, lat) + step_between(0.15, 0.05, lat);
    color = mix(color, mix(hot_pink, electric_gold, 0.5), pole * 0.8);

    let rim = pow(1.0 - abs(dot(view_normal, vec3<f32>(0.0, 0.0, 1.0))), 2.5);
    let alpha = 0.25 + rim * 0.6;
    color = (color + rim * 0.4) * 1.5;
    return vec4<f32>(color, alpha);
}

fn fire_band(fire: f32) -> vec3<f32> {
    let dark_mint = vec3<f32>(0.0, 0.3, 0.2);
    let mint = vec3<f32>(0.0, 0.6, 0.4);
    let mint_green = vec3<f32>(0.0, 0.8, 0.5);
    let bright_mint = vec3<f32>(0.0, 1.0, 0.62);
    let light_mint = vec3<f32>(0.4, 1.0, 0.75);
    let pale_mint = vec3<f32>(0.7, 1.0, 0.85);
    let white_mint = vec3<f32>(0.9, 1.0, 0.95);

    if (fire > 0.85) {
        return mix(pale_mint, white_mint, (fire - 0.85) / 0.15);
    } else if (fire > 0.7) {
        return mix(light_mint, pale_mint, (fire - 0.7) / 0.15);
    } else if (fire > 0.55) {
        return mix(bright_mint, light_mint, (fire - 0.55) / 0.15);
    } else if (fire > 0.4) {
        return mix(mint_green, bright_mint, (fire - 0.4) / 0.15);
    } else if (fire > 0.25) {
        return mix(mint, mint_green, (fire - 0.25) / 0.15);
    } else if (fire > 0.1) {
        return mix(dark_mint, mint, (fire - 0.1) / 0.15);
    }
    return mix(dark_mint * 0.5, dark_mint, fire / 0.1);
}

fn ring_fire(pos: vec2<f32>, time: f32) -> vec4<f32> {
    let dark_mint = vec3<f32>(0.0, 0.3, 0.2);
    let white_mint = vec3<f32>(0.9, 1.0, 0.95);

    let dist = length(pos);
    let angle = atan2(pos.y, pos.x);

    let spike_angle = angle * 25.0;
    let spike1 = pow(abs(sin(spike_angle + time * 2.0)), 0.3);
    let spike2 = pow(abs(sin(spike_angle * 1.5 - time * 1.5)), 0.4);
    let spike = spike1 * 0.7 + spike2 * 0.3;

    let fire_uv = vec2<f32>(angle * 5.0, (dist - 40.0) * 0.1);
    let turbulence = fbm(fire_uv + vec2<f32>(time * 0.3, -time * 1.2));
    let turbulence2 = fbm(fire_uv * 2.5 + vec2<f32>(time * 0.5, -time * 1.8));
    let flame_rise = fbm(vec2<f32>(angle * 15.0, dist * 0.2 - time * 2.0));

    let flicker = mix(0.6, 1.0, sin(time * 10.0 + angle * 30.0) * 0.5 + 0.5);
    let fire = (turbulence * 0.4 + turbulence2 * 0.3 + flame_rise * 0.3) * flicker * spike;

    let dist_norm = (dist - 40.0) / 30.0;
    var color = mix(fire_band(fire), dark_mint, dist_norm * 0.3);

    let ember = hash21(pos * 80.0 + time * 2.0);
    if (ember > 0.985 && fire > 0.2 && spike > 0.6) {
        color = color + white_mint * 0.8;
    }

    let alpha = fire * 0.7
        * step_between(0.4, 0.9, spike)
        * step_between(40.0, 42.0, dist)
        * step_between(70.0, 66.0, dist);
    return vec4<f32>(color * 1.7, alpha);
}

fn star_intensity(mode: f32, time: f32, phase: f32) -> f32 {
    if (mode < 0.5) {
        let t = sin(time * 3.0 + phase) * 0.5 + 0.5;
        return 0.6 + t * t * 0.4;
    } else if (mode < 1.5) {
        let p = step_between(0.0, 1.0, sin(time * 0.8 + phase) * 0.5 + 0.5);
        return 0.7 + p * 0.3;
    }
    return 0.85 + sin(time * 0.2 + phase) * 0.05;
}

fn star_point_size(size: f32, depth: f32, intensity: f32) -> f32 {
    let perspective = size * (1200.0 / max(depth, 1e-4));
    return min(perspective, size * 3.0) * intensity;
}

fn star_shape(center: vec2<f32>, spikes: f32) -> f32 {
    let angle = atan2(center.y, center.x);
    let radius = length(center);

    let c = abs(cos(angle * spikes * 0.5));
    let spike = c * c;

    let core = exp(-radius * 15.0);
    let rays = exp(-radius * 6.0) * spike;
    let flare = max(
        exp(-abs(center.x) * 25.0) * exp(-abs(center.y) * 4.0),
        exp(-abs(center.y) * 25.0) * exp(-abs(center.x) * 4.0),
    );
    let glow = exp(-radius * 3.5) * 0.4;
    return core + rays * 0.8 + flare * 0.5 + glow;
}

fn cloud_shade(uv: vec2<f32>, time: f32, base: vec3<f32>) -> vec4<f32> {
    let dist = length(uv - 0.5);
    let n = cloud_hash(uv * 8.0 + time * 0.08);
    let alpha = step_between(0.5, 0.0, dist) * 0.25 * n;
    return vec4<f32>(base * (1.3 + n * 0.4), alpha);
}

fn cloud_wave(x: f32, time: f32) -> f32 {
    return sin(x * 0.01 + time * 0.5) * 15.0;
}

fn background_wave(x: f32, y: f32, time: f32) -> f32 {
    return sin(x * 0.001 + time * 0.1) * 50.0 + sin(y * 0.001 + time * 0.15) * 50.0;
}

fn overlay_shade(uv: vec2<f32>, time: f32, cycle_time: f32, sparkle: f32) -> vec4<f32> {
    let dist = length(uv - 0.5);

    let cloud_time = cycle_time * 0.03;
    let clouds1 = overlay_fbm(uv * 3.0 + vec2<f32>(cloud_time, cloud_time * 0.5), time);
    let clouds2 = overlay_fbm(uv * 2.0 - vec2<f32>(cloud_time * 0.7, cloud_time), time);
    let combined = clouds1 * 0.6 + clouds2 * 0.4;

    let cycle = sin(cycle_time * 0.1) * 0.5 + 0.5;
    var base: vec3<f32>;
    if (cycle < 0.5) {
        base = mix(vec3<f32>(0.1, 0.05, 0.15), vec3<f32>(0.05, 0.1, 0.2), cycle * 2.0);
    } else {
        base = mix(vec3<f32>(0.05, 0.1, 0.2), vec3<f32>(0.05, 0.15, 0.15), (cycle - 0.5) * 2.0);
    }

    let vignette = step_between(1.2, 0.0, dist);
    var color = base * (1.0 + combined * 0.8) * vignette;
    if (sparkle > 0.01 && hash3(uv * 100.0 + time).x > 0.98) {
        color = color + vec3<f32>(0.3, 0.4, 0.5) * sparkle;
    }
    return vec4<f32>(color, vignette * 0.6);
}

// ---- end shading prelude ----
"#;
