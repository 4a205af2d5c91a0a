//! Catalog of named GLSL program pairs.
//!
//! Programs are immutable once built. Each declares an ordered parameter list;
//! the renderer packs those parameters one `vec4` per entry, in declaration
//! order, matching the `Params` uniform block of the fragment source.

use crate::error::EffectError;
use fnv::FnvHashMap;
use glam::{Vec2, Vec3};
use smallvec::SmallVec;
use std::sync::Arc;

pub static QUAD_VERT: &str = include_str!("../shaders/quad.vert");
pub static VOID_FIELD_FRAG: &str = include_str!("../shaders/void_field.frag");
pub static PROTOCOL_LOGO_FRAG: &str = include_str!("../shaders/protocol_logo.frag");
pub static QUANTUM_ENTANGLEMENT_FRAG: &str = include_str!("../shaders/quantum_entanglement.frag");
pub static NEURAL_NETWORK_FRAG: &str = include_str!("../shaders/neural_network.frag");
pub static DIMENSIONAL_PORTAL_FRAG: &str = include_str!("../shaders/dimensional_portal.frag");
pub static CONSCIOUSNESS_FIELD_FRAG: &str = include_str!("../shaders/consciousness_field.frag");
pub static GROWTH_FRAG: &str = include_str!("../shaders/growth.frag");
pub static COUNTDOWN_GLITCH_FRAG: &str = include_str!("../shaders/countdown_glitch.frag");
pub static PLASMA_FLOW_FRAG: &str = include_str!("../shaders/plasma_flow.frag");

// Program names
pub const VOID_FIELD: &str = "void_field";
pub const PROTOCOL_LOGO: &str = "protocol_logo";
pub const QUANTUM_ENTANGLEMENT: &str = "quantum_entanglement";
pub const NEURAL_NETWORK: &str = "neural_network";
pub const DIMENSIONAL_PORTAL: &str = "dimensional_portal";
pub const CONSCIOUSNESS_FIELD: &str = "consciousness_field";
pub const GROWTH: &str = "growth";
pub const COUNTDOWN_GLITCH: &str = "countdown_glitch";
pub const PLASMA_FLOW: &str = "plasma_flow";

// Parameters every built-in program declares first, in this order.
pub const PARAM_TIME: &str = "time";
pub const PARAM_INTENSITY: &str = "intensity";
pub const PARAM_RESOLUTION: &str = "resolution";
pub const PARAM_MOUSE: &str = "mouse";

/// Size in bytes of one packed parameter slot.
pub const PARAM_SLOT_BYTES: u64 = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
}

impl ParamValue {
    /// Pack into one std140 `vec4` slot.
    pub fn packed(self) -> [f32; 4] {
        match self {
            ParamValue::Float(x) => [x, 0.0, 0.0, 0.0],
            ParamValue::Vec2(v) => [v.x, v.y, 0.0, 0.0],
            ParamValue::Vec3(v) => [v.x, v.y, v.z, 0.0],
        }
    }

    pub fn as_float(self) -> Option<f32> {
        match self {
            ParamValue::Float(x) => Some(x),
            _ => None,
        }
    }

    fn same_kind(self, other: ParamValue) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

impl From<f32> for ParamValue {
    fn from(x: f32) -> Self {
        ParamValue::Float(x)
    }
}

impl From<Vec2> for ParamValue {
    fn from(v: Vec2) -> Self {
        ParamValue::Vec2(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        ParamValue::Vec3(v)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamDecl {
    pub name: &'static str,
    pub default: ParamValue,
}

/// Live parameter values for one program instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSet {
    entries: SmallVec<[(&'static str, ParamValue); 8]>,
}

impl ParamSet {
    pub fn from_decls(decls: &[ParamDecl]) -> Self {
        Self {
            entries: decls.iter().map(|d| (d.name, d.default)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(ParamValue::as_float)
    }

    /// Write a declared parameter. Returns `false` (and leaves the set untouched)
    /// when the program does not declare `name` or declares it with another type.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> bool {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) if slot.same_kind(value) => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        self.entries.iter().copied()
    }

    /// One `vec4` per parameter, in declaration order.
    pub fn packed(&self) -> Vec<[f32; 4]> {
        self.entries.iter().map(|(_, v)| v.packed()).collect()
    }

    pub fn packed_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.packed()).to_vec()
    }
}

#[derive(Clone, Debug)]
pub struct ShaderProgram {
    pub name: &'static str,
    pub vertex: &'static str,
    pub fragment: &'static str,
    params: Vec<ParamDecl>,
    blend_param: Option<&'static str>,
}

impl ShaderProgram {
    pub fn new(name: &'static str, vertex: &'static str, fragment: &'static str) -> Self {
        Self {
            name,
            vertex,
            fragment,
            params: Vec::new(),
            blend_param: None,
        }
    }

    /// Program with the shared leading parameters (time, intensity, resolution, mouse).
    pub fn standard(name: &'static str, fragment: &'static str) -> Self {
        Self::new(name, QUAD_VERT, fragment)
            .param(PARAM_TIME, 0.0)
            .param(PARAM_INTENSITY, 1.0)
            .param(PARAM_RESOLUTION, Vec2::new(1.0, 1.0))
            .param(PARAM_MOUSE, Vec2::splat(0.5))
    }

    pub fn param(mut self, name: &'static str, default: impl Into<ParamValue>) -> Self {
        self.params.push(ParamDecl {
            name,
            default: default.into(),
        });
        self
    }

    /// Declare the float parameter a transition ramps from 0 to 1.
    pub fn blend(mut self, name: &'static str) -> Self {
        self.blend_param = Some(name);
        self.param(name, 0.0)
    }

    pub fn params(&self) -> &[ParamDecl] {
        &self.params
    }

    pub fn blend_param(&self) -> Option<&'static str> {
        self.blend_param
    }

    pub fn default_params(&self) -> ParamSet {
        ParamSet::from_decls(&self.params)
    }

    pub fn uniform_size(&self) -> u64 {
        self.params.len() as u64 * PARAM_SLOT_BYTES
    }
}

/// Registry of programs, built once at startup and only read afterwards.
#[derive(Default)]
pub struct ShaderLibrary {
    programs: FnvHashMap<&'static str, Arc<ShaderProgram>>,
    order: Vec<&'static str>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, program: ShaderProgram) -> Result<(), EffectError> {
        if self.programs.contains_key(program.name) {
            return Err(EffectError::DuplicateProgram(program.name.to_string()));
        }
        self.order.push(program.name);
        self.programs.insert(program.name, Arc::new(program));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<ShaderProgram>> {
        self.programs.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    /// Program names in registration order.
    pub fn names(&self) -> &[&'static str] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn builtin() -> Self {
        let logo_red = Vec3::new(0.9, 0.05, 0.05);
        let programs = [
            ShaderProgram::standard(VOID_FIELD, VOID_FIELD_FRAG)
                .blend("danger"),
            ShaderProgram::standard(PROTOCOL_LOGO, PROTOCOL_LOGO_FRAG)
                .param("base_color", logo_red)
                .blend("presence"),
            ShaderProgram::standard(QUANTUM_ENTANGLEMENT, QUANTUM_ENTANGLEMENT_FRAG)
                .param("base_color", logo_red)
                .blend("entanglement_strength"),
            ShaderProgram::standard(NEURAL_NETWORK, NEURAL_NETWORK_FRAG)
                .param("base_color", logo_red)
                .blend("network_activity"),
            ShaderProgram::standard(DIMENSIONAL_PORTAL, DIMENSIONAL_PORTAL_FRAG)
                .param("base_color", logo_red)
                .blend("portal_open"),
            ShaderProgram::standard(CONSCIOUSNESS_FIELD, CONSCIOUSNESS_FIELD_FRAG)
                .param("base_color", logo_red)
                .blend("awareness_level"),
            ShaderProgram::standard(GROWTH, GROWTH_FRAG)
                .param("glow_intensity", 1.0)
                .blend("growth_progress"),
            ShaderProgram::new(COUNTDOWN_GLITCH, QUAD_VERT, COUNTDOWN_GLITCH_FRAG)
                .param(PARAM_TIME, 0.0)
                .param(PARAM_INTENSITY, 0.0)
                .param(PARAM_RESOLUTION, Vec2::new(1.0, 1.0))
                .param("band", Vec2::new(0.35, 0.55))
                .blend("presence"),
            ShaderProgram::new(PLASMA_FLOW, QUAD_VERT, PLASMA_FLOW_FRAG)
                .param(PARAM_TIME, 0.0)
                .param(PARAM_INTENSITY, 0.0)
                .param(PARAM_RESOLUTION, Vec2::new(1.0, 1.0))
                .param("stage", 0.0)
                .param("consensus", 0.0)
                .blend("presence"),
        ];
        let mut library = Self::new();
        for program in programs {
            if let Err(e) = library.insert(program) {
                log::warn!("[shaders] {e}");
            }
        }
        library
    }
}
