//! Overlay shader program: compile, link and reflect on the CPU.
//!
//! Each stage is parsed and validated with naga, so a broken source is
//! reported before any GPU object exists. Linking checks that the fragment
//! stage only reads what the vertex stage writes, then resolves the quad's
//! position attribute and the byte offsets of `iTime` and `iResolution`
//! inside the uniform block.

use crate::camera::Viewport;
use crate::constants::MS_TO_SECONDS;
use std::fmt;
use thiserror::Error;

pub const POSITION_ATTRIBUTE: &str = "a_position";
pub const TIME_UNIFORM: &str = "iTime";
pub const RESOLUTION_UNIFORM: &str = "iResolution";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            Stage::Vertex => naga::ShaderStage::Vertex,
            Stage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("could not compile {stage} shader: {diagnostic}")]
    ShaderCompile { stage: Stage, diagnostic: String },
    #[error("shader program failed to link: {0}")]
    ProgramLink(String),
}

/// One validated shader stage.
#[derive(Clone, Debug)]
pub struct CompiledStage {
    pub stage: Stage,
    pub source: String,
    pub entry_point: String,
    module: naga::Module,
    entry_index: usize,
}

impl CompiledStage {
    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }
}

/// Parse and validate `source`, requiring an entry point for `stage`.
pub fn compile_stage(source: &str, stage: Stage) -> Result<CompiledStage, OverlayError> {
    let compile_err = |diagnostic: String| OverlayError::ShaderCompile { stage, diagnostic };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    validator
        .validate(&module)
        .map_err(|e| compile_err(format!("validation error: {e}")))?;

    let entry_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == stage.naga())
        .ok_or_else(|| compile_err(format!("no @{stage} entry point")))?;

    Ok(CompiledStage {
        stage,
        source: source.to_owned(),
        entry_point: module.entry_points[entry_index].name.clone(),
        module,
        entry_index,
    })
}

/// Uniform block layout resolved from the shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformBlock {
    pub binding: u32,
    pub size: u32,
    pub time_offset: Option<u32>,
    pub resolution_offset: Option<u32>,
}

/// Linked overlay program with resolved attribute and uniform locations.
#[derive(Clone, Debug)]
pub struct OverlayProgram {
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
    pub position_location: u32,
    pub uniforms: Option<UniformBlock>,
}

impl OverlayProgram {
    /// Compile both stages and link them.
    pub fn build(vertex_source: &str, fragment_source: &str) -> Result<Self, OverlayError> {
        let vertex = compile_stage(vertex_source, Stage::Vertex)?;
        let fragment = compile_stage(fragment_source, Stage::Fragment)?;
        Self::link(vertex, fragment)
    }

    /// Program built from the bundled overlay shaders.
    pub fn standard() -> Result<Self, OverlayError> {
        Self::build(crate::OVERLAY_VERT_WGSL, crate::OVERLAY_FRAG_WGSL)
    }

    /// Like [`OverlayProgram::build`], but logs the failure and returns
    /// `None` so the caller can carry on without an overlay.
    pub fn build_or_log(vertex_source: &str, fragment_source: &str) -> Option<Self> {
        match Self::build(vertex_source, fragment_source) {
            Ok(program) => Some(program),
            Err(e) => {
                log::error!("[overlay] {e}");
                log::warn!("[overlay] disabled; rendering the scene only");
                None
            }
        }
    }

    pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<Self, OverlayError> {
        let vs_ep = vertex.entry();
        let fs_ep = fragment.entry();

        let outputs = vs_ep
            .function
            .result
            .as_ref()
            .map(|r| io_slots(vertex.module(), r.ty, r.binding.as_ref(), None))
            .unwrap_or_default();
        for arg in &fs_ep.function.arguments {
            let inputs = io_slots(
                fragment.module(),
                arg.ty,
                arg.binding.as_ref(),
                arg.name.as_deref(),
            );
            for input in inputs {
                let Some(output) = outputs.iter().find(|o| o.location == input.location) else {
                    return Err(OverlayError::ProgramLink(format!(
                        "fragment input at location {} is not written by the vertex stage",
                        input.location
                    )));
                };
                if output.inner != input.inner {
                    return Err(OverlayError::ProgramLink(format!(
                        "location {} is {:?} in the vertex stage but {:?} in the fragment stage",
                        input.location, output.inner, input.inner
                    )));
                }
            }
        }

        let position_location = vs_ep
            .function
            .arguments
            .iter()
            .flat_map(|arg| {
                io_slots(
                    vertex.module(),
                    arg.ty,
                    arg.binding.as_ref(),
                    arg.name.as_deref(),
                )
            })
            .find(|slot| slot.name.as_deref() == Some(POSITION_ATTRIBUTE))
            .map(|slot| slot.location)
            .ok_or_else(|| {
                OverlayError::ProgramLink(format!(
                    "vertex stage has no `{POSITION_ATTRIBUTE}` input"
                ))
            })?;

        let uniforms = match (
            uniform_block(vertex.module())?,
            uniform_block(fragment.module())?,
        ) {
            (Some(v), Some(f)) if v.binding != f.binding => {
                return Err(OverlayError::ProgramLink(format!(
                    "stages declare uniform blocks at different bindings ({} and {})",
                    v.binding, f.binding
                )));
            }
            (Some(v), Some(f)) if v.size != f.size => {
                return Err(OverlayError::ProgramLink(format!(
                    "uniform block at binding {} is {} bytes (vertex) but {} bytes (fragment)",
                    f.binding, v.size, f.size
                )));
            }
            (Some(v), Some(f)) => Some(UniformBlock {
                time_offset: f.time_offset.or(v.time_offset),
                resolution_offset: f.resolution_offset.or(v.resolution_offset),
                ..f
            }),
            (v, f) => f.or(v),
        };
        match uniforms {
            Some(block) => {
                if block.time_offset.is_none() {
                    log::warn!("[overlay] `{TIME_UNIFORM}` not found; time will not be uploaded");
                }
                if block.resolution_offset.is_none() {
                    log::warn!(
                        "[overlay] `{RESOLUTION_UNIFORM}` not found; resolution not uploaded"
                    );
                }
            }
            None => log::warn!("[overlay] program declares no uniform block"),
        }

        Ok(Self {
            vertex,
            fragment,
            position_location,
            uniforms,
        })
    }

    /// Uniform bytes for one frame: `iTime` in seconds, `iResolution` in
    /// pixels, each at its reflected offset. Empty without a uniform block.
    pub fn encode_uniforms(&self, time_ms: f64, viewport: Viewport) -> Vec<u8> {
        let Some(block) = self.uniforms else {
            return Vec::new();
        };
        let mut bytes = vec![0u8; block.size as usize];
        if let Some(offset) = block.time_offset {
            write_f32s(&mut bytes, offset, &[(time_ms * MS_TO_SECONDS) as f32]);
        }
        if let Some(offset) = block.resolution_offset {
            write_f32s(
                &mut bytes,
                offset,
                &[viewport.width as f32, viewport.height as f32],
            );
        }
        bytes
    }
}

fn write_f32s(bytes: &mut [u8], offset: u32, values: &[f32]) {
    for (i, v) in values.iter().enumerate() {
        let start = offset as usize + i * 4;
        if let Some(dst) = bytes.get_mut(start..start + 4) {
            dst.copy_from_slice(&v.to_le_bytes());
        }
    }
}

struct IoSlot {
    name: Option<String>,
    location: u32,
    inner: naga::TypeInner,
}

// Flatten an argument or result into its `@location` slots; struct members
// carry their own bindings.
fn io_slots(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    name: Option<&str>,
) -> Vec<IoSlot> {
    match binding {
        Some(naga::Binding::Location { location, .. }) => vec![IoSlot {
            name: name.map(str::to_owned),
            location: *location,
            inner: module.types[ty].inner.clone(),
        }],
        Some(naga::Binding::BuiltIn(_)) => Vec::new(),
        None => match &module.types[ty].inner {
            naga::TypeInner::Struct { members, .. } => members
                .iter()
                .flat_map(|m| io_slots(module, m.ty, m.binding.as_ref(), m.name.as_deref()))
                .collect(),
            _ => Vec::new(),
        },
    }
}

fn uniform_block(module: &naga::Module) -> Result<Option<UniformBlock>, OverlayError> {
    let Some(var) = module
        .global_variables
        .iter()
        .map(|(_, var)| var)
        .find(|var| var.space == naga::AddressSpace::Uniform)
    else {
        return Ok(None);
    };
    let Some(rb) = &var.binding else {
        return Err(OverlayError::ProgramLink(
            "uniform block has no @group/@binding".into(),
        ));
    };
    if rb.group != 0 {
        return Err(OverlayError::ProgramLink(format!(
            "uniform block must live in @group(0), found @group({})",
            rb.group
        )));
    }

    let mut block = UniformBlock {
        binding: rb.binding,
        size: 0,
        time_offset: None,
        resolution_offset: None,
    };
    match &module.types[var.ty].inner {
        naga::TypeInner::Struct { members, span } => {
            block.size = *span;
            for m in members {
                match m.name.as_deref() {
                    Some(TIME_UNIFORM) => block.time_offset = Some(m.offset),
                    Some(RESOLUTION_UNIFORM) => block.resolution_offset = Some(m.offset),
                    _ => {}
                }
            }
        }
        naga::TypeInner::Scalar(scalar) => {
            block.size = scalar.width as u32;
            if var.name.as_deref() == Some(TIME_UNIFORM) {
                block.time_offset = Some(0);
            }
        }
        _ => {
            return Err(OverlayError::ProgramLink(
                "uniform block must be a struct".into(),
            ))
        }
    }
    Ok(Some(block))
}
