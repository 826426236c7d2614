//! Shader source loading and program compilation

use std::fs;
use std::path::Path;

use glow::HasContext;
use tracing::error;

use crate::error::{InitError, InitResult};
use crate::{GlProgram, GlShader, GlUniformLocation};

/// The two shader stages, read from disk once during initialization.
#[derive(Debug)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn load(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> InitResult<Self> {
        Ok(Self {
            vertex: read_source(vertex_path.as_ref())?,
            fragment: read_source(fragment_path.as_ref())?,
        })
    }
}

fn read_source(path: &Path) -> InitResult<String> {
    fs::read_to_string(path).map_err(|source| InitError::ShaderSource {
        path: path.to_path_buf(),
        source,
    })
}

/// A linked scene program and its uniform locations.
pub struct SceneProgram {
    pub program: GlProgram,
    /// Location of the per-frame point rasterization size.
    pub point_size: Option<GlUniformLocation>,
}

impl SceneProgram {
    /// Compiles both stages and links them. A compile failure is fatal: the
    /// driver's diagnostic log is reported and attached to the error, and
    /// every intermediate object created so far is deleted.
    pub fn new(gl: &glow::Context, sources: &ShaderSources) -> InitResult<Self> {
        unsafe {
            let vertex_shader = compile_stage(gl, glow::VERTEX_SHADER, "vertex", &sources.vertex)?;
            let fragment_shader =
                match compile_stage(gl, glow::FRAGMENT_SHADER, "fragment", &sources.fragment) {
                    Ok(shader) => shader,
                    Err(err) => {
                        gl.delete_shader(vertex_shader);
                        return Err(err);
                    }
                };

            let program = match gl.create_program() {
                Ok(program) => program,
                Err(err) => {
                    gl.delete_shader(vertex_shader);
                    gl.delete_shader(fragment_shader);
                    return Err(InitError::CreateShader(err));
                }
            };
            gl.attach_shader(program, vertex_shader);
            gl.attach_shader(program, fragment_shader);
            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                error!(log = %log, "shader program failed to link");
                gl.delete_shader(vertex_shader);
                gl.delete_shader(fragment_shader);
                gl.delete_program(program);
                return Err(InitError::LinkProgram(log));
            }

            gl.detach_shader(program, vertex_shader);
            gl.detach_shader(program, fragment_shader);
            gl.delete_shader(vertex_shader);
            gl.delete_shader(fragment_shader);

            let point_size = gl.get_uniform_location(program, "PointSize");

            Ok(Self {
                program,
                point_size,
            })
        }
    }
}

fn compile_stage(
    gl: &glow::Context,
    kind: u32,
    stage: &'static str,
    source: &str,
) -> InitResult<GlShader> {
    unsafe {
        let shader = gl.create_shader(kind).map_err(InitError::CreateShader)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            error!(stage, log = %log, "shader failed to compile");
            gl.delete_shader(shader);
            return Err(InitError::CompileShader { stage, log });
        }

        Ok(shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_shader_file_reports_the_path() {
        let err = ShaderSources::load("/nonexistent/scene.vert", "/nonexistent/scene.frag")
            .expect_err("loading a missing file must fail");
        match err {
            InitError::ShaderSource { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/scene.vert"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
