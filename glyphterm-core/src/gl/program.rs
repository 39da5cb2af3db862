use glow::HasContext;

use crate::error::Error;

/// GLSL preamble prepended to compute shader sources.
pub(crate) const COMPUTE_PREAMBLE: &str = "#version 430 core\n";

/// A linked compute shader program.
#[derive(Debug)]
pub(crate) struct ComputeProgram {
    pub(crate) program: glow::Program,
}

impl ComputeProgram {
    pub(crate) fn create(gl: &glow::Context, source: &str) -> Result<Self, Error> {
        let program =
            unsafe { gl.create_program() }.map_err(|e| Error::shader_program_creation_failed(&e))?;

        let shader = compile_shader(gl, &format!("{COMPUTE_PREAMBLE}{source}"))?;

        unsafe {
            gl.attach_shader(program, shader);
            gl.link_program(program);
        }
        let linked = check_link_status(gl, program);

        // the shader object is not needed once linking has been attempted
        unsafe {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        if let Err(e) = linked {
            unsafe { gl.delete_program(program) };
            return Err(e);
        }

        Ok(ComputeProgram { program })
    }
}

fn compile_shader(gl: &glow::Context, source: &str) -> Result<glow::Shader, Error> {
    let shader = unsafe { gl.create_shader(glow::COMPUTE_SHADER) }
        .map_err(|e| Error::shader_creation_failed(&e))?;

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    if !unsafe { gl.get_shader_compile_status(shader) } {
        let log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        return Err(Error::shader_compile_failed(log));
    }

    Ok(shader)
}

fn check_link_status(gl: &glow::Context, program: glow::Program) -> Result<(), Error> {
    let status = unsafe { gl.get_program_link_status(program) };
    if !status {
        let log = unsafe { gl.get_program_info_log(program) };
        return Err(Error::shader_link_failed(log));
    }

    Ok(())
}
