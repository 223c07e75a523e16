//! Process replacement.
//!
//! The last, side-effect-only step: the validated argv is handed to
//! `execvp` and the guard process becomes the privileged command. Nothing
//! here inspects or re-validates paths.

use std::convert::Infallible;
use std::ffi::CString;
use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;

use anyhow::Context;
use anyhow::bail;

/// Replaces the current process image with `argv`. Returns only on
/// failure; on success the call never comes back.
pub fn replace_process(argv: &[OsString]) -> anyhow::Result<Infallible> {
    let Some(program) = argv.first() else {
        bail!("empty argv");
    };

    let c_args: Vec<CString> = argv
        .iter()
        .map(|arg| CString::new(arg.as_bytes()))
        .collect::<Result<_, _>>()
        .context("argv contains an interior NUL byte")?;
    let mut c_arg_ptrs: Vec<*const libc::c_char> =
        c_args.iter().map(|arg| arg.as_ptr()).collect();
    c_arg_ptrs.push(std::ptr::null());

    // SAFETY: c_arg_ptrs is a NULL-terminated array of pointers into
    // c_args, which outlives the call. execvp only returns on failure.
    unsafe {
        libc::execvp(c_arg_ptrs[0], c_arg_ptrs.as_ptr());
    }

    Err(std::io::Error::last_os_error())
        .with_context(|| format!("failed to execute {program:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_interior_nul_byte_is_an_error_not_an_exec() {
        let argv = vec![OsString::from("btrfs\0version")];
        let error = replace_process(&argv).expect_err("must not exec");
        assert!(error.to_string().contains("interior NUL"));
    }

    #[test]
    fn an_empty_argv_is_rejected() {
        assert!(replace_process(&[]).is_err());
    }
}
