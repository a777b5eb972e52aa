// ABOUTME: looks up the invoking user's name for the audit record.
// ABOUTME: reads the password database through libc, falling back to the environment.

use std::ffi::CStr;

pub fn current_username() -> String {
    let uid = unsafe { libc::getuid() };

    if let Some(name) = passwd_name(uid) {
        return name;
    }

    match std::env::var("USER") {
        Ok(user) if !user.trim().is_empty() => user,
        _ => uid.to_string(),
    }
}

fn passwd_name(uid: libc::uid_t) -> Option<String> {
    let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
    let mut result: *mut libc::passwd = std::ptr::null_mut();
    let mut buf = vec![0 as libc::c_char; 4096];

    let rc = unsafe { libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut result) };
    if rc != 0 || result.is_null() || pwd.pw_name.is_null() {
        return None;
    }

    let name = unsafe { CStr::from_ptr(pwd.pw_name) };
    Some(name.to_string_lossy().into_owned())
}
