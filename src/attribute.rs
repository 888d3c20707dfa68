use std::ffi::{CString, OsString};
use std::path::Path;

use crate::error::{FinderError, Result};

/// Size of the per-walk attribute buffer. Drive item IDs are 20-60 bytes.
pub const ATTR_BUFFER_SIZE: usize = 256;

/// Attribute name DriveFS uses to tag every synced entry with its item ID.
#[cfg(target_os = "macos")]
pub const DRIVEFS_ITEM_ID_ATTR: &str = "com.google.drivefs.item-id#S";

/// Linux only accepts namespaced attribute names, so the DriveFS name lives
/// under `user.` there.
#[cfg(not(target_os = "macos"))]
pub const DRIVEFS_ITEM_ID_ATTR: &str = "user.com.google.drivefs.item-id#S";

/// Source of the sync identifier attached to a filesystem entry.
///
/// Implementations copy the raw attribute value into the caller's buffer and
/// return how many bytes were written. A missing attribute, an unsupported
/// filesystem, a permission failure, or a value that does not fit `buf` all
/// yield `None`. Implementations never grow the buffer.
pub trait AttributeReader {
    fn read_into(&self, path: &Path, buf: &mut [u8]) -> Option<usize>;
}

impl<R: AttributeReader + ?Sized> AttributeReader for &R {
    fn read_into(&self, path: &Path, buf: &mut [u8]) -> Option<usize> {
        (**self).read_into(path, buf)
    }
}

impl<R: AttributeReader + ?Sized> AttributeReader for Box<R> {
    fn read_into(&self, path: &Path, buf: &mut [u8]) -> Option<usize> {
        (**self).read_into(path, buf)
    }
}

/// Reads the attribute with a single `getxattr(2)` call straight into the
/// caller's buffer.
#[derive(Debug, Clone)]
pub struct LibcXattrReader {
    name: CString,
}

impl LibcXattrReader {
    pub fn new(name: &str) -> Result<Self> {
        let name = CString::new(name).map_err(|_| {
            FinderError::Config(format!("Attribute name contains a NUL byte: {:?}", name))
        })?;
        Ok(Self { name })
    }
}

impl AttributeReader for LibcXattrReader {
    #[cfg(unix)]
    fn read_into(&self, path: &Path, buf: &mut [u8]) -> Option<usize> {
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
        let len = raw_getxattr(&c_path, &self.name, buf);
        if len <= 0 {
            return None;
        }
        let len = usize::try_from(len).ok()?;
        (len <= buf.len()).then_some(len)
    }

    #[cfg(not(unix))]
    fn read_into(&self, _path: &Path, _buf: &mut [u8]) -> Option<usize> {
        None
    }
}

#[cfg(target_os = "macos")]
fn raw_getxattr(path: &CString, name: &CString, buf: &mut [u8]) -> libc::ssize_t {
    // SAFETY: path and name are NUL-terminated and outlive the call; the
    // kernel writes at most buf.len() bytes into buf.
    unsafe {
        libc::getxattr(
            path.as_ptr(),
            name.as_ptr(),
            buf.as_mut_ptr().cast(),
            buf.len(),
            0,
            0,
        )
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn raw_getxattr(path: &CString, name: &CString, buf: &mut [u8]) -> libc::ssize_t {
    // SAFETY: path and name are NUL-terminated and outlive the call; the
    // kernel writes at most buf.len() bytes into buf.
    unsafe {
        libc::getxattr(
            path.as_ptr(),
            name.as_ptr(),
            buf.as_mut_ptr().cast(),
            buf.len(),
        )
    }
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "linux", target_os = "android"))
))]
fn raw_getxattr(_path: &CString, _name: &CString, _buf: &mut [u8]) -> libc::ssize_t {
    -1
}

/// Portable reader backed by the `xattr` crate. Allocates per call, so it is
/// slower than [`LibcXattrReader`], but works wherever `xattr` does.
/// Follows symlinks like `getxattr(2)`.
#[derive(Debug, Clone)]
pub struct XattrCrateReader {
    name: OsString,
}

impl XattrCrateReader {
    pub fn new(name: &str) -> Self {
        Self {
            name: OsString::from(name),
        }
    }
}

impl AttributeReader for XattrCrateReader {
    fn read_into(&self, path: &Path, buf: &mut [u8]) -> Option<usize> {
        let value = xattr::get_deref(path, &self.name).ok()??;
        if value.is_empty() || value.len() > buf.len() {
            return None;
        }
        buf[..value.len()].copy_from_slice(&value);
        Some(value.len())
    }
}

/// Picks the fastest reader available on this platform.
pub fn platform_reader(name: &str) -> Result<Box<dyn AttributeReader>> {
    if cfg!(any(target_os = "macos", target_os = "linux", target_os = "android")) {
        Ok(Box::new(LibcXattrReader::new(name)?))
    } else {
        Ok(Box::new(XattrCrateReader::new(name)))
    }
}

/// Fixed-size scratch buffer reused for every attribute read of one walk.
pub struct AttrBuffer {
    buf: [u8; ATTR_BUFFER_SIZE],
}

impl Default for AttrBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl AttrBuffer {
    pub fn new() -> Self {
        Self {
            buf: [0; ATTR_BUFFER_SIZE],
        }
    }

    /// Returns true when the attribute of `path` equals `target`.
    ///
    /// Only the bytes returned by the current read are compared, so a long
    /// value left over from an earlier read can never leak into a match.
    pub fn matches<R: AttributeReader + ?Sized>(
        &mut self,
        reader: &R,
        path: &Path,
        target: &[u8],
    ) -> bool {
        match reader.read_into(path, &mut self.buf) {
            Some(len) if len <= self.buf.len() => trim_value(&self.buf[..len]) == target,
            _ => false,
        }
    }

    /// Reads and returns the attribute value of `path`, if any.
    pub fn read_value<R: AttributeReader + ?Sized>(
        &mut self,
        reader: &R,
        path: &Path,
    ) -> Option<String> {
        let len = reader.read_into(path, &mut self.buf)?;
        let value = trim_value(self.buf.get(..len)?);
        if value.is_empty() {
            return None;
        }
        std::str::from_utf8(value).ok().map(str::to_string)
    }
}

fn trim_value(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| *b != 0)
        .map_or(0, |pos| pos + 1);
    bytes[..end].trim_ascii()
}
