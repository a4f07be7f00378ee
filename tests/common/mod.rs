//! Fixture archives shared by the integration tests.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes a zip at `path`. Names ending in `/` become directory entries.
pub fn write_archive(path: &Path, entries: &[(&str, &[u8])]) -> zip::result::ZipResult<()> {
    let mut writer = ZipWriter::new(File::create(path)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options)?;
        } else {
            writer.start_file(*name, options)?;
            writer.write_all(data)?;
        }
    }
    writer.finish()?;
    Ok(())
}

/// A pack with mandatory mods, three optional groups and some noise.
pub fn sample_pack(path: &Path) -> zip::result::ZipResult<()> {
    write_archive(
        path,
        &[
            ("modpack/", b""),
            ("modpack/mods/", b""),
            ("modpack/mods/foo.jar", b"foo-jar-bytes"),
            ("modpack/mods/lib/bar.jar", b"bar-jar-bytes"),
            ("modpack/optional/alpha/", b""),
            ("modpack/optional/alpha/config/settings.json", b"{\"alpha\":true}"),
            ("modpack/optional/beta/shaderpacks/fancy.zip", b"shaders"),
            ("modpack/optional/gamma/options.txt", b"fov:90"),
            ("modpack/readme.txt", b"not installed"),
            ("unrelated/file.txt", b"not installed either"),
        ],
    )
}

const LOCAL_HEADER_SIG: &[u8] = b"PK\x03\x04";
const CENTRAL_HEADER_SIG: &[u8] = b"PK\x01\x02";

fn read_u16(bytes: &[u8], at: usize) -> usize {
    u16::from_le_bytes([bytes[at], bytes[at + 1]]) as usize
}

fn read_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

/// Offset of the header with signature `sig` whose file name is `name`.
/// `name_len_at` is where the name length lives, `name_at` where the name starts.
fn find_header(bytes: &[u8], sig: &[u8], name_len_at: usize, name_at: usize, name: &str) -> io::Result<usize> {
    let mut at = 0;
    while at + name_at <= bytes.len() {
        if bytes[at..].starts_with(sig) {
            let len = read_u16(bytes, at + name_len_at);
            if bytes.get(at + name_at..at + name_at + len) == Some(name.as_bytes()) {
                return Ok(at);
            }
        }
        at += 1;
    }
    Err(io::Error::new(io::ErrorKind::NotFound, format!("no header for {name}")))
}

/// Sets the "encrypted" flag on the central directory record of `name`, so
/// the entry is listed normally but its stream cannot be opened.
pub fn mark_encrypted(path: &Path, name: &str) -> io::Result<()> {
    let mut bytes = fs::read(path)?;
    let at = find_header(&bytes, CENTRAL_HEADER_SIG, 28, 46, name)?;
    bytes[at + 8] |= 0x01;
    fs::write(path, bytes)
}

/// Overwrites the compressed data of `name` with 0xFF bytes. A deflate stream
/// starting with 0xFF uses the reserved block type, so decoding fails at once.
pub fn corrupt_entry_data(path: &Path, name: &str) -> io::Result<()> {
    let mut bytes = fs::read(path)?;
    let at = find_header(&bytes, LOCAL_HEADER_SIG, 26, 30, name)?;
    let compressed = read_u32(&bytes, at + 18);
    let start = at + 30 + read_u16(&bytes, at + 26) + read_u16(&bytes, at + 28);
    bytes[start..start + compressed].fill(0xFF);
    fs::write(path, bytes)
}
