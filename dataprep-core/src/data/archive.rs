//! Tar archive extraction.
//!
//! Gzip-compressed tarballs are detected by their magic bytes; anything else
//! is read as a plain tar stream.

use super::provider::DataError;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Extract every member of `archive` into `dest`. Returns the member count.
///
/// An archive without members is an error.
///
/// The archive file handle is dropped before returning, on success or error.
pub fn extract_all(archive: &Path, dest: &Path) -> Result<usize, DataError> {
    let mut file = File::open(archive).map_err(|e| DataError::io(archive, e))?;

    let mut magic = [0u8; 2];
    let read = read_prefix(&mut file, &mut magic).map_err(|e| DataError::io(archive, e))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| DataError::io(archive, e))?;

    let reader = BufReader::new(file);
    if read == magic.len() && magic == GZIP_MAGIC {
        unpack(tar::Archive::new(GzDecoder::new(reader)), archive, dest)
    } else {
        unpack(tar::Archive::new(reader), archive, dest)
    }
}

fn unpack<R: Read>(
    mut tar: tar::Archive<R>,
    archive: &Path,
    dest: &Path,
) -> Result<usize, DataError> {
    let corrupt = |e: std::io::Error| DataError::Archive {
        path: archive.to_path_buf(),
        reason: e.to_string(),
    };

    let mut members = 0;
    let mut count = 0;
    for entry in tar.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        members += 1;
        // unpack_in refuses paths that would escape `dest`; those are skipped.
        if entry.unpack_in(dest).map_err(corrupt)? {
            count += 1;
        } else {
            log::warn!(
                "skipped archive member outside {}: {}",
                dest.display(),
                entry.path().map(|p| p.display().to_string()).unwrap_or_default()
            );
        }
    }
    // An empty file or a run of zero blocks reads as a tar with no members.
    if members == 0 {
        return Err(DataError::Archive {
            path: archive.to_path_buf(),
            reason: "archive has no members".to_string(),
        });
    }
    Ok(count)
}

/// Fill as much of `buf` as the file allows.
fn read_prefix(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn tar_bytes(name: &str, body: &[u8]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, body).unwrap();
        builder.into_inner().unwrap()
    }

    #[test]
    fn extracts_gzip_tarball() {
        let dir = tempfile::tempdir().unwrap();
        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        std::io::Write::write_all(&mut gz, &tar_bytes("data.csv", b"a,b\n1,2\n")).unwrap();
        let archive = dir.path().join("data.tgz");
        std::fs::write(&archive, gz.finish().unwrap()).unwrap();

        let count = extract_all(&archive, dir.path()).unwrap();
        assert_eq!(count, 1);
        let text = std::fs::read_to_string(dir.path().join("data.csv")).unwrap();
        assert_eq!(text, "a,b\n1,2\n");
    }

    #[test]
    fn extracts_plain_tar() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("data.tar");
        std::fs::write(&archive, tar_bytes("plain.csv", b"x\n1\n")).unwrap();

        assert_eq!(extract_all(&archive, dir.path()).unwrap(), 1);
        assert!(dir.path().join("plain.csv").exists());
    }

    #[test]
    fn corrupt_gzip_is_an_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.tgz");
        std::fs::write(&archive, [0x1f, 0x8b, 0x00, 0x42, 0x42]).unwrap();

        let err = extract_all(&archive, dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Archive { .. }), "got {err:?}");
    }

    #[test]
    fn empty_file_is_an_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("empty.tgz");
        std::fs::write(&archive, b"").unwrap();

        let err = extract_all(&archive, dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Archive { .. }), "got {err:?}");
    }

    #[test]
    fn zero_block_tar_is_an_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("zeros.tar");
        std::fs::write(&archive, [0u8; 1024]).unwrap();

        let err = extract_all(&archive, dir.path()).unwrap_err();
        match err {
            DataError::Archive { reason, .. } => assert_eq!(reason, "archive has no members"),
            other => panic!("expected Archive error, got {other:?}"),
        }
    }

    #[test]
    fn missing_archive_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_all(&dir.path().join("nope.tgz"), dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
