use flate2::{write::GzEncoder, Compression};
use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::{Path, PathBuf},
};

/// Compresses `path` into `path`.gz, the uncompressed file is removed
/// once the compressed one is complete.
pub fn gzip(path: &Path) -> std::io::Result<PathBuf> {
    let mut gz_path = path.as_os_str().to_owned();
    gz_path.push(".gz");
    let gz_path = PathBuf::from(gz_path);

    let mut content = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut content)?;

    let result = File::create(&gz_path).and_then(|fd| {
        let mut fd = GzEncoder::new(fd, Compression::new(5));
        fd.write_all(&content)?;
        fd.finish()?.flush()
    });

    if let Err(e) = result {
        let _ = std::fs::remove_file(&gz_path);
        return Err(e);
    }
    std::fs::remove_file(path)?;
    Ok(gz_path)
}

#[cfg(test)]
mod test {
    use super::gzip;
    use flate2::read::GzDecoder;
    use std::{fs::File, io::Read, path::Path};
    use tempfile::tempdir;

    fn gunzip(path: &Path) -> Vec<u8> {
        let mut content = Vec::new();
        GzDecoder::new(File::open(path).unwrap())
            .read_to_end(&mut content)
            .unwrap();
        content
    }
    #[test]
    fn gzip_output() {
        let workspace = tempdir().unwrap();
        let path = workspace.path().join("track.kml");
        std::fs::write(&path, b"<kml></kml>").unwrap();

        let gz_path = gzip(&path).unwrap();
        assert_eq!(gz_path, workspace.path().join("track.kml.gz"));
        assert!(!path.exists());
        assert_eq!(gunzip(&gz_path), b"<kml></kml>");
    }
}
